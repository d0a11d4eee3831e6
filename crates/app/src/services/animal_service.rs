//! Animal service: animal CRUD plus the adoption side effects of a status change.

use pawhub_domain::adoption::{Adoption, AdoptionStatus};
use pawhub_domain::animal::{Animal, AnimalStatus, AnimalType, StatusChange};
use pawhub_domain::error::{PawHubError, ValidationError};
use pawhub_domain::id::AnimalId;
use pawhub_domain::permission::{Actor, Permission};

use super::found;
use crate::ports::{AdoptionRepository, AnimalRepository, PageRequest, Paged};

/// Input for registering an animal. The acting volunteer becomes its owner.
#[derive(Debug, Clone)]
pub struct NewAnimal {
    pub name: String,
    pub age: u32,
    pub breed: String,
    pub animal_type: AnimalType,
    pub status: Option<AnimalStatus>,
}

/// Fields that may change on an animal. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct AnimalChanges {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub breed: Option<String>,
    pub animal_type: Option<AnimalType>,
    pub status: Option<AnimalStatus>,
}

/// Application service for animals.
pub struct AnimalService<AR, DR> {
    animals: AR,
    adoptions: DR,
}

impl<AR: AnimalRepository, DR: AdoptionRepository> AnimalService<AR, DR> {
    /// Create a new service backed by the given repositories.
    pub fn new(animals: AR, adoptions: DR) -> Self {
        Self { animals, adoptions }
    }

    /// Register an animal (staff only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for adopters and
    /// [`PawHubError::Validation`] when a field is blank.
    #[tracing::instrument(skip(self, actor, new), fields(animal_name = %new.name))]
    pub async fn create_animal(&self, actor: &Actor, new: NewAnimal) -> Result<Animal, PawHubError> {
        Permission::STAFF.check(Some(actor))?;
        let mut builder = Animal::builder()
            .name(new.name)
            .age(new.age)
            .breed(new.breed)
            .animal_type(new.animal_type)
            .volunteer_id(actor.user_id);
        if let Some(status) = new.status {
            builder = builder.status(status);
        }
        self.animals.create(builder.build()?).await
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] when no animal with `id` exists.
    pub async fn get_animal(&self, id: AnimalId) -> Result<Animal, PawHubError> {
        found(self.animals.get_by_id(id).await?, "Animal", id)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_animals(&self, page: PageRequest) -> Result<Paged<Animal>, PawHubError> {
        self.animals.get_all(page).await
    }

    /// Apply `changes` to an animal (staff only).
    ///
    /// A status change also moves the animal's adoption record: reserving
    /// opens one, adopting completes (or creates) one, releasing cancels the
    /// open one. The acting user stands in as adopter and volunteer for any
    /// record created here.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for adopters,
    /// [`PawHubError::NotFound`] for an unknown id, and
    /// [`PawHubError::Validation`] for blank fields or a move out of `ADOPTED`.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update_animal(
        &self,
        actor: &Actor,
        id: AnimalId,
        changes: AnimalChanges,
    ) -> Result<Animal, PawHubError> {
        Permission::STAFF.check(Some(actor))?;
        let mut animal = self.get_animal(id).await?;

        if let Some(name) = changes.name {
            animal.name = name;
        }
        if let Some(age) = changes.age {
            animal.age = age;
        }
        if let Some(breed) = changes.breed {
            animal.breed = breed;
        }
        if let Some(animal_type) = changes.animal_type {
            animal.animal_type = animal_type;
        }
        animal.validate()?;

        if let Some(status) = changes.status {
            let change = animal.status.transition_to(status)?;
            self.apply_adoption_effect(actor, &animal, change).await?;
            animal.status = status;
        }
        self.animals.update(animal).await
    }

    async fn apply_adoption_effect(
        &self,
        actor: &Actor,
        animal: &Animal,
        change: StatusChange,
    ) -> Result<(), PawHubError> {
        let existing = self.adoptions.find_by_animal(animal.id).await?;
        let open = existing.iter().find(|a| a.is_open()).cloned();

        match change {
            StatusChange::Unchanged => {}
            StatusChange::Reserve => {
                if open.is_none() {
                    let adoption = Adoption::new(
                        animal.id,
                        actor.user_id,
                        actor.user_id,
                        AdoptionStatus::Pending,
                    );
                    tracing::info!(animal_id = %animal.id, adoption_id = %adoption.id, "adoption opened");
                    self.adoptions.create(adoption).await?;
                }
            }
            StatusChange::Adopt => {
                if let Some(mut adoption) = open {
                    adoption.status = AdoptionStatus::Completed;
                    self.adoptions.update(adoption).await?;
                } else if !existing
                    .iter()
                    .any(|a| a.status == AdoptionStatus::Completed)
                {
                    let adoption = Adoption::new(
                        animal.id,
                        actor.user_id,
                        actor.user_id,
                        AdoptionStatus::Completed,
                    );
                    self.adoptions.create(adoption).await?;
                }
                tracing::info!(animal_id = %animal.id, "animal adopted");
            }
            StatusChange::Release => {
                if let Some(mut adoption) = open {
                    adoption.status = AdoptionStatus::Cancelled;
                    self.adoptions.update(adoption).await?;
                }
            }
        }
        Ok(())
    }

    /// Overwrite the status without touching adoption records (staff only).
    ///
    /// `status` is the wire form; it is parsed only once the actor and the
    /// animal have been checked.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for adopters,
    /// [`PawHubError::NotFound`] for an unknown id, and
    /// [`ValidationError::Invalid`] on `status` for an unknown status.
    #[tracing::instrument(skip(self, actor))]
    pub async fn change_status(
        &self,
        actor: &Actor,
        id: AnimalId,
        status: &str,
    ) -> Result<Animal, PawHubError> {
        Permission::STAFF.check(Some(actor))?;
        let mut animal = self.get_animal(id).await?;
        animal.status = status
            .parse()
            .map_err(|_| ValidationError::Invalid { field: "status" })?;
        self.animals.update(animal).await
    }

    /// Delete an animal (staff only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for adopters and
    /// [`PawHubError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_animal(&self, actor: &Actor, id: AnimalId) -> Result<(), PawHubError> {
        Permission::STAFF.check(Some(actor))?;
        self.get_animal(id).await?;
        self.animals.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{InMemory, actor};
    use pawhub_domain::error::ValidationError;
    use pawhub_domain::user::UserRole;

    struct Fixture {
        svc: AnimalService<InMemory<Animal>, InMemory<Adoption>>,
        adoptions: InMemory<Adoption>,
        volunteer: Actor,
    }

    fn fixture() -> Fixture {
        let adoptions = InMemory::default();
        Fixture {
            svc: AnimalService::new(InMemory::default(), adoptions.clone()),
            adoptions,
            volunteer: actor(UserRole::Volunteer),
        }
    }

    fn buddy() -> NewAnimal {
        NewAnimal {
            name: "Buddy".to_string(),
            age: 3,
            breed: "Labrador".to_string(),
            animal_type: AnimalType::Dog,
            status: None,
        }
    }

    fn status(status: AnimalStatus) -> AnimalChanges {
        AnimalChanges {
            status: Some(status),
            ..AnimalChanges::default()
        }
    }

    #[tokio::test]
    async fn should_stamp_creating_volunteer() {
        let f = fixture();
        let animal = f.svc.create_animal(&f.volunteer, buddy()).await.unwrap();
        assert_eq!(animal.volunteer_id, f.volunteer.user_id);
        assert_eq!(animal.status, AnimalStatus::Available);
    }

    #[tokio::test]
    async fn should_forbid_adopters_from_creating() {
        let f = fixture();
        let result = f.svc.create_animal(&actor(UserRole::Adopter), buddy()).await;
        assert!(matches!(result, Err(PawHubError::Forbidden(_))));
    }

    #[tokio::test]
    async fn should_open_one_adoption_when_marked_pending() {
        let f = fixture();
        let animal = f.svc.create_animal(&f.volunteer, buddy()).await.unwrap();

        let updated = f
            .svc
            .update_animal(&f.volunteer, animal.id, status(AnimalStatus::Pending))
            .await
            .unwrap();
        assert_eq!(updated.status, AnimalStatus::Pending);
        f.svc
            .update_animal(&f.volunteer, animal.id, status(AnimalStatus::Pending))
            .await
            .unwrap();

        let adoptions = f.adoptions.all();
        assert_eq!(adoptions.len(), 1);
        assert_eq!(adoptions[0].status, AdoptionStatus::Pending);
        assert_eq!(adoptions[0].adopter_id, f.volunteer.user_id);
    }

    #[tokio::test]
    async fn should_complete_open_adoption_when_adopted() {
        let f = fixture();
        let animal = f.svc.create_animal(&f.volunteer, buddy()).await.unwrap();
        f.svc
            .update_animal(&f.volunteer, animal.id, status(AnimalStatus::Pending))
            .await
            .unwrap();
        f.svc
            .update_animal(&f.volunteer, animal.id, status(AnimalStatus::Adopted))
            .await
            .unwrap();

        let adoptions = f.adoptions.all();
        assert_eq!(adoptions.len(), 1);
        assert_eq!(adoptions[0].status, AdoptionStatus::Completed);
    }

    #[tokio::test]
    async fn should_create_completed_adoption_when_adopted_directly() {
        let f = fixture();
        let animal = f.svc.create_animal(&f.volunteer, buddy()).await.unwrap();
        f.svc
            .update_animal(&f.volunteer, animal.id, status(AnimalStatus::Adopted))
            .await
            .unwrap();

        let adoptions = f.adoptions.all();
        assert_eq!(adoptions.len(), 1);
        assert_eq!(adoptions[0].status, AdoptionStatus::Completed);
    }

    #[tokio::test]
    async fn should_cancel_open_adoption_when_released() {
        let f = fixture();
        let animal = f.svc.create_animal(&f.volunteer, buddy()).await.unwrap();
        f.svc
            .update_animal(&f.volunteer, animal.id, status(AnimalStatus::Pending))
            .await
            .unwrap();
        let released = f
            .svc
            .update_animal(&f.volunteer, animal.id, status(AnimalStatus::Available))
            .await
            .unwrap();

        assert!(released.is_available());
        assert_eq!(f.adoptions.all()[0].status, AdoptionStatus::Cancelled);
    }

    #[tokio::test]
    async fn should_refuse_to_leave_adopted_through_update() {
        let f = fixture();
        let animal = f.svc.create_animal(&f.volunteer, buddy()).await.unwrap();
        f.svc
            .update_animal(&f.volunteer, animal.id, status(AnimalStatus::Adopted))
            .await
            .unwrap();

        let result = f
            .svc
            .update_animal(&f.volunteer, animal.id, status(AnimalStatus::Available))
            .await;
        assert!(matches!(
            result,
            Err(PawHubError::Validation(ValidationError::Transition { .. }))
        ));
    }

    #[tokio::test]
    async fn should_change_status_without_adoption_side_effects() {
        let f = fixture();
        let animal = f.svc.create_animal(&f.volunteer, buddy()).await.unwrap();
        let updated = f
            .svc
            .change_status(&f.volunteer, animal.id, "PENDING")
            .await
            .unwrap();
        assert_eq!(updated.status, AnimalStatus::Pending);
        assert_eq!(f.adoptions.len(), 0);
    }

    #[tokio::test]
    async fn should_check_gate_and_animal_before_status_text() {
        let f = fixture();
        let animal = f.svc.create_animal(&f.volunteer, buddy()).await.unwrap();

        let result = f
            .svc
            .change_status(&actor(UserRole::Adopter), animal.id, "BOGUS")
            .await;
        assert!(matches!(result, Err(PawHubError::Forbidden(_))));

        let result = f
            .svc
            .change_status(&f.volunteer, AnimalId::new(), "BOGUS")
            .await;
        assert!(matches!(result, Err(PawHubError::NotFound(_))));

        let result = f.svc.change_status(&f.volunteer, animal.id, "BOGUS").await;
        assert!(matches!(
            result,
            Err(PawHubError::Validation(ValidationError::Invalid {
                field: "status"
            }))
        ));
    }

    #[tokio::test]
    async fn should_update_plain_fields() {
        let f = fixture();
        let animal = f.svc.create_animal(&f.volunteer, buddy()).await.unwrap();
        let changes = AnimalChanges {
            name: Some("Max".to_string()),
            age: Some(4),
            ..AnimalChanges::default()
        };
        let updated = f
            .svc
            .update_animal(&f.volunteer, animal.id, changes)
            .await
            .unwrap();
        assert_eq!(updated.name, "Max");
        assert_eq!(updated.age, 4);
        assert_eq!(f.adoptions.len(), 0);
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_animal() {
        let f = fixture();
        let result = f.svc.delete_animal(&f.volunteer, AnimalId::new()).await;
        assert!(matches!(result, Err(PawHubError::NotFound(_))));
    }
}
