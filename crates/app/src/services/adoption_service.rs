//! Adoption service: the request, approval and cancellation workflow.

use pawhub_domain::adoption::{Adoption, AdoptionStatus};
use pawhub_domain::animal::AnimalStatus;
use pawhub_domain::error::{PawHubError, ValidationError};
use pawhub_domain::id::{AdoptionId, AnimalId};
use pawhub_domain::permission::{Actor, Permission};

use super::found;
use crate::ports::{AdoptionRepository, AnimalRepository, PageRequest, Paged};

/// Fields that may change on an adoption.
#[derive(Debug, Clone, Default)]
pub struct AdoptionChanges {
    pub animal_id: Option<AnimalId>,
    pub status: Option<AdoptionStatus>,
}

/// Whether an update is a partial patch or a full replacement.
///
/// Staff may patch; only administrators may replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Partial,
    Full,
}

/// Application service for adoptions.
pub struct AdoptionService<DR, AR> {
    adoptions: DR,
    animals: AR,
}

impl<DR: AdoptionRepository, AR: AnimalRepository> AdoptionService<DR, AR> {
    /// Create a new service backed by the given repositories.
    pub fn new(adoptions: DR, animals: AR) -> Self {
        Self { adoptions, animals }
    }

    /// Request the adoption of an available animal (adopters only).
    ///
    /// The animal's volunteer is recorded as the handler and the animal moves
    /// to `PENDING`.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for staff, and
    /// [`ValidationError::InvalidAnimal`] or
    /// [`ValidationError::AnimalNotAvailable`] when the animal cannot be
    /// requested.
    #[tracing::instrument(skip(self, actor))]
    pub async fn create_adoption(
        &self,
        actor: &Actor,
        animal_id: AnimalId,
    ) -> Result<Adoption, PawHubError> {
        Permission::ADOPTER.check(Some(actor))?;
        let Some(mut animal) = self.animals.get_by_id(animal_id).await? else {
            return Err(ValidationError::InvalidAnimal.into());
        };
        if !animal.is_available() {
            return Err(ValidationError::AnimalNotAvailable.into());
        }

        let adoption = Adoption::new(
            animal.id,
            actor.user_id,
            animal.volunteer_id,
            AdoptionStatus::Pending,
        );
        let adoption = self.adoptions.create(adoption).await?;

        animal.status = AnimalStatus::Pending;
        self.animals.update(animal).await?;
        tracing::info!(adoption_id = %adoption.id, "adoption requested");
        Ok(adoption)
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for adopters and
    /// [`PawHubError::NotFound`] for an unknown id.
    pub async fn get_adoption(&self, actor: &Actor, id: AdoptionId) -> Result<Adoption, PawHubError> {
        Permission::STAFF.check(Some(actor))?;
        self.find_adoption(id).await
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for adopters.
    pub async fn list_adoptions(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<Paged<Adoption>, PawHubError> {
        Permission::STAFF.check(Some(actor))?;
        self.adoptions.get_all(page).await
    }

    /// Update an adoption and carry a terminal status over to its animal.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] when the actor may not use `mode`,
    /// [`PawHubError::NotFound`] for an unknown adoption, and
    /// [`PawHubError::Validation`] for an unknown animal or a change away
    /// from a terminal status.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update_adoption(
        &self,
        actor: &Actor,
        id: AdoptionId,
        changes: AdoptionChanges,
        mode: UpdateMode,
    ) -> Result<Adoption, PawHubError> {
        match mode {
            UpdateMode::Partial => Permission::STAFF.check(Some(actor))?,
            UpdateMode::Full => Permission::ADMIN.check(Some(actor))?,
        }
        let mut adoption = self.find_adoption(id).await?;

        if let Some(animal_id) = changes.animal_id {
            if self.animals.get_by_id(animal_id).await?.is_none() {
                return Err(ValidationError::InvalidAnimal.into());
            }
            adoption.animal_id = animal_id;
        }
        let carried_status = changes.status;
        if let Some(status) = carried_status {
            adoption.status.check_transition(status)?;
            adoption.status = status;
        }

        let adoption = self.adoptions.update(adoption).await?;
        // the animal only follows an explicit status change
        if let Some(animal_status) = carried_status.and_then(AdoptionStatus::animal_status) {
            self.set_animal_status(adoption.animal_id, animal_status)
                .await?;
        }
        Ok(adoption)
    }

    /// Delete an adoption and put its animal back up for adoption
    /// (administrators only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins and
    /// [`PawHubError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_adoption(&self, actor: &Actor, id: AdoptionId) -> Result<(), PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        let adoption = self.find_adoption(id).await?;
        self.adoptions.delete(id).await?;
        self.set_animal_status(adoption.animal_id, AnimalStatus::Available)
            .await
    }

    async fn find_adoption(&self, id: AdoptionId) -> Result<Adoption, PawHubError> {
        found(self.adoptions.get_by_id(id).await?, "Adoption", id)
    }

    async fn set_animal_status(
        &self,
        animal_id: AnimalId,
        status: AnimalStatus,
    ) -> Result<(), PawHubError> {
        // the animal may have been deleted since; nothing to carry over then
        if let Some(mut animal) = self.animals.get_by_id(animal_id).await?
            && animal.status != status
        {
            animal.status = status;
            self.animals.update(animal).await?;
        }
        Ok(())
    }
}
