//! Animal: a sheltered pet and the status that drives its adoption.

use serde::{Deserialize, Serialize};

use crate::choice::define_choice;
use crate::error::{PawHubError, ValidationError};
use crate::id::{AnimalId, UserId};

define_choice!(
    /// Species handled by the shelter.
    AnimalType {
        Dog => "DOG",
        Cat => "CAT",
    }
);

define_choice!(
    /// Adoption status of an animal. Moves AVAILABLE → PENDING → ADOPTED.
    AnimalStatus {
        Available => "AVAILABLE",
        Pending => "PENDING",
        Adopted => "ADOPTED",
    } default Available
);

/// What an accepted status change means for the animal's adoption record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Same status; nothing to do.
    Unchanged,
    /// Now `PENDING`: an open adoption must exist.
    Reserve,
    /// Now `ADOPTED`: the adoption must exist and be completed.
    Adopt,
    /// Back from `PENDING` to `AVAILABLE`: the open adoption is cancelled.
    Release,
}

impl AnimalStatus {
    /// Classify a status change requested through an animal update.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Transition`] when leaving `ADOPTED`; that
    /// move goes through the adoption record instead.
    pub fn transition_to(self, next: Self) -> Result<StatusChange, ValidationError> {
        match (self, next) {
            (from, to) if from == to => Ok(StatusChange::Unchanged),
            (Self::Available, Self::Pending) => Ok(StatusChange::Reserve),
            (Self::Available | Self::Pending, Self::Adopted) => Ok(StatusChange::Adopt),
            (Self::Pending, Self::Available) => Ok(StatusChange::Release),
            (from, to) => Err(ValidationError::Transition {
                kind: "animal",
                from: from.as_str(),
                to: to.as_str(),
            }),
        }
    }
}

/// A sheltered animal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    pub name: String,
    pub age: u32,
    pub breed: String,
    pub animal_type: AnimalType,
    pub status: AnimalStatus,
    /// The user who registered the animal.
    pub volunteer_id: UserId,
}

impl Animal {
    /// Create a builder for constructing an [`Animal`].
    #[must_use]
    pub fn builder() -> AnimalBuilder {
        AnimalBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] when `name` or `breed` is blank.
    pub fn validate(&self) -> Result<(), PawHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" }.into());
        }
        if self.breed.trim().is_empty() {
            return Err(ValidationError::Empty { field: "breed" }.into());
        }
        Ok(())
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == AnimalStatus::Available
    }
}

/// Step-by-step builder for [`Animal`].
#[derive(Debug, Default)]
pub struct AnimalBuilder {
    id: Option<AnimalId>,
    name: Option<String>,
    age: u32,
    breed: Option<String>,
    animal_type: Option<AnimalType>,
    status: Option<AnimalStatus>,
    volunteer_id: Option<UserId>,
}

impl AnimalBuilder {
    #[must_use]
    pub fn id(mut self, id: AnimalId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    #[must_use]
    pub fn breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    #[must_use]
    pub fn animal_type(mut self, animal_type: AnimalType) -> Self {
        self.animal_type = Some(animal_type);
        self
    }

    #[must_use]
    pub fn status(mut self, status: AnimalStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn volunteer_id(mut self, volunteer_id: UserId) -> Self {
        self.volunteer_id = Some(volunteer_id);
        self
    }

    /// Consume the builder, validate, and return an [`Animal`].
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] if a required field is missing
    /// or blank.
    pub fn build(self) -> Result<Animal, PawHubError> {
        let animal = Animal {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            age: self.age,
            breed: self.breed.unwrap_or_default(),
            animal_type: self
                .animal_type
                .ok_or(ValidationError::Empty { field: "animal_type" })?,
            status: self.status.unwrap_or_default(),
            volunteer_id: self
                .volunteer_id
                .ok_or(ValidationError::Empty { field: "volunteer" })?,
        };
        animal.validate()?;
        Ok(animal)
    }
}
