//! Adoption: the record linking an animal to its adopter.

use serde::{Deserialize, Serialize};

use crate::animal::AnimalStatus;
use crate::choice::define_choice;
use crate::error::ValidationError;
use crate::id::{AdoptionId, AnimalId, UserId};
use crate::time::{Timestamp, now};

define_choice!(
    /// Progress of an adoption. `COMPLETED` and `CANCELLED` are terminal.
    AdoptionStatus {
        Pending => "PENDING",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    } default Pending
);

impl AdoptionStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// The animal status implied by reaching this adoption status, if any.
    #[must_use]
    pub fn animal_status(self) -> Option<AnimalStatus> {
        match self {
            Self::Pending => None,
            Self::Completed => Some(AnimalStatus::Adopted),
            Self::Cancelled => Some(AnimalStatus::Available),
        }
    }

    /// Check that an adoption may move from `self` to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Transition`] when `self` is terminal and
    /// `next` differs from it.
    pub fn check_transition(self, next: Self) -> Result<(), ValidationError> {
        if self == next || !self.is_terminal() {
            return Ok(());
        }
        Err(ValidationError::Transition {
            kind: "adoption",
            from: self.as_str(),
            to: next.as_str(),
        })
    }
}

/// An adoption of one animal by one adopter, processed by a volunteer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adoption {
    pub id: AdoptionId,
    pub animal_id: AnimalId,
    pub adopter_id: UserId,
    pub volunteer_id: UserId,
    pub date: Timestamp,
    pub status: AdoptionStatus,
}

impl Adoption {
    /// Start a new adoption dated now.
    #[must_use]
    pub fn new(
        animal_id: AnimalId,
        adopter_id: UserId,
        volunteer_id: UserId,
        status: AdoptionStatus,
    ) -> Self {
        Self {
            id: AdoptionId::new(),
            animal_id,
            adopter_id,
            volunteer_id,
            date: now(),
            status,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == AdoptionStatus::Pending
    }
}
