//! Habit: an observed or scheduled routine of an animal.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::choice::define_choice;
use crate::error::{PawHubError, ValidationError};
use crate::id::{AnimalId, DeviceId, HabitId};
use crate::time::{Timestamp, now};

define_choice!(
    /// Kind of routine.
    HabitActivity {
        Eating => "EATING",
        Drinking => "DRINKING",
        Sleeping => "SLEEPING",
        Walking => "WALKING",
        Playing => "PLAYING",
        Other => "OTHER",
    }
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub animal_id: AnimalId,
    pub device_id: Option<DeviceId>,
    pub activity: HabitActivity,
    pub notes: String,
    pub scheduled_time: Option<NaiveTime>,
    pub times_per_day: u32,
    pub created_at: Timestamp,
}

impl Habit {
    /// Create a habit observed once a day.
    #[must_use]
    pub fn new(animal_id: AnimalId, activity: HabitActivity) -> Self {
        Self {
            id: HabitId::new(),
            animal_id,
            device_id: None,
            activity,
            notes: String::new(),
            scheduled_time: None,
            times_per_day: 1,
            created_at: now(),
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] when `times_per_day` is zero.
    pub fn validate(&self) -> Result<(), PawHubError> {
        if self.times_per_day == 0 {
            return Err(ValidationError::NotPositive {
                field: "times_per_day",
            }
            .into());
        }
        Ok(())
    }
}
