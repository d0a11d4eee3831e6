//! Habit service: routines recorded for animals.

use chrono::NaiveTime;
use pawhub_domain::error::{PawHubError, ValidationError};
use pawhub_domain::habit::{Habit, HabitActivity};
use pawhub_domain::id::{AnimalId, DeviceId, HabitId};
use pawhub_domain::permission::{Actor, Permission};

use super::found;
use crate::ports::{AnimalRepository, DeviceRepository, HabitRepository, PageRequest, Paged};

/// Input for recording a habit.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub animal_id: AnimalId,
    pub device_id: Option<DeviceId>,
    pub activity: HabitActivity,
    pub notes: String,
    pub scheduled_time: Option<NaiveTime>,
    pub times_per_day: Option<u32>,
}

/// Fields that may change on a habit. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct HabitChanges {
    pub device_id: Option<Option<DeviceId>>,
    pub activity: Option<HabitActivity>,
    pub notes: Option<String>,
    pub scheduled_time: Option<Option<NaiveTime>>,
    pub times_per_day: Option<u32>,
}

/// Application service for habits. Anyone signed in may read; staff write.
pub struct HabitService<HR, AR, DR> {
    habits: HR,
    animals: AR,
    devices: DR,
}

impl<HR, AR, DR> HabitService<HR, AR, DR>
where
    HR: HabitRepository,
    AR: AnimalRepository,
    DR: DeviceRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(habits: HR, animals: AR, devices: DR) -> Self {
        Self {
            habits,
            animals,
            devices,
        }
    }

    /// List habits, optionally for one animal only.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_habits(
        &self,
        animal_id: Option<AnimalId>,
        page: PageRequest,
    ) -> Result<Paged<Habit>, PawHubError> {
        match animal_id {
            Some(animal_id) => self.habits.find_by_animal(animal_id, page).await,
            None => self.habits.get_all(page).await,
        }
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] when no habit with `id` exists.
    pub async fn get_habit(&self, id: HabitId) -> Result<Habit, PawHubError> {
        found(self.habits.get_by_id(id).await?, "Habit", id)
    }

    /// Record a habit for an existing animal (staff only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for adopters,
    /// [`PawHubError::NotFound`] for an unknown animal, and
    /// [`PawHubError::Validation`] for an unknown device or a zero frequency.
    #[tracing::instrument(skip(self, actor, new), fields(animal_id = %new.animal_id))]
    pub async fn create_habit(&self, actor: &Actor, new: NewHabit) -> Result<Habit, PawHubError> {
        Permission::STAFF.check(Some(actor))?;
        found(
            self.animals.get_by_id(new.animal_id).await?,
            "Animal",
            new.animal_id,
        )?;
        if let Some(device_id) = new.device_id {
            self.ensure_device_exists(device_id).await?;
        }

        let mut habit = Habit::new(new.animal_id, new.activity);
        habit.device_id = new.device_id;
        habit.notes = new.notes;
        habit.scheduled_time = new.scheduled_time;
        if let Some(times) = new.times_per_day {
            habit.times_per_day = times;
        }
        habit.validate()?;
        self.habits.create(habit).await
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for adopters,
    /// [`PawHubError::NotFound`] for an unknown id, and
    /// [`PawHubError::Validation`] for an unknown device or a zero frequency.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update_habit(
        &self,
        actor: &Actor,
        id: HabitId,
        changes: HabitChanges,
    ) -> Result<Habit, PawHubError> {
        Permission::STAFF.check(Some(actor))?;
        let mut habit = self.get_habit(id).await?;
        if let Some(device_id) = changes.device_id {
            if let Some(device_id) = device_id {
                self.ensure_device_exists(device_id).await?;
            }
            habit.device_id = device_id;
        }
        if let Some(activity) = changes.activity {
            habit.activity = activity;
        }
        if let Some(notes) = changes.notes {
            habit.notes = notes;
        }
        if let Some(scheduled_time) = changes.scheduled_time {
            habit.scheduled_time = scheduled_time;
        }
        if let Some(times) = changes.times_per_day {
            habit.times_per_day = times;
        }
        habit.validate()?;
        self.habits.update(habit).await
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for adopters and
    /// [`PawHubError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_habit(&self, actor: &Actor, id: HabitId) -> Result<(), PawHubError> {
        Permission::STAFF.check(Some(actor))?;
        self.get_habit(id).await?;
        self.habits.delete(id).await
    }

    async fn ensure_device_exists(&self, device_id: DeviceId) -> Result<(), PawHubError> {
        match self.devices.get_by_id(device_id).await? {
            Some(_) => Ok(()),
            None => Err(ValidationError::Invalid { field: "device" }.into()),
        }
    }
}
