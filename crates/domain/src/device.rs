//! Device: an IoT feeder/waterer reporting food and water levels.

use serde::{Deserialize, Serialize};

use crate::choice::define_choice;
use crate::error::{PawHubError, ValidationError};
use crate::id::{AnimalId, DeviceId, UserId};
use crate::time::{Timestamp, now};

define_choice!(
    /// A consumable tracked by a device.
    Resource {
        Food => "FOOD",
        Water => "WATER",
    }
);

define_choice!(
    /// Direction of a quantity adjustment.
    QuantityAction {
        Add => "ADD",
        Subtract => "SUBTRACT",
    }
);

/// Quantities before and after an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub previous: u32,
    pub current: u32,
}

/// A registered feeder or waterer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub serial_number: String,
    pub name: String,
    pub owner_id: UserId,
    pub animal_id: Option<AnimalId>,
    pub food_limit: u32,
    pub water_limit: u32,
    pub food_quantity: u32,
    pub water_quantity: u32,
    pub created_at: Timestamp,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] when the serial number is blank or
    /// a quantity exceeds its limit.
    pub fn validate(&self) -> Result<(), PawHubError> {
        if self.serial_number.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "serial_number",
            }
            .into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" }.into());
        }
        if self.food_quantity > self.food_limit {
            return Err(ValidationError::OverLimit {
                field: "food_quantity",
            }
            .into());
        }
        if self.water_quantity > self.water_limit {
            return Err(ValidationError::OverLimit {
                field: "water_quantity",
            }
            .into());
        }
        Ok(())
    }

    #[must_use]
    pub fn quantity(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Food => self.food_quantity,
            Resource::Water => self.water_quantity,
        }
    }

    #[must_use]
    pub fn limit(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Food => self.food_limit,
            Resource::Water => self.water_limit,
        }
    }

    fn quantity_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Food => &mut self.food_quantity,
            Resource::Water => &mut self.water_quantity,
        }
    }

    /// Add or subtract `amount` of `resource`, clamping to `[0, limit]`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotPositive`] when `amount` is zero.
    pub fn adjust(
        &mut self,
        resource: Resource,
        action: QuantityAction,
        amount: u32,
    ) -> Result<Adjustment, ValidationError> {
        if amount == 0 {
            return Err(ValidationError::NotPositive { field: "amount" });
        }
        let limit = self.limit(resource);
        let slot = self.quantity_mut(resource);
        let previous = *slot;
        *slot = match action {
            QuantityAction::Add => previous.saturating_add(amount).min(limit),
            QuantityAction::Subtract => previous.saturating_sub(amount),
        };
        Ok(Adjustment {
            previous,
            current: *slot,
        })
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    serial_number: Option<String>,
    name: Option<String>,
    owner_id: Option<UserId>,
    animal_id: Option<AnimalId>,
    food_limit: u32,
    water_limit: u32,
    food_quantity: u32,
    water_quantity: u32,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn owner_id(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub fn animal_id(mut self, animal_id: AnimalId) -> Self {
        self.animal_id = Some(animal_id);
        self
    }

    #[must_use]
    pub fn limits(mut self, food: u32, water: u32) -> Self {
        self.food_limit = food;
        self.water_limit = water;
        self
    }

    #[must_use]
    pub fn quantities(mut self, food: u32, water: u32) -> Self {
        self.food_quantity = food;
        self.water_quantity = water;
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] if the owner is missing or an
    /// invariant fails.
    pub fn build(self) -> Result<Device, PawHubError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            serial_number: self.serial_number.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            owner_id: self.owner_id.ok_or(ValidationError::Empty { field: "owner" })?,
            animal_id: self.animal_id,
            food_limit: self.food_limit,
            water_limit: self.water_limit,
            food_quantity: self.food_quantity,
            water_quantity: self.water_quantity,
            created_at: now(),
        };
        device.validate()?;
        Ok(device)
    }
}
