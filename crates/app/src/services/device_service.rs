//! Device service: feeder/waterer CRUD and the quantity adjustment use-case.

use pawhub_domain::device::{Device, QuantityAction, Resource};
use pawhub_domain::error::{NotFoundError, PawHubError, ValidationError};
use pawhub_domain::id::{AnimalId, DeviceId, UserId};
use pawhub_domain::permission::{Actor, Permission};
use pawhub_domain::usage_log::UsageLog;

use super::found;
use crate::ports::{
    AnimalRepository, DeviceRepository, PageRequest, Paged, UsageLogRepository, UserRepository,
};

/// Input for registering a device.
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub serial_number: String,
    pub name: String,
    /// Only administrators may register a device for someone else.
    pub owner_id: Option<UserId>,
    pub animal_id: Option<AnimalId>,
    pub food_limit: u32,
    pub water_limit: u32,
    pub food_quantity: u32,
    pub water_quantity: u32,
}

/// Fields that may change on a device. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct DeviceChanges {
    pub serial_number: Option<String>,
    pub name: Option<String>,
    pub owner_id: Option<UserId>,
    pub animal_id: Option<Option<AnimalId>>,
    pub food_limit: Option<u32>,
    pub water_limit: Option<u32>,
    pub food_quantity: Option<u32>,
    pub water_quantity: Option<u32>,
}

/// A quantity adjustment reported by a device, addressed by serial number.
#[derive(Debug, Clone)]
pub struct QuantityRequest {
    pub serial_number: String,
    pub resource: Resource,
    pub action: QuantityAction,
    pub amount: u32,
}

/// Application service for devices.
///
/// The animal and user repositories are only read, to check the rows a
/// device refers to.
pub struct DeviceService<DR, LR, AR, UR> {
    devices: DR,
    logs: LR,
    animals: AR,
    users: UR,
}

impl<DR, LR, AR, UR> DeviceService<DR, LR, AR, UR>
where
    DR: DeviceRepository,
    LR: UsageLogRepository,
    AR: AnimalRepository,
    UR: UserRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(devices: DR, logs: LR, animals: AR, users: UR) -> Self {
        Self {
            devices,
            logs,
            animals,
            users,
        }
    }

    /// Register a device owned by the actor, or by `owner_id` for admins.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] when a non-admin names another
    /// owner, and [`PawHubError::Validation`] for invalid fields, an unknown
    /// owner or animal, or a serial number already in use.
    #[tracing::instrument(skip(self, actor, new), fields(serial_number = %new.serial_number))]
    pub async fn create_device(&self, actor: &Actor, new: NewDevice) -> Result<Device, PawHubError> {
        Permission::IsAuthenticated.check(Some(actor))?;
        let owner_id = new.owner_id.unwrap_or(actor.user_id);
        actor.require_owner_or_admin(owner_id)?;
        if owner_id != actor.user_id {
            self.ensure_owner_exists(owner_id).await?;
        }
        if let Some(animal_id) = new.animal_id {
            self.ensure_animal_exists(animal_id).await?;
        }

        let mut builder = Device::builder()
            .serial_number(new.serial_number)
            .name(new.name)
            .owner_id(owner_id)
            .limits(new.food_limit, new.water_limit)
            .quantities(new.food_quantity, new.water_quantity);
        if let Some(animal_id) = new.animal_id {
            builder = builder.animal_id(animal_id);
        }
        let device = builder.build()?;
        self.ensure_unique(&device).await?;
        self.devices.create(device).await
    }

    /// Look up a device the actor may see.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for an unknown id or a device owned
    /// by someone else.
    pub async fn get_device(&self, actor: &Actor, id: DeviceId) -> Result<Device, PawHubError> {
        let device = self.find_device(id).await?;
        if actor.require_owner_or_admin(device.owner_id).is_err() {
            return Err(not_found(id));
        }
        Ok(device)
    }

    /// List every device for admins, otherwise the actor's own.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_devices(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<Paged<Device>, PawHubError> {
        if actor.is_admin() {
            self.devices.get_all(page).await
        } else {
            self.devices.find_by_owner(actor.user_id, page).await
        }
    }

    /// Apply `changes` to a device the actor may see.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for a device the actor may not see,
    /// [`PawHubError::Forbidden`] when a non-admin reassigns the owner, and
    /// [`PawHubError::Validation`] for invalid fields or an unknown owner or
    /// animal.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update_device(
        &self,
        actor: &Actor,
        id: DeviceId,
        changes: DeviceChanges,
    ) -> Result<Device, PawHubError> {
        let mut device = self.get_device(actor, id).await?;

        if let Some(owner_id) = changes.owner_id {
            actor.require_owner_or_admin(owner_id)?;
            if owner_id != device.owner_id {
                self.ensure_owner_exists(owner_id).await?;
            }
            device.owner_id = owner_id;
        }
        if let Some(serial_number) = changes.serial_number {
            device.serial_number = serial_number;
        }
        if let Some(name) = changes.name {
            device.name = name;
        }
        if let Some(animal_id) = changes.animal_id {
            if let Some(animal_id) = animal_id {
                self.ensure_animal_exists(animal_id).await?;
            }
            device.animal_id = animal_id;
        }
        if let Some(limit) = changes.food_limit {
            device.food_limit = limit;
        }
        if let Some(limit) = changes.water_limit {
            device.water_limit = limit;
        }
        if let Some(quantity) = changes.food_quantity {
            device.food_quantity = quantity;
        }
        if let Some(quantity) = changes.water_quantity {
            device.water_quantity = quantity;
        }

        device.validate()?;
        self.ensure_unique(&device).await?;
        self.devices.update(device).await
    }

    /// Delete a device the actor may see.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for a device the actor may not see.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_device(&self, actor: &Actor, id: DeviceId) -> Result<(), PawHubError> {
        self.get_device(actor, id).await?;
        self.devices.delete(id).await
    }

    /// Add or subtract food or water on the device with the given serial
    /// number and append a usage log entry for it.
    ///
    /// The caller is trusted; the API key check happens at the edge.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for an unknown serial number and
    /// [`PawHubError::Validation`] when `amount` is zero.
    #[tracing::instrument(skip(self, request), fields(serial_number = %request.serial_number))]
    pub async fn adjust_quantity(
        &self,
        request: QuantityRequest,
    ) -> Result<(Device, UsageLog), PawHubError> {
        let mut device = self
            .devices
            .find_by_serial_number(&request.serial_number)
            .await?
            .ok_or_else(|| not_found(&request.serial_number))?;

        let adjustment = device.adjust(request.resource, request.action, request.amount)?;
        let device = self.devices.update(device).await?;
        let log = UsageLog::record(
            device.id,
            request.resource,
            request.action,
            request.amount,
            adjustment,
        );
        let log = self.logs.create(log).await?;

        tracing::info!(
            device_id = %device.id,
            resource = %request.resource,
            previous = adjustment.previous,
            current = adjustment.current,
            "quantity adjusted"
        );
        Ok((device, log))
    }

    async fn find_device(&self, id: DeviceId) -> Result<Device, PawHubError> {
        found(self.devices.get_by_id(id).await?, "Device", id)
    }

    async fn ensure_owner_exists(&self, owner_id: UserId) -> Result<(), PawHubError> {
        match self.users.get_by_id(owner_id).await? {
            Some(_) => Ok(()),
            None => Err(ValidationError::Invalid { field: "owner" }.into()),
        }
    }

    async fn ensure_animal_exists(&self, animal_id: AnimalId) -> Result<(), PawHubError> {
        match self.animals.get_by_id(animal_id).await? {
            Some(_) => Ok(()),
            None => Err(ValidationError::Invalid { field: "animal" }.into()),
        }
    }

    async fn ensure_unique(&self, device: &Device) -> Result<(), PawHubError> {
        match self
            .devices
            .find_by_serial_number(&device.serial_number)
            .await?
        {
            Some(other) if other.id != device.id => Err(ValidationError::Duplicate {
                field: "serial_number",
            }
            .into()),
            _ => Ok(()),
        }
    }
}

fn not_found(id: impl ToString) -> PawHubError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}
