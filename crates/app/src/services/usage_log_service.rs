//! Usage log service: read access to the device adjustment history.

use pawhub_domain::error::PawHubError;
use pawhub_domain::id::{DeviceId, UsageLogId};
use pawhub_domain::permission::{Actor, Permission};
use pawhub_domain::usage_log::UsageLog;

use super::found;
use crate::ports::{DeviceRepository, PageRequest, Paged, UsageLogRepository};

/// Application service for usage logs.
///
/// Entries are written by [`DeviceService::adjust_quantity`]; staff see every
/// entry, other users only the entries of devices they own.
///
/// [`DeviceService::adjust_quantity`]: super::device_service::DeviceService::adjust_quantity
pub struct UsageLogService<LR, DR> {
    logs: LR,
    devices: DR,
}

impl<LR: UsageLogRepository, DR: DeviceRepository> UsageLogService<LR, DR> {
    /// Create a new service backed by the given repositories.
    pub fn new(logs: LR, devices: DR) -> Self {
        Self { logs, devices }
    }

    /// List entries visible to the actor, optionally for one device only.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_logs(
        &self,
        actor: &Actor,
        device_id: Option<DeviceId>,
        page: PageRequest,
    ) -> Result<Paged<UsageLog>, PawHubError> {
        let staff = Permission::STAFF.check(Some(actor)).is_ok();
        match device_id {
            Some(device_id) => {
                if !staff && !self.owns(actor, device_id).await? {
                    return Ok(Paged::empty());
                }
                self.logs.find_by_device(device_id, page).await
            }
            None if staff => self.logs.get_all(page).await,
            None => self.logs.find_by_owner(actor.user_id, page).await,
        }
    }

    async fn owns(&self, actor: &Actor, device_id: DeviceId) -> Result<bool, PawHubError> {
        let device = self.devices.get_by_id(device_id).await?;
        Ok(device.is_some_and(|d| d.owner_id == actor.user_id))
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for an unknown id or an entry of a
    /// device the actor does not own.
    pub async fn get_log(&self, actor: &Actor, id: UsageLogId) -> Result<UsageLog, PawHubError> {
        let log = found(self.logs.get_by_id(id).await?, "UsageLog", id)?;
        if Permission::STAFF.check(Some(actor)).is_ok() {
            return Ok(log);
        }
        if self.owns(actor, log.device_id).await? {
            Ok(log)
        } else {
            found(None, "UsageLog", id)
        }
    }

    /// Insert an entry by hand (administrators only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins and
    /// [`PawHubError::NotFound`] when the device does not exist.
    #[tracing::instrument(skip(self, actor, log), fields(device_id = %log.device_id))]
    pub async fn create_log(&self, actor: &Actor, log: UsageLog) -> Result<UsageLog, PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        found(
            self.devices.get_by_id(log.device_id).await?,
            "Device",
            log.device_id,
        )?;
        self.logs.create(log).await
    }

    /// Remove an entry (administrators only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins and
    /// [`PawHubError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_log(&self, actor: &Actor, id: UsageLogId) -> Result<(), PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        found(self.logs.get_by_id(id).await?, "UsageLog", id)?;
        self.logs.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{InMemory, InMemoryLogs, actor};
    use pawhub_domain::device::{Adjustment, Device, QuantityAction, Resource};
    use pawhub_domain::id::UserId;
    use pawhub_domain::user::UserRole;

    struct Fixture {
        svc: UsageLogService<InMemoryLogs, InMemory<Device>>,
        owner: Actor,
        device: Device,
        other: DeviceId,
    }

    async fn fixture() -> Fixture {
        let devices = InMemory::default();
        let logs = InMemoryLogs::new(devices.clone());
        let owner = actor(UserRole::Adopter);
        let device = Device::builder()
            .serial_number("SN-1")
            .name("Bowl")
            .owner_id(owner.user_id)
            .limits(10, 10)
            .build()
            .unwrap();
        devices.create(device.clone()).await.unwrap();

        let other = Device::builder()
            .serial_number("SN-2")
            .name("Other bowl")
            .owner_id(UserId::new())
            .limits(10, 10)
            .build()
            .unwrap();
        devices.create(other.clone()).await.unwrap();

        for device_id in [device.id, other.id] {
            logs.create(entry(device_id)).await.unwrap();
        }
        Fixture {
            svc: UsageLogService::new(logs, devices),
            owner,
            device,
            other: other.id,
        }
    }

    fn entry(device_id: DeviceId) -> UsageLog {
        UsageLog::record(
            device_id,
            Resource::Food,
            QuantityAction::Add,
            3,
            Adjustment {
                previous: 0,
                current: 3,
            },
        )
    }

    #[tokio::test]
    async fn should_show_staff_every_entry() {
        let f = fixture().await;
        let logs = f
            .svc
            .list_logs(&actor(UserRole::Volunteer), None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(logs.count, 2);
    }

    #[tokio::test]
    async fn should_show_owner_only_own_devices() {
        let f = fixture().await;
        let page = PageRequest::default();
        let logs = f.svc.list_logs(&f.owner, None, page).await.unwrap();
        assert_eq!(logs.count, 1);
        assert_eq!(logs.items[0].device_id, f.device.id);

        let own = f.svc.list_logs(&f.owner, Some(f.device.id), page).await.unwrap();
        assert_eq!(own.count, 1);
        let foreign = f.svc.list_logs(&f.owner, Some(f.other), page).await.unwrap();
        assert_eq!(foreign.count, 0);
        assert!(foreign.items.is_empty());
    }

    #[tokio::test]
    async fn should_hide_foreign_entry() {
        let f = fixture().await;
        let foreign = f
            .svc
            .list_logs(&actor(UserRole::Admin), None, PageRequest::default())
            .await
            .unwrap()
            .items
            .into_iter()
            .find(|l| l.device_id != f.device.id)
            .unwrap();
        assert!(matches!(
            f.svc.get_log(&f.owner, foreign.id).await,
            Err(PawHubError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_restrict_manual_entries_to_admins() {
        let f = fixture().await;
        let result = f.svc.create_log(&f.owner, entry(f.device.id)).await;
        assert!(matches!(result, Err(PawHubError::Forbidden(_))));

        let admin = actor(UserRole::Admin);
        let created = f.svc.create_log(&admin, entry(f.device.id)).await.unwrap();
        f.svc.delete_log(&admin, created.id).await.unwrap();
    }

    #[tokio::test]
    async fn should_reject_entry_for_unknown_device() {
        let f = fixture().await;
        let result = f
            .svc
            .create_log(&actor(UserRole::Admin), entry(DeviceId::new()))
            .await;
        assert!(matches!(result, Err(PawHubError::NotFound(_))));
    }
}
