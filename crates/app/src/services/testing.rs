//! In-memory port fakes shared by the service tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use pawhub_domain::adoption::Adoption;
use pawhub_domain::animal::Animal;
use pawhub_domain::device::Device;
use pawhub_domain::error::{AuthError, PawHubError};
use pawhub_domain::habit::Habit;
use pawhub_domain::id::{
    AdoptionId, AnimalId, DeviceId, HabitId, NotificationId, PaymentId, RoleId, SubscriptionId,
    UsageLogId, UserId,
};
use pawhub_domain::notification::Notification;
use pawhub_domain::payment::Payment;
use pawhub_domain::permission::Actor;
use pawhub_domain::role::Role;
use pawhub_domain::subscription::Subscription;
use pawhub_domain::usage_log::UsageLog;
use pawhub_domain::user::{User, UserRole};

use crate::ports::{
    AdoptionRepository, AnimalRepository, Authenticator, DeviceRepository, HabitRepository,
    NotificationRepository, PageRequest, Paged, PaymentRepository, RoleRepository,
    SubscriptionRepository, TokenKind, UsageLogRepository, UserRepository,
};

/// Cheaply cloneable table; clones share rows so two services can see the
/// same data.
pub struct InMemory<T> {
    rows: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for InMemory<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<T> Default for InMemory<T> {
    fn default() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone> InMemory<T> {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<T> {
        self.rows.lock().unwrap().clone()
    }

    fn insert(&self, value: T) {
        self.rows.lock().unwrap().push(value);
    }

    fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.lock().unwrap().iter().find(|v| pred(v)).cloned()
    }

    fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|v| pred(v))
            .cloned()
            .collect()
    }

    fn page(&self, pred: impl Fn(&T) -> bool, page: PageRequest) -> Paged<T> {
        window(self.filter(pred), page)
    }

    fn replace(&self, pred: impl Fn(&T) -> bool, value: T) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(slot) = rows.iter_mut().find(|v| pred(v)) {
            *slot = value;
        }
    }

    fn remove(&self, pred: impl Fn(&T) -> bool) {
        self.rows.lock().unwrap().retain(|v| !pred(v));
    }
}

fn window<T>(rows: Vec<T>, page: PageRequest) -> Paged<T> {
    Paged {
        count: u64::try_from(rows.len()).unwrap(),
        items: rows
            .into_iter()
            .skip(usize::try_from(page.offset).unwrap())
            .take(usize::try_from(page.limit).unwrap())
            .collect(),
    }
}

macro_rules! crud {
    ($ty:ty, $id:ty) => {
        fn create(&self, value: $ty) -> impl Future<Output = Result<$ty, PawHubError>> + Send {
            self.insert(value.clone());
            async move { Ok(value) }
        }

        fn get_by_id(
            &self,
            id: $id,
        ) -> impl Future<Output = Result<Option<$ty>, PawHubError>> + Send {
            let found = self.find(|v| v.id == id);
            async move { Ok(found) }
        }

        fn get_all(
            &self,
            page: PageRequest,
        ) -> impl Future<Output = Result<Paged<$ty>, PawHubError>> + Send {
            let found = self.page(|_| true, page);
            async move { Ok(found) }
        }

        fn delete(&self, id: $id) -> impl Future<Output = Result<(), PawHubError>> + Send {
            self.remove(|v| v.id == id);
            async { Ok(()) }
        }
    };
}

macro_rules! update {
    ($ty:ty) => {
        fn update(&self, value: $ty) -> impl Future<Output = Result<$ty, PawHubError>> + Send {
            let id = value.id;
            self.replace(|v| v.id == id, value.clone());
            async move { Ok(value) }
        }
    };
}

impl UserRepository for InMemory<User> {
    crud!(User, UserId);
    update!(User);

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, PawHubError>> + Send {
        let found = self.find(|u| u.username == username);
        async move { Ok(found) }
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, PawHubError>> + Send {
        let found = self.find(|u| u.email == email);
        async move { Ok(found) }
    }

    fn find_by_role(
        &self,
        role: UserRole,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<User>, PawHubError>> + Send {
        let found = self.page(|u| u.role == role, page);
        async move { Ok(found) }
    }
}

impl RoleRepository for InMemory<Role> {
    crud!(Role, RoleId);
    update!(Role);

    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Role>, PawHubError>> + Send {
        let found = self.find(|r| r.name == name);
        async move { Ok(found) }
    }
}

impl AnimalRepository for InMemory<Animal> {
    crud!(Animal, AnimalId);
    update!(Animal);
}

impl AdoptionRepository for InMemory<Adoption> {
    crud!(Adoption, AdoptionId);
    update!(Adoption);

    fn find_by_animal(
        &self,
        animal_id: AnimalId,
    ) -> impl Future<Output = Result<Vec<Adoption>, PawHubError>> + Send {
        let found = self.filter(|a| a.animal_id == animal_id);
        async move { Ok(found) }
    }
}

impl DeviceRepository for InMemory<Device> {
    crud!(Device, DeviceId);
    update!(Device);

    fn find_by_serial_number(
        &self,
        serial_number: &str,
    ) -> impl Future<Output = Result<Option<Device>, PawHubError>> + Send {
        let found = self.find(|d| d.serial_number == serial_number);
        async move { Ok(found) }
    }

    fn find_by_owner(
        &self,
        owner_id: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Device>, PawHubError>> + Send {
        let found = self.page(|d| d.owner_id == owner_id, page);
        async move { Ok(found) }
    }
}

/// Usage logs next to the device table they hang off, so that owner
/// listings can resolve which devices a user owns.
#[derive(Clone, Default)]
pub struct InMemoryLogs {
    pub logs: InMemory<UsageLog>,
    pub devices: InMemory<Device>,
}

impl InMemoryLogs {
    pub fn new(devices: InMemory<Device>) -> Self {
        Self {
            logs: InMemory::default(),
            devices,
        }
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    fn newest_first(
        &self,
        pred: impl Fn(&UsageLog) -> bool,
        page: PageRequest,
    ) -> Paged<UsageLog> {
        let mut found = self.logs.filter(pred);
        found.reverse();
        window(found, page)
    }
}

impl UsageLogRepository for InMemoryLogs {
    fn create(&self, log: UsageLog) -> impl Future<Output = Result<UsageLog, PawHubError>> + Send {
        self.logs.insert(log.clone());
        async move { Ok(log) }
    }

    fn get_by_id(
        &self,
        id: UsageLogId,
    ) -> impl Future<Output = Result<Option<UsageLog>, PawHubError>> + Send {
        let found = self.logs.find(|l| l.id == id);
        async move { Ok(found) }
    }

    fn get_all(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<UsageLog>, PawHubError>> + Send {
        let found = self.newest_first(|_| true, page);
        async move { Ok(found) }
    }

    fn find_by_device(
        &self,
        device_id: DeviceId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<UsageLog>, PawHubError>> + Send {
        let found = self.newest_first(|l| l.device_id == device_id, page);
        async move { Ok(found) }
    }

    fn find_by_owner(
        &self,
        owner_id: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<UsageLog>, PawHubError>> + Send {
        let owned: Vec<DeviceId> = self
            .devices
            .filter(|d| d.owner_id == owner_id)
            .into_iter()
            .map(|d| d.id)
            .collect();
        let found = self.newest_first(|l| owned.contains(&l.device_id), page);
        async move { Ok(found) }
    }

    fn delete(&self, id: UsageLogId) -> impl Future<Output = Result<(), PawHubError>> + Send {
        self.logs.remove(|l| l.id == id);
        async { Ok(()) }
    }
}

impl HabitRepository for InMemory<Habit> {
    crud!(Habit, HabitId);
    update!(Habit);

    fn find_by_animal(
        &self,
        animal_id: AnimalId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Habit>, PawHubError>> + Send {
        let found = self.page(|h| h.animal_id == animal_id, page);
        async move { Ok(found) }
    }
}

impl NotificationRepository for InMemory<Notification> {
    crud!(Notification, NotificationId);
    update!(Notification);

    fn find_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Notification>, PawHubError>> + Send {
        let found = self.page(|n| n.user_id == user_id, page);
        async move { Ok(found) }
    }
}

impl SubscriptionRepository for InMemory<Subscription> {
    crud!(Subscription, SubscriptionId);
    update!(Subscription);

    fn find_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Subscription>, PawHubError>> + Send {
        let found = self.page(|s| s.user_id == user_id, page);
        async move { Ok(found) }
    }
}

impl PaymentRepository for InMemory<Payment> {
    crud!(Payment, PaymentId);
    update!(Payment);

    fn find_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Payment>, PawHubError>> + Send {
        let found = self.page(|p| p.user_id == user_id, page);
        async move { Ok(found) }
    }
}

/// Reversible "hashing" and `kind:user-id` tokens, good enough to exercise
/// the service logic without real crypto.
#[derive(Clone, Copy, Default)]
pub struct PlainAuthenticator;

impl Authenticator for PlainAuthenticator {
    async fn hash_password(&self, password: &str) -> Result<String, PawHubError> {
        Ok(format!("plain:{password}"))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain:") == Some(password)
    }

    fn issue_token(&self, user: &User, kind: TokenKind) -> Result<String, PawHubError> {
        Ok(format!("{kind:?}:{}", user.id))
    }

    fn verify_token(&self, token: &str, kind: TokenKind) -> Result<UserId, PawHubError> {
        let prefix = format!("{kind:?}:");
        token
            .strip_prefix(&prefix)
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| AuthError::InvalidToken.into())
    }
}

pub fn actor(role: UserRole) -> Actor {
    Actor::new(UserId::new(), role)
}
