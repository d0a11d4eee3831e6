//! Storage port: repository traits for persistence.
//!
//! Every method returns a `Send` future so services stay usable from
//! multi-threaded axum handlers. Lookups return `Option`/`Vec`; turning a
//! missing row into a not-found error is the service's job. Listings take a
//! [`PageRequest`] and return one [`Paged`] window, so the adapter decides
//! how to skip rows.

use std::future::Future;

use pawhub_domain::adoption::Adoption;
use pawhub_domain::animal::Animal;
use pawhub_domain::device::Device;
use pawhub_domain::error::PawHubError;
use pawhub_domain::habit::Habit;
use pawhub_domain::id::{
    AdoptionId, AnimalId, DeviceId, HabitId, NotificationId, PaymentId, RoleId, SubscriptionId,
    UsageLogId, UserId,
};
use pawhub_domain::notification::Notification;
use pawhub_domain::payment::Payment;
use pawhub_domain::role::Role;
use pawhub_domain::subscription::Subscription;
use pawhub_domain::usage_log::UsageLog;
use pawhub_domain::user::{User, UserRole};

/// Which window of a listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl PageRequest {
    /// Page size used when the caller does not name one.
    pub const DEFAULT_LIMIT: u32 = 50;
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One window of a listing together with the number of rows in the whole
/// listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    pub count: u64,
    pub items: Vec<T>,
}

impl<T> Paged<T> {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            count: 0,
            items: Vec::new(),
        }
    }
}

/// Persistence for [`User`]s.
pub trait UserRepository {
    /// Persist a new user.
    fn create(&self, user: User) -> impl Future<Output = Result<User, PawHubError>> + Send;

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, PawHubError>> + Send;

    fn get_all(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<User>, PawHubError>> + Send;

    /// Find a user by exact username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, PawHubError>> + Send;

    /// Find a user by exact email address.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, PawHubError>> + Send;

    /// List users holding `role`.
    fn find_by_role(
        &self,
        role: UserRole,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<User>, PawHubError>> + Send;

    fn update(&self, user: User) -> impl Future<Output = Result<User, PawHubError>> + Send;

    fn delete(&self, id: UserId) -> impl Future<Output = Result<(), PawHubError>> + Send;
}

/// Persistence for [`Role`]s.
pub trait RoleRepository {
    /// Persist a new role.
    fn create(&self, role: Role) -> impl Future<Output = Result<Role, PawHubError>> + Send;

    fn get_by_id(
        &self,
        id: RoleId,
    ) -> impl Future<Output = Result<Option<Role>, PawHubError>> + Send;

    fn get_all(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Role>, PawHubError>> + Send;

    /// Find a role by its lowercase name.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Role>, PawHubError>> + Send;

    fn update(&self, role: Role) -> impl Future<Output = Result<Role, PawHubError>> + Send;

    fn delete(&self, id: RoleId) -> impl Future<Output = Result<(), PawHubError>> + Send;
}

/// Persistence for [`Animal`]s.
pub trait AnimalRepository {
    /// Persist a new animal.
    fn create(&self, animal: Animal) -> impl Future<Output = Result<Animal, PawHubError>> + Send;

    fn get_by_id(
        &self,
        id: AnimalId,
    ) -> impl Future<Output = Result<Option<Animal>, PawHubError>> + Send;

    fn get_all(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Animal>, PawHubError>> + Send;

    fn update(&self, animal: Animal) -> impl Future<Output = Result<Animal, PawHubError>> + Send;

    fn delete(&self, id: AnimalId) -> impl Future<Output = Result<(), PawHubError>> + Send;
}

/// Persistence for [`Adoption`]s.
pub trait AdoptionRepository {
    /// Persist a new adoption.
    fn create(
        &self,
        adoption: Adoption,
    ) -> impl Future<Output = Result<Adoption, PawHubError>> + Send;

    fn get_by_id(
        &self,
        id: AdoptionId,
    ) -> impl Future<Output = Result<Option<Adoption>, PawHubError>> + Send;

    fn get_all(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Adoption>, PawHubError>> + Send;

    /// List the adoptions of one animal, oldest first.
    fn find_by_animal(
        &self,
        animal_id: AnimalId,
    ) -> impl Future<Output = Result<Vec<Adoption>, PawHubError>> + Send;

    fn update(
        &self,
        adoption: Adoption,
    ) -> impl Future<Output = Result<Adoption, PawHubError>> + Send;

    fn delete(&self, id: AdoptionId) -> impl Future<Output = Result<(), PawHubError>> + Send;
}

/// Persistence for [`Device`]s.
pub trait DeviceRepository {
    /// Persist a new device.
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, PawHubError>> + Send;

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, PawHubError>> + Send;

    fn get_all(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Device>, PawHubError>> + Send;

    /// Find a device by its unique serial number.
    fn find_by_serial_number(
        &self,
        serial_number: &str,
    ) -> impl Future<Output = Result<Option<Device>, PawHubError>> + Send;

    /// List the devices owned by one user.
    fn find_by_owner(
        &self,
        owner_id: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Device>, PawHubError>> + Send;

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, PawHubError>> + Send;

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), PawHubError>> + Send;
}

/// Persistence for [`UsageLog`]s.
pub trait UsageLogRepository {
    /// Persist a new usage log.
    fn create(&self, log: UsageLog) -> impl Future<Output = Result<UsageLog, PawHubError>> + Send;

    fn get_by_id(
        &self,
        id: UsageLogId,
    ) -> impl Future<Output = Result<Option<UsageLog>, PawHubError>> + Send;

    fn get_all(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<UsageLog>, PawHubError>> + Send;

    /// List the logs of devices owned by one user, newest first.
    fn find_by_owner(
        &self,
        owner_id: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<UsageLog>, PawHubError>> + Send;

    /// List the logs of one device, newest first.
    fn find_by_device(
        &self,
        device_id: DeviceId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<UsageLog>, PawHubError>> + Send;

    fn delete(&self, id: UsageLogId) -> impl Future<Output = Result<(), PawHubError>> + Send;
}

/// Persistence for [`Habit`]s.
pub trait HabitRepository {
    /// Persist a new habit.
    fn create(&self, habit: Habit) -> impl Future<Output = Result<Habit, PawHubError>> + Send;

    fn get_by_id(
        &self,
        id: HabitId,
    ) -> impl Future<Output = Result<Option<Habit>, PawHubError>> + Send;

    fn get_all(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Habit>, PawHubError>> + Send;

    /// List the habits of one animal.
    fn find_by_animal(
        &self,
        animal_id: AnimalId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Habit>, PawHubError>> + Send;

    fn update(&self, habit: Habit) -> impl Future<Output = Result<Habit, PawHubError>> + Send;

    fn delete(&self, id: HabitId) -> impl Future<Output = Result<(), PawHubError>> + Send;
}

/// Persistence for [`Notification`]s.
pub trait NotificationRepository {
    /// Persist a new notification.
    fn create(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, PawHubError>> + Send;

    fn get_by_id(
        &self,
        id: NotificationId,
    ) -> impl Future<Output = Result<Option<Notification>, PawHubError>> + Send;

    fn get_all(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Notification>, PawHubError>> + Send;

    /// List the notifications addressed to one user, newest first.
    fn find_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Notification>, PawHubError>> + Send;

    fn update(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, PawHubError>> + Send;

    fn delete(&self, id: NotificationId) -> impl Future<Output = Result<(), PawHubError>> + Send;
}

/// Persistence for [`Subscription`]s.
pub trait SubscriptionRepository {
    /// Persist a new subscription.
    fn create(
        &self,
        subscription: Subscription,
    ) -> impl Future<Output = Result<Subscription, PawHubError>> + Send;

    fn get_by_id(
        &self,
        id: SubscriptionId,
    ) -> impl Future<Output = Result<Option<Subscription>, PawHubError>> + Send;

    fn get_all(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Subscription>, PawHubError>> + Send;

    /// List the subscriptions of one user.
    fn find_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Subscription>, PawHubError>> + Send;

    fn update(
        &self,
        subscription: Subscription,
    ) -> impl Future<Output = Result<Subscription, PawHubError>> + Send;

    fn delete(&self, id: SubscriptionId) -> impl Future<Output = Result<(), PawHubError>> + Send;
}

/// Persistence for [`Payment`]s.
pub trait PaymentRepository {
    /// Persist a new payment.
    fn create(&self, payment: Payment) -> impl Future<Output = Result<Payment, PawHubError>> + Send;

    fn get_by_id(
        &self,
        id: PaymentId,
    ) -> impl Future<Output = Result<Option<Payment>, PawHubError>> + Send;

    fn get_all(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Payment>, PawHubError>> + Send;

    /// List the payments of one user.
    fn find_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Payment>, PawHubError>> + Send;

    fn update(&self, payment: Payment) -> impl Future<Output = Result<Payment, PawHubError>> + Send;

    fn delete(&self, id: PaymentId) -> impl Future<Output = Result<(), PawHubError>> + Send;
}

/// The full set of repository types a storage adapter provides.
///
/// Lets the HTTP layer stay generic over one type parameter instead of one
/// per repository. Repositories are cloned into every service that needs
/// them, so they must be cheap handles (a pool, an `Arc`).
pub trait Storage: Send + Sync + 'static {
    type Users: UserRepository + Clone + Send + Sync + 'static;
    type Roles: RoleRepository + Clone + Send + Sync + 'static;
    type Animals: AnimalRepository + Clone + Send + Sync + 'static;
    type Adoptions: AdoptionRepository + Clone + Send + Sync + 'static;
    type Devices: DeviceRepository + Clone + Send + Sync + 'static;
    type UsageLogs: UsageLogRepository + Clone + Send + Sync + 'static;
    type Habits: HabitRepository + Clone + Send + Sync + 'static;
    type Notifications: NotificationRepository + Clone + Send + Sync + 'static;
    type Subscriptions: SubscriptionRepository + Clone + Send + Sync + 'static;
    type Payments: PaymentRepository + Clone + Send + Sync + 'static;
}

/// One instance of every repository of a [`Storage`].
pub struct Repositories<S: Storage> {
    pub users: S::Users,
    pub roles: S::Roles,
    pub animals: S::Animals,
    pub adoptions: S::Adoptions,
    pub devices: S::Devices,
    pub usage_logs: S::UsageLogs,
    pub habits: S::Habits,
    pub notifications: S::Notifications,
    pub subscriptions: S::Subscriptions,
    pub payments: S::Payments,
}
