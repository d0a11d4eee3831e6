//! # pawhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `pawhub-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `pawhub-app` (for port traits) and `pawhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod adoption_repo;
mod animal_repo;
mod device_repo;
mod error;
mod habit_repo;
mod notification_repo;
mod payment_repo;
mod pool;
mod role_repo;
mod row;
mod subscription_repo;
mod usage_log_repo;
mod user_repo;

#[cfg(test)]
mod testing;

pub use adoption_repo::SqliteAdoptionRepository;
pub use animal_repo::SqliteAnimalRepository;
pub use device_repo::SqliteDeviceRepository;
pub use error::StorageError;
pub use habit_repo::SqliteHabitRepository;
pub use notification_repo::SqliteNotificationRepository;
pub use payment_repo::SqlitePaymentRepository;
pub use pool::{Config, Database};
pub use role_repo::SqliteRoleRepository;
pub use subscription_repo::SqliteSubscriptionRepository;
pub use usage_log_repo::SqliteUsageLogRepository;
pub use user_repo::SqliteUserRepository;

use pawhub_app::ports::{Repositories, Storage};

/// The `SQLite` family of repositories.
pub struct SqliteStorage;

impl Storage for SqliteStorage {
    type Users = SqliteUserRepository;
    type Roles = SqliteRoleRepository;
    type Animals = SqliteAnimalRepository;
    type Adoptions = SqliteAdoptionRepository;
    type Devices = SqliteDeviceRepository;
    type UsageLogs = SqliteUsageLogRepository;
    type Habits = SqliteHabitRepository;
    type Notifications = SqliteNotificationRepository;
    type Subscriptions = SqliteSubscriptionRepository;
    type Payments = SqlitePaymentRepository;
}

impl Database {
    /// One repository per table, all sharing this database's pool.
    #[must_use]
    pub fn repositories(&self) -> Repositories<SqliteStorage> {
        let pool = self.pool();
        Repositories {
            users: SqliteUserRepository::new(pool.clone()),
            roles: SqliteRoleRepository::new(pool.clone()),
            animals: SqliteAnimalRepository::new(pool.clone()),
            adoptions: SqliteAdoptionRepository::new(pool.clone()),
            devices: SqliteDeviceRepository::new(pool.clone()),
            usage_logs: SqliteUsageLogRepository::new(pool.clone()),
            habits: SqliteHabitRepository::new(pool.clone()),
            notifications: SqliteNotificationRepository::new(pool.clone()),
            subscriptions: SqliteSubscriptionRepository::new(pool.clone()),
            payments: SqlitePaymentRepository::new(pool.clone()),
        }
    }
}
