//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod auth;
pub mod storage;

pub use auth::{Authenticator, TokenKind, TokenPair};
pub use storage::{
    AdoptionRepository, AnimalRepository, DeviceRepository, HabitRepository,
    NotificationRepository, PageRequest, Paged, PaymentRepository, Repositories, RoleRepository,
    Storage, SubscriptionRepository, UsageLogRepository, UserRepository,
};
