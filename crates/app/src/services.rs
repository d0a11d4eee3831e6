//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! Role gates are checked here, before any repository call.

pub mod adoption_service;
pub mod animal_service;
pub mod device_service;
pub mod habit_service;
pub mod notification_service;
pub mod payment_service;
pub mod role_service;
pub mod subscription_service;
pub mod usage_log_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod testing;

use pawhub_domain::error::{NotFoundError, PawHubError};

/// Turn a missing row into [`PawHubError::NotFound`].
fn found<T>(value: Option<T>, entity: &'static str, id: impl ToString) -> Result<T, PawHubError> {
    value.ok_or_else(|| {
        NotFoundError {
            entity,
            id: id.to_string(),
        }
        .into()
    })
}
