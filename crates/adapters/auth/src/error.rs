//! Authentication-specific error type.

use pawhub_domain::error::PawHubError;

/// Errors raised while hashing passwords or signing tokens.
///
/// Token *verification* failures are not represented here: they surface
/// directly as [`PawHubError::Unauthorized`].
#[derive(Debug, thiserror::Error)]
pub enum AuthAdapterError {
    #[error("password hashing failed")]
    Hash(#[from] argon2::password_hash::Error),

    #[error("token signing failed")]
    Sign(#[from] jsonwebtoken::errors::Error),

    #[error("password hashing task did not complete")]
    Task(#[from] tokio::task::JoinError),
}

impl From<AuthAdapterError> for PawHubError {
    fn from(err: AuthAdapterError) -> Self {
        Self::Storage(Box::new(err))
    }
}
