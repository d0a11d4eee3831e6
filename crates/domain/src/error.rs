//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`PawHubError`]
//! via `From`, so handlers only ever match on this one enum.

/// Top-level error returned by domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum PawHubError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("forbidden: {0}")]
    Forbidden(#[from] PermissionError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated by the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is not valid")]
    Invalid { field: &'static str },

    #[error("{field} is already taken")]
    Duplicate { field: &'static str },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} exceeds its limit")]
    OverLimit { field: &'static str },

    #[error("invalid {kind} status transition from {from} to {to}")]
    Transition {
        kind: &'static str,
        from: &'static str,
        to: &'static str,
    },

    #[error("Invalid animal ID.")]
    InvalidAnimal,

    #[error("Animal is not available.")]
    AnimalNotAvailable,
}

/// A lookup by id returned nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Authentication failed or was missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authentication credentials were not provided")]
    MissingCredentials,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("token is invalid or expired")]
    InvalidToken,

    #[error("user account is inactive")]
    InactiveUser,
}

/// The actor is authenticated but not allowed to perform the operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    #[error("you do not have permission to perform this action")]
    Denied,

    #[error("invalid device API key")]
    InvalidApiKey,
}
