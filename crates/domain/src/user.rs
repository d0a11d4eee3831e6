//! User: an account that can authenticate and act according to its role.

use serde::{Deserialize, Serialize};

use crate::choice::define_choice;
use crate::error::{PawHubError, ValidationError};
use crate::id::UserId;
use crate::time::{Timestamp, now};

define_choice!(
    /// Role attached to a user account, driving every permission gate.
    UserRole {
        Admin => "ADMIN",
        Volunteer => "VOLUNTEER",
        Adopter => "ADOPTER",
    } default Adopter
);

define_choice!(
    /// Whether the account may log in.
    UserStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
    } default Active
);

/// A registered account.
///
/// The password hash is carried for authentication but never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(skip)]
    pub password_hash: String,
    pub date_joined: Timestamp,
}

impl User {
    /// Create a builder for constructing a [`User`].
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] when `username` is empty or
    /// `email` is not an address.
    pub fn validate(&self) -> Result<(), PawHubError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::Empty { field: "username" }.into());
        }
        validate_email(&self.email)?;
        Ok(())
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::Empty { field: "email" });
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::Invalid { field: "email" }),
    }
}

/// Step-by-step builder for [`User`].
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    username: Option<String>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    role: Option<UserRole>,
    status: Option<UserStatus>,
    password_hash: Option<String>,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = Some(password_hash.into());
        self
    }

    /// Consume the builder, validate, and return a [`User`].
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] if `username` or `email` is
    /// missing or malformed.
    pub fn build(self) -> Result<User, PawHubError> {
        let user = User {
            id: self.id.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            role: self.role.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            password_hash: self.password_hash.unwrap_or_default(),
            date_joined: now(),
        };
        user.validate()?;
        Ok(user)
    }
}
