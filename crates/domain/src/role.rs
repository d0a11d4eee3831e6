//! Role: a named permission group mirrored from [`UserRole`].

use serde::{Deserialize, Serialize};

use crate::error::{PawHubError, ValidationError};
use crate::id::RoleId;
use crate::user::UserRole;

/// A named role with a human-readable description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub description: String,
}

impl Role {
    /// Create a role, normalizing the name to lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] when `name` is blank.
    pub fn new(name: &str, description: impl Into<String>) -> Result<Self, PawHubError> {
        let role = Self {
            id: RoleId::new(),
            name: name.trim().to_lowercase(),
            description: description.into(),
        };
        role.validate()?;
        Ok(role)
    }

    /// The role row seeded for each [`UserRole`].
    #[must_use]
    pub fn default_for(role: UserRole) -> Self {
        let (name, description) = match role {
            UserRole::Admin => ("admin", "Administrator"),
            UserRole::Volunteer => ("volunteer", "Volunteer"),
            UserRole::Adopter => ("adopter", "Adopter"),
        };
        Self {
            id: RoleId::new(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] when `name` is blank.
    pub fn validate(&self) -> Result<(), PawHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" }.into());
        }
        Ok(())
    }
}
