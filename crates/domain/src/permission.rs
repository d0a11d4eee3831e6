//! Permission predicates evaluated against the acting user.

use crate::error::{AuthError, PawHubError, PermissionError};
use crate::id::UserId;
use crate::user::{User, UserRole};

/// The authenticated user performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    #[must_use]
    pub fn has_role(&self, roles: &[UserRole]) -> bool {
        roles.contains(&self.role)
    }

    /// Allow only the listed roles.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::Denied`] when the actor's role is not listed.
    pub fn require(&self, roles: &[UserRole]) -> Result<(), PermissionError> {
        if self.has_role(roles) {
            Ok(())
        } else {
            Err(PermissionError::Denied)
        }
    }

    /// Allow admins, or the actor when it owns the record.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::Denied`] for anyone else.
    pub fn require_owner_or_admin(&self, owner_id: UserId) -> Result<(), PermissionError> {
        if self.is_admin() || self.user_id == owner_id {
            Ok(())
        } else {
            Err(PermissionError::Denied)
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

/// Gate attached to an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    AllowAny,
    IsAuthenticated,
    HasRole(&'static [UserRole]),
}

impl Permission {
    pub const ADMIN: Self = Self::HasRole(&[UserRole::Admin]);
    pub const STAFF: Self = Self::HasRole(&[UserRole::Admin, UserRole::Volunteer]);
    pub const ADOPTER: Self = Self::HasRole(&[UserRole::Adopter]);

    /// Evaluate the gate for an optional actor.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Unauthorized`] when a gate needs an actor and
    /// there is none, or [`PawHubError::Forbidden`] when the role is wrong.
    pub fn check(self, actor: Option<&Actor>) -> Result<(), PawHubError> {
        match (self, actor) {
            (Self::AllowAny, _) => Ok(()),
            (_, None) => Err(AuthError::MissingCredentials.into()),
            (Self::IsAuthenticated, Some(_)) => Ok(()),
            (Self::HasRole(roles), Some(actor)) => actor.require(roles).map_err(Into::into),
        }
    }
}
