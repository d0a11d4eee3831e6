//! Notification: a message addressed to one user.

use serde::{Deserialize, Serialize};

use crate::choice::define_choice;
use crate::error::{PawHubError, ValidationError};
use crate::id::{NotificationId, UserId};
use crate::time::{Timestamp, now};

define_choice!(
    /// Severity of a notification.
    NotificationLevel {
        Info => "INFO",
        Warning => "WARNING",
        Alert => "ALERT",
    } default Info
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
    pub read: bool,
    pub created_at: Timestamp,
}

impl Notification {
    /// Create an unread notification.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] when `title` is blank.
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        level: NotificationLevel,
    ) -> Result<Self, PawHubError> {
        let notification = Self {
            id: NotificationId::new(),
            user_id,
            title: title.into(),
            message: message.into(),
            level,
            read: false,
            created_at: now(),
        };
        notification.validate()?;
        Ok(notification)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] when `title` is blank.
    pub fn validate(&self) -> Result<(), PawHubError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Empty { field: "title" }.into());
        }
        Ok(())
    }
}
