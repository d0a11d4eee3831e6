//! Subscription: a user's paid plan.

use serde::{Deserialize, Serialize};

use crate::choice::define_choice;
use crate::error::{PawHubError, ValidationError};
use crate::id::{SubscriptionId, UserId};
use crate::time::{Timestamp, now};

define_choice!(
    SubscriptionPlan {
        Basic => "BASIC",
        Premium => "PREMIUM",
    } default Basic
);

define_choice!(
    SubscriptionStatus {
        Active => "ACTIVE",
        Cancelled => "CANCELLED",
        Expired => "EXPIRED",
    } default Active
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub started_at: Timestamp,
    pub expires_at: Option<Timestamp>,
    pub auto_renew: bool,
}

impl Subscription {
    /// Start an active subscription now.
    #[must_use]
    pub fn start(user_id: UserId, plan: SubscriptionPlan) -> Self {
        Self {
            id: SubscriptionId::new(),
            user_id,
            plan,
            status: SubscriptionStatus::Active,
            started_at: now(),
            expires_at: None,
            auto_renew: true,
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] when `expires_at` is not after
    /// `started_at`.
    pub fn validate(&self) -> Result<(), PawHubError> {
        if let Some(expires_at) = self.expires_at
            && expires_at <= self.started_at
        {
            return Err(ValidationError::Invalid {
                field: "expires_at",
            }
            .into());
        }
        Ok(())
    }

    /// Stop the subscription and disable renewal.
    pub fn cancel(&mut self) {
        self.status = SubscriptionStatus::Cancelled;
        self.auto_renew = false;
    }
}
