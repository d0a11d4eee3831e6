//! Payment: money received against a subscription.

use serde::{Deserialize, Serialize};

use crate::choice::define_choice;
use crate::error::{PawHubError, ValidationError};
use crate::id::{PaymentId, SubscriptionId, UserId};
use crate::time::{Timestamp, now};

define_choice!(
    PaymentStatus {
        Pending => "PENDING",
        Completed => "COMPLETED",
        Failed => "FAILED",
        Refunded => "REFUNDED",
    } default Pending
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
    /// Amount in the currency's minor unit.
    pub amount_cents: i64,
    /// ISO 4217 code, e.g. `EUR`.
    pub currency: String,
    pub status: PaymentStatus,
    pub created_at: Timestamp,
}

impl Payment {
    /// Create a pending payment.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] when the amount is not positive
    /// or the currency is not a three-letter code.
    pub fn new(
        user_id: UserId,
        subscription_id: SubscriptionId,
        amount_cents: i64,
        currency: &str,
    ) -> Result<Self, PawHubError> {
        let payment = Self {
            id: PaymentId::new(),
            user_id,
            subscription_id,
            amount_cents,
            currency: currency.trim().to_uppercase(),
            status: PaymentStatus::Pending,
            created_at: now(),
        };
        payment.validate()?;
        Ok(payment)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] when the amount is not positive
    /// or the currency is not a three-letter code.
    pub fn validate(&self) -> Result<(), PawHubError> {
        if self.amount_cents <= 0 {
            return Err(ValidationError::NotPositive {
                field: "amount_cents",
            }
            .into());
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::Invalid { field: "currency" }.into());
        }
        Ok(())
    }
}
