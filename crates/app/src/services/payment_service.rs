//! Payment service: charges recorded against subscriptions.

use pawhub_domain::error::{PawHubError, ValidationError};
use pawhub_domain::id::{PaymentId, SubscriptionId};
use pawhub_domain::payment::{Payment, PaymentStatus};
use pawhub_domain::permission::{Actor, Permission};

use super::found;
use crate::ports::{PageRequest, Paged, PaymentRepository, SubscriptionRepository};

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub subscription_id: SubscriptionId,
    pub amount_cents: i64,
    pub currency: String,
}

/// Application service for payments.
///
/// No provider is contacted; payments are bookkeeping rows whose status an
/// administrator moves along.
pub struct PaymentService<PR, SR> {
    payments: PR,
    subscriptions: SR,
}

impl<PR: PaymentRepository, SR: SubscriptionRepository> PaymentService<PR, SR> {
    /// Create a new service backed by the given repositories.
    pub fn new(payments: PR, subscriptions: SR) -> Self {
        Self {
            payments,
            subscriptions,
        }
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_payments(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<Paged<Payment>, PawHubError> {
        if actor.is_admin() {
            self.payments.get_all(page).await
        } else {
            self.payments.find_by_user(actor.user_id, page).await
        }
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for an unknown id or a payment made
    /// by someone else.
    pub async fn get_payment(&self, actor: &Actor, id: PaymentId) -> Result<Payment, PawHubError> {
        let payment = found(self.payments.get_by_id(id).await?, "Payment", id)?;
        if actor.require_owner_or_admin(payment.user_id).is_err() {
            return found(None, "Payment", id);
        }
        Ok(payment)
    }

    /// Record a pending payment for a subscription the actor holds.
    ///
    /// The payer is always the subscription holder.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] for an unknown subscription, a
    /// non-positive amount or a malformed currency, and
    /// [`PawHubError::Forbidden`] for someone else's subscription.
    #[tracing::instrument(skip(self, actor, new), fields(subscription_id = %new.subscription_id))]
    pub async fn create_payment(
        &self,
        actor: &Actor,
        new: NewPayment,
    ) -> Result<Payment, PawHubError> {
        let Some(subscription) = self.subscriptions.get_by_id(new.subscription_id).await? else {
            return Err(ValidationError::Invalid {
                field: "subscription",
            }
            .into());
        };
        actor.require_owner_or_admin(subscription.user_id)?;

        let payment = Payment::new(
            subscription.user_id,
            subscription.id,
            new.amount_cents,
            &new.currency,
        )?;
        self.payments.create(payment).await
    }

    /// Move a payment to a new status (administrators only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins and
    /// [`PawHubError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self, actor))]
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: PaymentId,
        status: PaymentStatus,
    ) -> Result<Payment, PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        let mut payment = found(self.payments.get_by_id(id).await?, "Payment", id)?;
        payment.status = status;
        self.payments.update(payment).await
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins and
    /// [`PawHubError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_payment(&self, actor: &Actor, id: PaymentId) -> Result<(), PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        found(self.payments.get_by_id(id).await?, "Payment", id)?;
        self.payments.delete(id).await
    }
}
