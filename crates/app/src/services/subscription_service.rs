//! Subscription service: user plans.

use pawhub_domain::error::{PawHubError, ValidationError};
use pawhub_domain::id::{SubscriptionId, UserId};
use pawhub_domain::permission::{Actor, Permission};
use pawhub_domain::subscription::{Subscription, SubscriptionPlan, SubscriptionStatus};
use pawhub_domain::time::Timestamp;

use super::found;
use crate::ports::{PageRequest, Paged, SubscriptionRepository, UserRepository};

/// Input for starting a subscription.
#[derive(Debug, Clone, Default)]
pub struct NewSubscription {
    /// Only administrators may subscribe someone else.
    pub user_id: Option<UserId>,
    pub plan: Option<SubscriptionPlan>,
    pub expires_at: Option<Timestamp>,
    pub auto_renew: Option<bool>,
}

/// Fields that may change on a subscription. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionChanges {
    pub plan: Option<SubscriptionPlan>,
    /// Only administrators may set the status directly.
    pub status: Option<SubscriptionStatus>,
    pub expires_at: Option<Option<Timestamp>>,
    pub auto_renew: Option<bool>,
}

/// Application service for subscriptions.
pub struct SubscriptionService<SR, UR> {
    repo: SR,
    users: UR,
}

impl<SR: SubscriptionRepository, UR: UserRepository> SubscriptionService<SR, UR> {
    /// Create a new service backed by the given repositories.
    pub fn new(repo: SR, users: UR) -> Self {
        Self { repo, users }
    }

    /// Every subscription for admins, otherwise the actor's own.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_subscriptions(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<Paged<Subscription>, PawHubError> {
        if actor.is_admin() {
            self.repo.get_all(page).await
        } else {
            self.repo.find_by_user(actor.user_id, page).await
        }
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for an unknown id or a subscription
    /// held by someone else.
    pub async fn get_subscription(
        &self,
        actor: &Actor,
        id: SubscriptionId,
    ) -> Result<Subscription, PawHubError> {
        let subscription = found(self.repo.get_by_id(id).await?, "Subscription", id)?;
        if actor.require_owner_or_admin(subscription.user_id).is_err() {
            return found(None, "Subscription", id);
        }
        Ok(subscription)
    }

    /// Start a subscription for the actor, or for `user_id` when the actor
    /// is an administrator.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] when a non-admin names another
    /// user and [`PawHubError::Validation`] for an unknown user or an expiry
    /// before the start.
    #[tracing::instrument(skip(self, actor, new))]
    pub async fn create_subscription(
        &self,
        actor: &Actor,
        new: NewSubscription,
    ) -> Result<Subscription, PawHubError> {
        let user_id = new.user_id.unwrap_or(actor.user_id);
        actor.require_owner_or_admin(user_id)?;
        if user_id != actor.user_id && self.users.get_by_id(user_id).await?.is_none() {
            return Err(ValidationError::Invalid { field: "user" }.into());
        }

        let mut subscription = Subscription::start(user_id, new.plan.unwrap_or_default());
        subscription.expires_at = new.expires_at;
        if let Some(auto_renew) = new.auto_renew {
            subscription.auto_renew = auto_renew;
        }
        subscription.validate()?;
        self.repo.create(subscription).await
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for a subscription the actor may not
    /// see, [`PawHubError::Forbidden`] when a non-admin sets the status, and
    /// [`PawHubError::Validation`] for an expiry before the start.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update_subscription(
        &self,
        actor: &Actor,
        id: SubscriptionId,
        changes: SubscriptionChanges,
    ) -> Result<Subscription, PawHubError> {
        let mut subscription = self.get_subscription(actor, id).await?;
        if let Some(status) = changes.status {
            Permission::ADMIN.check(Some(actor))?;
            subscription.status = status;
        }
        if let Some(plan) = changes.plan {
            subscription.plan = plan;
        }
        if let Some(expires_at) = changes.expires_at {
            subscription.expires_at = expires_at;
        }
        if let Some(auto_renew) = changes.auto_renew {
            subscription.auto_renew = auto_renew;
        }
        subscription.validate()?;
        self.repo.update(subscription).await
    }

    /// Cancel a subscription the actor holds (or any, for admins).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for a subscription the actor may
    /// not see.
    #[tracing::instrument(skip(self, actor))]
    pub async fn cancel_subscription(
        &self,
        actor: &Actor,
        id: SubscriptionId,
    ) -> Result<Subscription, PawHubError> {
        let mut subscription = self.get_subscription(actor, id).await?;
        subscription.cancel();
        self.repo.update(subscription).await
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins and
    /// [`PawHubError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_subscription(
        &self,
        actor: &Actor,
        id: SubscriptionId,
    ) -> Result<(), PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        found(self.repo.get_by_id(id).await?, "Subscription", id)?;
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{InMemory, actor};
    use chrono::Duration;
    use pawhub_domain::time::now;
    use pawhub_domain::user::{User, UserRole};

    fn make_service() -> SubscriptionService<InMemory<Subscription>, InMemory<User>> {
        SubscriptionService::new(InMemory::default(), InMemory::default())
    }

    #[tokio::test]
    async fn should_subscribe_actor_to_basic_by_default() {
        let svc = make_service();
        let user = actor(UserRole::Adopter);
        let sub = svc
            .create_subscription(&user, NewSubscription::default())
            .await
            .unwrap();
        assert_eq!(sub.user_id, user.user_id);
        assert_eq!(sub.plan, SubscriptionPlan::Basic);
        assert_eq!(sub.status, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn should_forbid_subscribing_someone_else() {
        let svc = make_service();
        let new = NewSubscription {
            user_id: Some(UserId::new()),
            ..NewSubscription::default()
        };
        let result = svc.create_subscription(&actor(UserRole::Adopter), new).await;
        assert!(matches!(result, Err(PawHubError::Forbidden(_))));
    }

    #[tokio::test]
    async fn should_check_user_named_by_admin() {
        let users = InMemory::default();
        let svc = SubscriptionService::new(InMemory::default(), users.clone());
        let admin = actor(UserRole::Admin);

        let new = NewSubscription {
            user_id: Some(UserId::new()),
            ..NewSubscription::default()
        };
        assert!(matches!(
            svc.create_subscription(&admin, new).await,
            Err(PawHubError::Validation(ValidationError::Invalid { field: "user" }))
        ));

        let carol = User::builder()
            .username("carol")
            .email("carol@example.com")
            .build()
            .unwrap();
        users.create(carol.clone()).await.unwrap();
        let new = NewSubscription {
            user_id: Some(carol.id),
            ..NewSubscription::default()
        };
        let sub = svc.create_subscription(&admin, new).await.unwrap();
        assert_eq!(sub.user_id, carol.id);
    }

    #[tokio::test]
    async fn should_reject_expiry_in_the_past() {
        let svc = make_service();
        let new = NewSubscription {
            expires_at: Some(now() - Duration::days(1)),
            ..NewSubscription::default()
        };
        let result = svc.create_subscription(&actor(UserRole::Adopter), new).await;
        assert!(matches!(result, Err(PawHubError::Validation(_))));
    }

    #[tokio::test]
    async fn should_cancel_and_stop_renewal() {
        let svc = make_service();
        let user = actor(UserRole::Adopter);
        let sub = svc
            .create_subscription(&user, NewSubscription::default())
            .await
            .unwrap();
        let cancelled = svc.cancel_subscription(&user, sub.id).await.unwrap();
        assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);
        assert!(!cancelled.auto_renew);
    }

    #[tokio::test]
    async fn should_reserve_status_changes_for_admins() {
        let svc = make_service();
        let user = actor(UserRole::Adopter);
        let sub = svc
            .create_subscription(&user, NewSubscription::default())
            .await
            .unwrap();
        let changes = SubscriptionChanges {
            status: Some(SubscriptionStatus::Expired),
            ..SubscriptionChanges::default()
        };

        let result = svc.update_subscription(&user, sub.id, changes.clone()).await;
        assert!(matches!(result, Err(PawHubError::Forbidden(_))));

        let updated = svc
            .update_subscription(&actor(UserRole::Admin), sub.id, changes)
            .await
            .unwrap();
        assert_eq!(updated.status, SubscriptionStatus::Expired);
    }

    #[tokio::test]
    async fn should_scope_listing_to_holder() {
        let svc = make_service();
        let user = actor(UserRole::Adopter);
        svc.create_subscription(&user, NewSubscription::default())
            .await
            .unwrap();
        svc.create_subscription(&actor(UserRole::Adopter), NewSubscription::default())
            .await
            .unwrap();
        let page = PageRequest::default();
        assert_eq!(svc.list_subscriptions(&user, page).await.unwrap().count, 1);
        assert_eq!(
            svc.list_subscriptions(&actor(UserRole::Admin), page)
                .await
                .unwrap()
                .count,
            2
        );
    }
}
