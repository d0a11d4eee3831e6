//! Notification service: per-user messages.

use pawhub_domain::error::PawHubError;
use pawhub_domain::id::{NotificationId, UserId};
use pawhub_domain::notification::{Notification, NotificationLevel};
use pawhub_domain::permission::{Actor, Permission};

use super::found;
use crate::ports::{NotificationRepository, PageRequest, Paged, UserRepository};

/// Input for sending a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub level: Option<NotificationLevel>,
}

/// Fields that may change on a notification. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct NotificationChanges {
    pub title: Option<String>,
    pub message: Option<String>,
    pub level: Option<NotificationLevel>,
    pub read: Option<bool>,
}

/// Application service for notifications.
///
/// Staff send; recipients read, mark and delete their own; admins see all.
pub struct NotificationService<NR, UR> {
    notifications: NR,
    users: UR,
}

impl<NR: NotificationRepository, UR: UserRepository> NotificationService<NR, UR> {
    /// Create a new service backed by the given repositories.
    pub fn new(notifications: NR, users: UR) -> Self {
        Self {
            notifications,
            users,
        }
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_notifications(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<Paged<Notification>, PawHubError> {
        if actor.is_admin() {
            self.notifications.get_all(page).await
        } else {
            self.notifications.find_by_user(actor.user_id, page).await
        }
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for an unknown id or a notification
    /// addressed to someone else.
    pub async fn get_notification(
        &self,
        actor: &Actor,
        id: NotificationId,
    ) -> Result<Notification, PawHubError> {
        let notification = found(self.notifications.get_by_id(id).await?, "Notification", id)?;
        if actor.require_owner_or_admin(notification.user_id).is_err() {
            return found(None, "Notification", id);
        }
        Ok(notification)
    }

    /// Send a notification to an existing user (staff only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for adopters,
    /// [`PawHubError::NotFound`] for an unknown recipient, and
    /// [`PawHubError::Validation`] for a blank title.
    #[tracing::instrument(skip(self, actor, new), fields(user_id = %new.user_id))]
    pub async fn create_notification(
        &self,
        actor: &Actor,
        new: NewNotification,
    ) -> Result<Notification, PawHubError> {
        Permission::STAFF.check(Some(actor))?;
        found(self.users.get_by_id(new.user_id).await?, "User", new.user_id)?;
        let notification = Notification::new(
            new.user_id,
            new.title,
            new.message,
            new.level.unwrap_or_default(),
        )?;
        self.notifications.create(notification).await
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for a notification the actor may
    /// not see and [`PawHubError::Validation`] for a blank title.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update_notification(
        &self,
        actor: &Actor,
        id: NotificationId,
        changes: NotificationChanges,
    ) -> Result<Notification, PawHubError> {
        let mut notification = self.get_notification(actor, id).await?;
        if let Some(title) = changes.title {
            notification.title = title;
        }
        if let Some(message) = changes.message {
            notification.message = message;
        }
        if let Some(level) = changes.level {
            notification.level = level;
        }
        if let Some(read) = changes.read {
            notification.read = read;
        }
        notification.validate()?;
        self.notifications.update(notification).await
    }

    /// Flag a notification as read.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for a notification the actor may
    /// not see.
    pub async fn mark_read(
        &self,
        actor: &Actor,
        id: NotificationId,
    ) -> Result<Notification, PawHubError> {
        let mut notification = self.get_notification(actor, id).await?;
        if notification.read {
            return Ok(notification);
        }
        notification.read = true;
        self.notifications.update(notification).await
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] for a notification the actor may
    /// not see.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_notification(
        &self,
        actor: &Actor,
        id: NotificationId,
    ) -> Result<(), PawHubError> {
        self.get_notification(actor, id).await?;
        self.notifications.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{InMemory, actor};
    use pawhub_domain::user::{User, UserRole};

    async fn fixture() -> (
        NotificationService<InMemory<Notification>, InMemory<User>>,
        Actor,
    ) {
        let users: InMemory<User> = InMemory::default();
        let user = User::builder()
            .username("alice")
            .email("alice@example.com")
            .build()
            .unwrap();
        users.create(user.clone()).await.unwrap();
        (
            NotificationService::new(InMemory::default(), users),
            Actor::from(&user),
        )
    }

    fn welcome(user_id: UserId) -> NewNotification {
        NewNotification {
            user_id,
            title: "Welcome".to_string(),
            message: "Thanks for joining".to_string(),
            level: None,
        }
    }

    #[tokio::test]
    async fn should_deliver_to_recipient_only() {
        let (svc, alice) = fixture().await;
        let staff = actor(UserRole::Volunteer);
        let sent = svc
            .create_notification(&staff, welcome(alice.user_id))
            .await
            .unwrap();
        assert_eq!(sent.level, NotificationLevel::Info);

        let page = PageRequest::default();
        assert_eq!(svc.list_notifications(&alice, page).await.unwrap().count, 1);
        assert_eq!(svc.list_notifications(&staff, page).await.unwrap().count, 0);
        assert_eq!(
            svc.list_notifications(&actor(UserRole::Admin), page)
                .await
                .unwrap()
                .count,
            1
        );
    }

    #[tokio::test]
    async fn should_reject_unknown_recipient() {
        let (svc, _) = fixture().await;
        let result = svc
            .create_notification(&actor(UserRole::Admin), welcome(UserId::new()))
            .await;
        assert!(matches!(result, Err(PawHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_forbid_adopters_from_sending() {
        let (svc, alice) = fixture().await;
        let result = svc.create_notification(&alice, welcome(alice.user_id)).await;
        assert!(matches!(result, Err(PawHubError::Forbidden(_))));
    }

    #[tokio::test]
    async fn should_mark_read_for_recipient() {
        let (svc, alice) = fixture().await;
        let sent = svc
            .create_notification(&actor(UserRole::Admin), welcome(alice.user_id))
            .await
            .unwrap();

        let read = svc.mark_read(&alice, sent.id).await.unwrap();
        assert!(read.read);

        let stranger = actor(UserRole::Adopter);
        assert!(matches!(
            svc.mark_read(&stranger, sent.id).await,
            Err(PawHubError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_let_recipient_delete() {
        let (svc, alice) = fixture().await;
        let sent = svc
            .create_notification(&actor(UserRole::Admin), welcome(alice.user_id))
            .await
            .unwrap();
        svc.delete_notification(&alice, sent.id).await.unwrap();
        let inbox = svc
            .list_notifications(&alice, PageRequest::default())
            .await
            .unwrap();
        assert!(inbox.items.is_empty());
    }
}
