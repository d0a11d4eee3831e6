//! `SQLite` implementation of [`NotificationRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use pawhub_app::ports::{PageRequest, Paged, NotificationRepository};
use pawhub_domain::error::PawHubError;
use pawhub_domain::id::{NotificationId, UserId};
use pawhub_domain::notification::Notification;

use crate::error::StorageError;
use crate::row::{encode_time, paged, parsed, timestamp};

struct Wrapper(Notification);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Notification {
            id: parsed(row, "id")?,
            user_id: parsed(row, "user_id")?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            level: parsed(row, "level")?,
            read: row.try_get("read")?,
            created_at: timestamp(row, "created_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO notifications (id, user_id, title, message, level, read, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM notifications WHERE id = ?";
const SELECT_BY_USER: &str = r"
    SELECT * FROM notifications
    WHERE user_id = ?
    ORDER BY created_at DESC, rowid DESC
    LIMIT ? OFFSET ?
";
const COUNT_BY_USER: &str = "SELECT COUNT(*) FROM notifications WHERE user_id = ?";
const SELECT_ALL: &str = r"
    SELECT * FROM notifications
    ORDER BY created_at DESC, rowid DESC
    LIMIT ? OFFSET ?
";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM notifications";
const UPDATE: &str =
    "UPDATE notifications SET title = ?, message = ?, level = ?, read = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM notifications WHERE id = ?";

/// `SQLite`-backed notification repository. Lists are newest first.
#[derive(Clone)]
pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl NotificationRepository for SqliteNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification, PawHubError> {
        sqlx::query(INSERT)
            .bind(notification.id.to_string())
            .bind(notification.user_id.to_string())
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.level.as_str())
            .bind(notification.read)
            .bind(encode_time(&notification.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(notification)
    }

    async fn get_by_id(&self, id: NotificationId) -> Result<Option<Notification>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self, page: PageRequest) -> Result<Paged<Notification>, PawHubError> {
        let count: i64 = sqlx::query_scalar(COUNT_ALL)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(paged(count, rows.into_iter().map(|w| w.0).collect()))
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Paged<Notification>, PawHubError> {
        let count: i64 = sqlx::query_scalar(COUNT_BY_USER)
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(user_id.to_string())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(paged(count, rows.into_iter().map(|w| w.0).collect()))
    }

    async fn update(&self, notification: Notification) -> Result<Notification, PawHubError> {
        sqlx::query(UPDATE)
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.level.as_str())
            .bind(notification.read)
            .bind(notification.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(notification)
    }

    async fn delete(&self, id: NotificationId) -> Result<(), PawHubError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use pawhub_domain::notification::NotificationLevel;
    use pawhub_domain::user::UserRole;

    #[tokio::test]
    async fn should_list_user_notifications_and_mark_read() {
        let pool = testing::pool().await;
        let alice = testing::user(&pool, "alice", UserRole::Adopter).await;
        let bob = testing::user(&pool, "bob", UserRole::Adopter).await;
        let repo = SqliteNotificationRepository::new(pool);

        let welcome = Notification::new(alice.id, "Welcome", "Hi", NotificationLevel::Info).unwrap();
        let mut welcome = repo.create(welcome).await.unwrap();
        let alert = Notification::new(bob.id, "Low food", "Refill", NotificationLevel::Alert).unwrap();
        repo.create(alert).await.unwrap();

        let inbox = repo.find_by_user(alice.id, PageRequest::default()).await.unwrap();
        assert_eq!(inbox.count, 1);
        assert!(!inbox.items[0].read);

        welcome.read = true;
        repo.update(welcome.clone()).await.unwrap();
        let fetched = repo.get_by_id(welcome.id).await.unwrap().unwrap();
        assert!(fetched.read);
        assert_eq!(fetched.level, NotificationLevel::Info);

        repo.delete(welcome.id).await.unwrap();
        assert_eq!(repo.get_all(PageRequest::default()).await.unwrap().count, 1);
    }
}
