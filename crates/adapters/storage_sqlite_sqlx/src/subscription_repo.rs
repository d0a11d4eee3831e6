//! `SQLite` implementation of [`SubscriptionRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use pawhub_app::ports::{PageRequest, Paged, SubscriptionRepository};
use pawhub_domain::error::PawHubError;
use pawhub_domain::id::{SubscriptionId, UserId};
use pawhub_domain::subscription::Subscription;

use crate::error::StorageError;
use crate::row::{encode_time, paged, parsed, timestamp, timestamp_opt};

struct Wrapper(Subscription);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Subscription {
            id: parsed(row, "id")?,
            user_id: parsed(row, "user_id")?,
            plan: parsed(row, "plan")?,
            status: parsed(row, "status")?,
            started_at: timestamp(row, "started_at")?,
            expires_at: timestamp_opt(row, "expires_at")?,
            auto_renew: row.try_get("auto_renew")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO subscriptions (id, user_id, plan, status, started_at, expires_at, auto_renew)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM subscriptions WHERE id = ?";
const SELECT_BY_USER: &str =
    "SELECT * FROM subscriptions WHERE user_id = ? ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_BY_USER: &str = "SELECT COUNT(*) FROM subscriptions WHERE user_id = ?";
const SELECT_ALL: &str = "SELECT * FROM subscriptions ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM subscriptions";
const UPDATE: &str = r"
    UPDATE subscriptions
    SET plan = ?, status = ?, expires_at = ?, auto_renew = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM subscriptions WHERE id = ?";

/// `SQLite`-backed subscription repository.
#[derive(Clone)]
pub struct SqliteSubscriptionRepository {
    pool: SqlitePool,
}

impl SqliteSubscriptionRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SubscriptionRepository for SqliteSubscriptionRepository {
    async fn create(&self, subscription: Subscription) -> Result<Subscription, PawHubError> {
        sqlx::query(INSERT)
            .bind(subscription.id.to_string())
            .bind(subscription.user_id.to_string())
            .bind(subscription.plan.as_str())
            .bind(subscription.status.as_str())
            .bind(encode_time(&subscription.started_at))
            .bind(subscription.expires_at.as_ref().map(encode_time))
            .bind(subscription.auto_renew)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(subscription)
    }

    async fn get_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self, page: PageRequest) -> Result<Paged<Subscription>, PawHubError> {
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
    ) -> Result<Paged<Subscription>, PawHubError> {
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

    async fn update(&self, subscription: Subscription) -> Result<Subscription, PawHubError> {
        sqlx::query(UPDATE)
            .bind(subscription.plan.as_str())
            .bind(subscription.status.as_str())
            .bind(subscription.expires_at.as_ref().map(encode_time))
            .bind(subscription.auto_renew)
            .bind(subscription.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(subscription)
    }

    async fn delete(&self, id: SubscriptionId) -> Result<(), PawHubError> {
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
    use chrono::Duration;
    use pawhub_domain::subscription::{SubscriptionPlan, SubscriptionStatus};
    use pawhub_domain::user::UserRole;

    #[tokio::test]
    async fn should_roundtrip_optional_expiry() {
        let pool = testing::pool().await;
        let holder = testing::user(&pool, "holder", UserRole::Adopter).await;
        let repo = SqliteSubscriptionRepository::new(pool);

        let mut subscription = Subscription::start(holder.id, SubscriptionPlan::Premium);
        let expires_at = subscription.started_at + Duration::days(30);
        subscription.expires_at = Some(expires_at);
        repo.create(subscription.clone()).await.unwrap();

        let fetched = repo.get_by_id(subscription.id).await.unwrap().unwrap();
        assert_eq!(fetched.plan, SubscriptionPlan::Premium);
        assert!(fetched.auto_renew);
        assert_eq!(
            fetched.expires_at.map(|t| t.timestamp_micros()),
            Some(expires_at.timestamp_micros())
        );
    }

    #[tokio::test]
    async fn should_persist_cancellation() {
        let pool = testing::pool().await;
        let holder = testing::user(&pool, "holder", UserRole::Adopter).await;
        let mut subscription = testing::subscription(&pool, &holder).await;
        let repo = SqliteSubscriptionRepository::new(pool);

        subscription.cancel();
        repo.update(subscription.clone()).await.unwrap();

        let mine = repo.find_by_user(holder.id, PageRequest::default()).await.unwrap();
        assert_eq!(mine.count, 1);
        assert_eq!(mine.items[0].status, SubscriptionStatus::Cancelled);
        assert!(!mine.items[0].auto_renew);

        repo.delete(subscription.id).await.unwrap();
        assert_eq!(repo.get_all(PageRequest::default()).await.unwrap().count, 0);
    }
}
