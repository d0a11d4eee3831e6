//! `SQLite` implementation of [`PaymentRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use pawhub_app::ports::{PageRequest, Paged, PaymentRepository};
use pawhub_domain::error::PawHubError;
use pawhub_domain::id::{PaymentId, UserId};
use pawhub_domain::payment::Payment;

use crate::error::StorageError;
use crate::row::{encode_time, paged, parsed, timestamp};

struct Wrapper(Payment);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Payment {
            id: parsed(row, "id")?,
            user_id: parsed(row, "user_id")?,
            subscription_id: parsed(row, "subscription_id")?,
            amount_cents: row.try_get("amount_cents")?,
            currency: row.try_get("currency")?,
            status: parsed(row, "status")?,
            created_at: timestamp(row, "created_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO payments (id, user_id, subscription_id, amount_cents, currency, status, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM payments WHERE id = ?";
const SELECT_BY_USER: &str =
    "SELECT * FROM payments WHERE user_id = ? ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_BY_USER: &str = "SELECT COUNT(*) FROM payments WHERE user_id = ?";
const SELECT_ALL: &str = "SELECT * FROM payments ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM payments";
const UPDATE: &str = "UPDATE payments SET amount_cents = ?, currency = ?, status = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM payments WHERE id = ?";

/// `SQLite`-backed payment repository.
#[derive(Clone)]
pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl PaymentRepository for SqlitePaymentRepository {
    async fn create(&self, payment: Payment) -> Result<Payment, PawHubError> {
        sqlx::query(INSERT)
            .bind(payment.id.to_string())
            .bind(payment.user_id.to_string())
            .bind(payment.subscription_id.to_string())
            .bind(payment.amount_cents)
            .bind(&payment.currency)
            .bind(payment.status.as_str())
            .bind(encode_time(&payment.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(payment)
    }

    async fn get_by_id(&self, id: PaymentId) -> Result<Option<Payment>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self, page: PageRequest) -> Result<Paged<Payment>, PawHubError> {
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
    ) -> Result<Paged<Payment>, PawHubError> {
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

    async fn update(&self, payment: Payment) -> Result<Payment, PawHubError> {
        sqlx::query(UPDATE)
            .bind(payment.amount_cents)
            .bind(&payment.currency)
            .bind(payment.status.as_str())
            .bind(payment.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(payment)
    }

    async fn delete(&self, id: PaymentId) -> Result<(), PawHubError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
