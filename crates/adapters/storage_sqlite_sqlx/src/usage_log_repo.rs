//! `SQLite` implementation of [`UsageLogRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use pawhub_app::ports::{PageRequest, Paged, UsageLogRepository};
use pawhub_domain::error::PawHubError;
use pawhub_domain::id::{DeviceId, UsageLogId, UserId};
use pawhub_domain::usage_log::UsageLog;

use crate::error::StorageError;
use crate::row::{encode_time, paged, parsed, timestamp};

struct Wrapper(UsageLog);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(UsageLog {
            id: parsed(row, "id")?,
            device_id: parsed(row, "device_id")?,
            resource: parsed(row, "resource")?,
            action: parsed(row, "action")?,
            amount: row.try_get("amount")?,
            previous_quantity: row.try_get("previous_quantity")?,
            new_quantity: row.try_get("new_quantity")?,
            recorded_at: timestamp(row, "recorded_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO usage_logs (
        id, device_id, resource, action, amount, previous_quantity, new_quantity, recorded_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM usage_logs WHERE id = ?";
const SELECT_BY_DEVICE: &str = r"
    SELECT * FROM usage_logs
    WHERE device_id = ?
    ORDER BY recorded_at DESC, rowid DESC
    LIMIT ? OFFSET ?
";
const COUNT_BY_DEVICE: &str = "SELECT COUNT(*) FROM usage_logs WHERE device_id = ?";
const SELECT_ALL: &str = r"
    SELECT * FROM usage_logs
    ORDER BY recorded_at DESC, rowid DESC
    LIMIT ? OFFSET ?
";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM usage_logs";
const SELECT_BY_OWNER: &str = r"
    SELECT usage_logs.* FROM usage_logs
    JOIN devices ON devices.id = usage_logs.device_id
    WHERE devices.owner_id = ?
    ORDER BY usage_logs.recorded_at DESC, usage_logs.rowid DESC
    LIMIT ? OFFSET ?
";
const COUNT_BY_OWNER: &str = r"
    SELECT COUNT(*) FROM usage_logs
    JOIN devices ON devices.id = usage_logs.device_id
    WHERE devices.owner_id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM usage_logs WHERE id = ?";

/// `SQLite`-backed usage log repository. Entries are append-only.
#[derive(Clone)]
pub struct SqliteUsageLogRepository {
    pool: SqlitePool,
}

impl SqliteUsageLogRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UsageLogRepository for SqliteUsageLogRepository {
    async fn create(&self, log: UsageLog) -> Result<UsageLog, PawHubError> {
        sqlx::query(INSERT)
            .bind(log.id.to_string())
            .bind(log.device_id.to_string())
            .bind(log.resource.as_str())
            .bind(log.action.as_str())
            .bind(log.amount)
            .bind(log.previous_quantity)
            .bind(log.new_quantity)
            .bind(encode_time(&log.recorded_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(log)
    }

    async fn get_by_id(&self, id: UsageLogId) -> Result<Option<UsageLog>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self, page: PageRequest) -> Result<Paged<UsageLog>, PawHubError> {
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

    async fn find_by_device(
        &self,
        device_id: DeviceId,
        page: PageRequest,
    ) -> Result<Paged<UsageLog>, PawHubError> {
        let count: i64 = sqlx::query_scalar(COUNT_BY_DEVICE)
            .bind(device_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_DEVICE)
            .bind(device_id.to_string())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(paged(count, rows.into_iter().map(|w| w.0).collect()))
    }

    async fn find_by_owner(
        &self,
        owner_id: UserId,
        page: PageRequest,
    ) -> Result<Paged<UsageLog>, PawHubError> {
        let count: i64 = sqlx::query_scalar(COUNT_BY_OWNER)
            .bind(owner_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_OWNER)
            .bind(owner_id.to_string())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(paged(count, rows.into_iter().map(|w| w.0).collect()))
    }

    async fn delete(&self, id: UsageLogId) -> Result<(), PawHubError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
