//! `SQLite` implementation of [`DeviceRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use pawhub_app::ports::{PageRequest, Paged, DeviceRepository};
use pawhub_domain::device::Device;
use pawhub_domain::error::PawHubError;
use pawhub_domain::id::{DeviceId, UserId};

use crate::error::StorageError;
use crate::row::{encode_time, paged, parsed, parsed_opt, timestamp};

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Device {
            id: parsed(row, "id")?,
            serial_number: row.try_get("serial_number")?,
            name: row.try_get("name")?,
            owner_id: parsed(row, "owner_id")?,
            animal_id: parsed_opt(row, "animal_id")?,
            food_limit: row.try_get("food_limit")?,
            water_limit: row.try_get("water_limit")?,
            food_quantity: row.try_get("food_quantity")?,
            water_quantity: row.try_get("water_quantity")?,
            created_at: timestamp(row, "created_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO devices (
        id, serial_number, name, owner_id, animal_id,
        food_limit, water_limit, food_quantity, water_quantity, created_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM devices WHERE id = ?";
const SELECT_BY_SERIAL: &str = "SELECT * FROM devices WHERE serial_number = ?";
const SELECT_BY_OWNER: &str =
    "SELECT * FROM devices WHERE owner_id = ? ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_BY_OWNER: &str = "SELECT COUNT(*) FROM devices WHERE owner_id = ?";
const SELECT_ALL: &str = "SELECT * FROM devices ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM devices";
const UPDATE: &str = r"
    UPDATE devices
    SET serial_number = ?, name = ?, owner_id = ?, animal_id = ?,
        food_limit = ?, water_limit = ?, food_quantity = ?, water_quantity = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM devices WHERE id = ?";

/// `SQLite`-backed device repository.
#[derive(Clone)]
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    async fn create(&self, device: Device) -> Result<Device, PawHubError> {
        sqlx::query(INSERT)
            .bind(device.id.to_string())
            .bind(&device.serial_number)
            .bind(&device.name)
            .bind(device.owner_id.to_string())
            .bind(device.animal_id.map(|id| id.to_string()))
            .bind(device.food_limit)
            .bind(device.water_limit)
            .bind(device.food_quantity)
            .bind(device.water_quantity)
            .bind(encode_time(&device.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(device)
    }

    async fn get_by_id(&self, id: DeviceId) -> Result<Option<Device>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self, page: PageRequest) -> Result<Paged<Device>, PawHubError> {
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

    async fn find_by_serial_number(
        &self,
        serial_number: &str,
    ) -> Result<Option<Device>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_SERIAL)
            .bind(serial_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_by_owner(
        &self,
        owner_id: UserId,
        page: PageRequest,
    ) -> Result<Paged<Device>, PawHubError> {
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

    async fn update(&self, device: Device) -> Result<Device, PawHubError> {
        sqlx::query(UPDATE)
            .bind(&device.serial_number)
            .bind(&device.name)
            .bind(device.owner_id.to_string())
            .bind(device.animal_id.map(|id| id.to_string()))
            .bind(device.food_limit)
            .bind(device.water_limit)
            .bind(device.food_quantity)
            .bind(device.water_quantity)
            .bind(device.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(device)
    }

    async fn delete(&self, id: DeviceId) -> Result<(), PawHubError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
