//! `SQLite` implementation of [`RoleRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use pawhub_app::ports::{PageRequest, Paged, RoleRepository};
use pawhub_domain::error::PawHubError;
use pawhub_domain::id::RoleId;
use pawhub_domain::role::Role;

use crate::error::StorageError;
use crate::row::{paged, parsed};

struct Wrapper(Role);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Role> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Role {
            id: parsed(row, "id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO roles (id, name, description) VALUES (?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM roles WHERE id = ?";
const SELECT_BY_NAME: &str = "SELECT * FROM roles WHERE name = ?";
const SELECT_ALL: &str = "SELECT * FROM roles ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM roles";
const UPDATE: &str = "UPDATE roles SET name = ?, description = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM roles WHERE id = ?";

/// `SQLite`-backed role repository.
#[derive(Clone)]
pub struct SqliteRoleRepository {
    pool: SqlitePool,
}

impl SqliteRoleRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RoleRepository for SqliteRoleRepository {
    async fn create(&self, role: Role) -> Result<Role, PawHubError> {
        sqlx::query(INSERT)
            .bind(role.id.to_string())
            .bind(&role.name)
            .bind(&role.description)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(role)
    }

    async fn get_by_id(&self, id: RoleId) -> Result<Option<Role>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self, page: PageRequest) -> Result<Paged<Role>, PawHubError> {
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

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_NAME)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn update(&self, role: Role) -> Result<Role, PawHubError> {
        sqlx::query(UPDATE)
            .bind(&role.name)
            .bind(&role.description)
            .bind(role.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(role)
    }

    async fn delete(&self, id: RoleId) -> Result<(), PawHubError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
