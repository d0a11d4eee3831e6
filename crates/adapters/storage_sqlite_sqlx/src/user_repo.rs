//! `SQLite` implementation of [`UserRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use pawhub_app::ports::{PageRequest, Paged, UserRepository};
use pawhub_domain::error::PawHubError;
use pawhub_domain::id::UserId;
use pawhub_domain::user::{User, UserRole};

use crate::error::StorageError;
use crate::row::{encode_time, paged, parsed, timestamp};

/// Wrapper for converting database rows into domain [`User`].
struct Wrapper(User);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(User {
            id: parsed(row, "id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            role: parsed(row, "role")?,
            status: parsed(row, "status")?,
            password_hash: row.try_get("password_hash")?,
            date_joined: timestamp(row, "date_joined")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO users (id, username, email, first_name, last_name, role, status, password_hash, date_joined)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = ?";
const SELECT_BY_USERNAME: &str = "SELECT * FROM users WHERE username = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM users WHERE email = ?";
const SELECT_BY_ROLE: &str =
    "SELECT * FROM users WHERE role = ? ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_BY_ROLE: &str = "SELECT COUNT(*) FROM users WHERE role = ?";
const SELECT_ALL: &str = "SELECT * FROM users ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM users";
const UPDATE: &str = r"
    UPDATE users
    SET username = ?, email = ?, first_name = ?, last_name = ?, role = ?, status = ?, password_hash = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM users WHERE id = ?";

/// `SQLite`-backed user repository.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, query: &'static str, value: &str) -> Result<Option<User>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: User) -> Result<User, PawHubError> {
        sqlx::query(INSERT)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role.as_str())
            .bind(user.status.as_str())
            .bind(&user.password_hash)
            .bind(encode_time(&user.date_joined))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, PawHubError> {
        self.find_one(SELECT_BY_ID, &id.to_string()).await
    }

    async fn get_all(&self, page: PageRequest) -> Result<Paged<User>, PawHubError> {
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

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PawHubError> {
        self.find_one(SELECT_BY_USERNAME, username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PawHubError> {
        self.find_one(SELECT_BY_EMAIL, email).await
    }

    async fn find_by_role(
        &self,
        role: UserRole,
        page: PageRequest,
    ) -> Result<Paged<User>, PawHubError> {
        let count: i64 = sqlx::query_scalar(COUNT_BY_ROLE)
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ROLE)
            .bind(role.as_str())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(paged(count, rows.into_iter().map(|w| w.0).collect()))
    }

    async fn update(&self, user: User) -> Result<User, PawHubError> {
        sqlx::query(UPDATE)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role.as_str())
            .bind(user.status.as_str())
            .bind(&user.password_hash)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), PawHubError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
