//! `SQLite` implementation of [`AdoptionRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use pawhub_app::ports::{PageRequest, Paged, AdoptionRepository};
use pawhub_domain::adoption::Adoption;
use pawhub_domain::error::PawHubError;
use pawhub_domain::id::{AdoptionId, AnimalId};

use crate::error::StorageError;
use crate::row::{encode_time, paged, parsed, timestamp};

struct Wrapper(Adoption);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Adoption> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Adoption {
            id: parsed(row, "id")?,
            animal_id: parsed(row, "animal_id")?,
            adopter_id: parsed(row, "adopter_id")?,
            volunteer_id: parsed(row, "volunteer_id")?,
            date: timestamp(row, "date")?,
            status: parsed(row, "status")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO adoptions (id, animal_id, adopter_id, volunteer_id, date, status)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM adoptions WHERE id = ?";
const SELECT_BY_ANIMAL: &str =
    "SELECT * FROM adoptions WHERE animal_id = ? ORDER BY date ASC, rowid ASC";
const SELECT_ALL: &str = "SELECT * FROM adoptions ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM adoptions";
const UPDATE: &str = r"
    UPDATE adoptions
    SET animal_id = ?, adopter_id = ?, volunteer_id = ?, date = ?, status = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM adoptions WHERE id = ?";

/// `SQLite`-backed adoption repository.
#[derive(Clone)]
pub struct SqliteAdoptionRepository {
    pool: SqlitePool,
}

impl SqliteAdoptionRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AdoptionRepository for SqliteAdoptionRepository {
    async fn create(&self, adoption: Adoption) -> Result<Adoption, PawHubError> {
        sqlx::query(INSERT)
            .bind(adoption.id.to_string())
            .bind(adoption.animal_id.to_string())
            .bind(adoption.adopter_id.to_string())
            .bind(adoption.volunteer_id.to_string())
            .bind(encode_time(&adoption.date))
            .bind(adoption.status.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(adoption)
    }

    async fn get_by_id(&self, id: AdoptionId) -> Result<Option<Adoption>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self, page: PageRequest) -> Result<Paged<Adoption>, PawHubError> {
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

    async fn find_by_animal(&self, animal_id: AnimalId) -> Result<Vec<Adoption>, PawHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ANIMAL)
            .bind(animal_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, adoption: Adoption) -> Result<Adoption, PawHubError> {
        sqlx::query(UPDATE)
            .bind(adoption.animal_id.to_string())
            .bind(adoption.adopter_id.to_string())
            .bind(adoption.volunteer_id.to_string())
            .bind(encode_time(&adoption.date))
            .bind(adoption.status.as_str())
            .bind(adoption.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(adoption)
    }

    async fn delete(&self, id: AdoptionId) -> Result<(), PawHubError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
