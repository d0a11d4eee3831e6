//! `SQLite` implementation of [`AnimalRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use pawhub_app::ports::{PageRequest, Paged, AnimalRepository};
use pawhub_domain::animal::Animal;
use pawhub_domain::error::PawHubError;
use pawhub_domain::id::AnimalId;

use crate::error::StorageError;
use crate::row::{paged, parsed};

struct Wrapper(Animal);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Animal> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Animal {
            id: parsed(row, "id")?,
            name: row.try_get("name")?,
            age: row.try_get("age")?,
            breed: row.try_get("breed")?,
            animal_type: parsed(row, "animal_type")?,
            status: parsed(row, "status")?,
            volunteer_id: parsed(row, "volunteer_id")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO animals (id, name, age, breed, animal_type, status, volunteer_id)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM animals WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM animals ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM animals";
const UPDATE: &str = r"
    UPDATE animals
    SET name = ?, age = ?, breed = ?, animal_type = ?, status = ?, volunteer_id = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM animals WHERE id = ?";

/// `SQLite`-backed animal repository.
#[derive(Clone)]
pub struct SqliteAnimalRepository {
    pool: SqlitePool,
}

impl SqliteAnimalRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AnimalRepository for SqliteAnimalRepository {
    async fn create(&self, animal: Animal) -> Result<Animal, PawHubError> {
        sqlx::query(INSERT)
            .bind(animal.id.to_string())
            .bind(&animal.name)
            .bind(animal.age)
            .bind(&animal.breed)
            .bind(animal.animal_type.as_str())
            .bind(animal.status.as_str())
            .bind(animal.volunteer_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(animal)
    }

    async fn get_by_id(&self, id: AnimalId) -> Result<Option<Animal>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self, page: PageRequest) -> Result<Paged<Animal>, PawHubError> {
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

    async fn update(&self, animal: Animal) -> Result<Animal, PawHubError> {
        sqlx::query(UPDATE)
            .bind(&animal.name)
            .bind(animal.age)
            .bind(&animal.breed)
            .bind(animal.animal_type.as_str())
            .bind(animal.status.as_str())
            .bind(animal.volunteer_id.to_string())
            .bind(animal.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(animal)
    }

    async fn delete(&self, id: AnimalId) -> Result<(), PawHubError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
