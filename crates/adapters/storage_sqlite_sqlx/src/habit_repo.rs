//! `SQLite` implementation of [`HabitRepository`].

use chrono::NaiveTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use pawhub_app::ports::{PageRequest, Paged, HabitRepository};
use pawhub_domain::error::PawHubError;
use pawhub_domain::habit::Habit;
use pawhub_domain::id::{AnimalId, HabitId};

use crate::error::StorageError;
use crate::row::{encode_time, paged, parsed, parsed_opt, timestamp};

struct Wrapper(Habit);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Habit {
            id: parsed(row, "id")?,
            animal_id: parsed(row, "animal_id")?,
            device_id: parsed_opt(row, "device_id")?,
            activity: parsed(row, "activity")?,
            notes: row.try_get("notes")?,
            scheduled_time: parsed_opt::<NaiveTime>(row, "scheduled_time")?,
            times_per_day: row.try_get("times_per_day")?,
            created_at: timestamp(row, "created_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO habits (
        id, animal_id, device_id, activity, notes, scheduled_time, times_per_day, created_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM habits WHERE id = ?";
const SELECT_BY_ANIMAL: &str =
    "SELECT * FROM habits WHERE animal_id = ? ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_BY_ANIMAL: &str = "SELECT COUNT(*) FROM habits WHERE animal_id = ?";
const SELECT_ALL: &str = "SELECT * FROM habits ORDER BY rowid LIMIT ? OFFSET ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM habits";
const UPDATE: &str = r"
    UPDATE habits
    SET device_id = ?, activity = ?, notes = ?, scheduled_time = ?, times_per_day = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM habits WHERE id = ?";

/// `SQLite`-backed habit repository.
#[derive(Clone)]
pub struct SqliteHabitRepository {
    pool: SqlitePool,
}

impl SqliteHabitRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HabitRepository for SqliteHabitRepository {
    async fn create(&self, habit: Habit) -> Result<Habit, PawHubError> {
        sqlx::query(INSERT)
            .bind(habit.id.to_string())
            .bind(habit.animal_id.to_string())
            .bind(habit.device_id.map(|id| id.to_string()))
            .bind(habit.activity.as_str())
            .bind(&habit.notes)
            .bind(habit.scheduled_time.map(|t| t.to_string()))
            .bind(habit.times_per_day)
            .bind(encode_time(&habit.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(habit)
    }

    async fn get_by_id(&self, id: HabitId) -> Result<Option<Habit>, PawHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self, page: PageRequest) -> Result<Paged<Habit>, PawHubError> {
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

    async fn find_by_animal(
        &self,
        animal_id: AnimalId,
        page: PageRequest,
    ) -> Result<Paged<Habit>, PawHubError> {
        let count: i64 = sqlx::query_scalar(COUNT_BY_ANIMAL)
            .bind(animal_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ANIMAL)
            .bind(animal_id.to_string())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(paged(count, rows.into_iter().map(|w| w.0).collect()))
    }

    async fn update(&self, habit: Habit) -> Result<Habit, PawHubError> {
        sqlx::query(UPDATE)
            .bind(habit.device_id.map(|id| id.to_string()))
            .bind(habit.activity.as_str())
            .bind(&habit.notes)
            .bind(habit.scheduled_time.map(|t| t.to_string()))
            .bind(habit.times_per_day)
            .bind(habit.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(habit)
    }

    async fn delete(&self, id: HabitId) -> Result<(), PawHubError> {
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
    use pawhub_domain::habit::HabitActivity;
    use pawhub_domain::user::UserRole;

    #[tokio::test]
    async fn should_preserve_schedule_through_roundtrip() {
        let pool = testing::pool().await;
        let volunteer = testing::user(&pool, "vol", UserRole::Volunteer).await;
        let animal = testing::animal(&pool, &volunteer).await;
        let device = testing::device(&pool, &volunteer, "SN-1").await;
        let repo = SqliteHabitRepository::new(pool);

        let mut habit = Habit::new(animal.id, HabitActivity::Eating);
        habit.device_id = Some(device.id);
        habit.scheduled_time = NaiveTime::from_hms_opt(7, 45, 0);
        habit.times_per_day = 3;
        repo.create(habit.clone()).await.unwrap();

        let fetched = repo.get_by_id(habit.id).await.unwrap().unwrap();
        assert_eq!(fetched.activity, HabitActivity::Eating);
        assert_eq!(fetched.device_id, Some(device.id));
        assert_eq!(fetched.scheduled_time, NaiveTime::from_hms_opt(7, 45, 0));
        assert_eq!(fetched.times_per_day, 3);
    }

    #[tokio::test]
    async fn should_list_habits_by_animal() {
        let pool = testing::pool().await;
        let volunteer = testing::user(&pool, "vol", UserRole::Volunteer).await;
        let rex = testing::animal(&pool, &volunteer).await;
        let luna = testing::animal(&pool, &volunteer).await;
        let repo = SqliteHabitRepository::new(pool);

        repo.create(Habit::new(rex.id, HabitActivity::Walking))
            .await
            .unwrap();
        repo.create(Habit::new(rex.id, HabitActivity::Sleeping))
            .await
            .unwrap();
        repo.create(Habit::new(luna.id, HabitActivity::Playing))
            .await
            .unwrap();

        let page = PageRequest::default();
        assert_eq!(repo.find_by_animal(rex.id, page).await.unwrap().count, 2);
        assert_eq!(repo.get_all(page).await.unwrap().count, 3);
    }

    #[tokio::test]
    async fn should_clear_schedule_on_update() {
        let pool = testing::pool().await;
        let volunteer = testing::user(&pool, "vol", UserRole::Volunteer).await;
        let animal = testing::animal(&pool, &volunteer).await;
        let repo = SqliteHabitRepository::new(pool);

        let mut habit = Habit::new(animal.id, HabitActivity::Drinking);
        habit.scheduled_time = NaiveTime::from_hms_opt(12, 0, 0);
        repo.create(habit.clone()).await.unwrap();

        habit.scheduled_time = None;
        habit.notes = "whenever".to_string();
        repo.update(habit.clone()).await.unwrap();

        let fetched = repo.get_by_id(habit.id).await.unwrap().unwrap();
        assert!(fetched.scheduled_time.is_none());
        assert_eq!(fetched.notes, "whenever");

        repo.delete(habit.id).await.unwrap();
        assert!(repo.get_by_id(habit.id).await.unwrap().is_none());
    }
}
