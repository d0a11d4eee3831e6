//! JSON REST handlers for animal habits.

use axum::Json;
use axum::extract::{Path, State};
use chrono::NaiveTime;
use serde::Deserialize;

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_app::services::habit_service::{HabitChanges, NewHabit};
use pawhub_domain::habit::{Habit, HabitActivity};
use pawhub_domain::id::{AnimalId, DeviceId, HabitId};

use super::response::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, JsonBody, QueryParams, nullable, parse_id};
use crate::pagination::Pagination;
use crate::state::AppState;

/// Optional filters for `GET /api/habits`.
#[derive(Deserialize)]
pub struct HabitFilter {
    #[serde(alias = "animal_id")]
    pub animal: Option<AnimalId>,
}

/// Request body for recording a habit.
#[derive(Deserialize)]
pub struct CreateHabitRequest {
    #[serde(alias = "animal")]
    pub animal_id: AnimalId,
    #[serde(default, alias = "device")]
    pub device_id: Option<DeviceId>,
    pub activity: HabitActivity,
    #[serde(default)]
    pub notes: String,
    pub scheduled_time: Option<NaiveTime>,
    pub times_per_day: Option<u32>,
}

/// Request body for updating a habit. Absent fields are left unchanged;
/// `null` clears the device link or the schedule.
#[derive(Deserialize)]
pub struct UpdateHabitRequest {
    #[serde(default, alias = "device", deserialize_with = "nullable")]
    pub device_id: Option<Option<DeviceId>>,
    pub activity: Option<HabitActivity>,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub scheduled_time: Option<Option<NaiveTime>>,
    pub times_per_day: Option<u32>,
}

/// `GET /api/habits`
pub async fn list<S, A>(
    State(state): State<AppState<S, A>>,
    _user: CurrentUser,
    QueryParams(page): QueryParams<Pagination>,
    QueryParams(filter): QueryParams<HabitFilter>,
) -> Result<ListResponse<Habit>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let habits = state.habit_service.list_habits(filter.animal, page.request()).await?;
    Ok(ListResponse::Ok(Json(habits.into())))
}

/// `GET /api/habits/{id}`
pub async fn get<S, A>(
    State(state): State<AppState<S, A>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<Habit>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: HabitId = parse_id(&id)?;
    let habit = state.habit_service.get_habit(id).await?;
    Ok(GetResponse::Ok(Json(habit)))
}

/// `POST /api/habits`
pub async fn create<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    JsonBody(req): JsonBody<CreateHabitRequest>,
) -> Result<CreateResponse<Habit>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let new = NewHabit {
        animal_id: req.animal_id,
        device_id: req.device_id,
        activity: req.activity,
        notes: req.notes,
        scheduled_time: req.scheduled_time,
        times_per_day: req.times_per_day,
    };
    let habit = state.habit_service.create_habit(&user.actor(), new).await?;
    Ok(CreateResponse::Created(Json(habit)))
}

/// `PUT|PATCH /api/habits/{id}`
pub async fn update<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateHabitRequest>,
) -> Result<GetResponse<Habit>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: HabitId = parse_id(&id)?;
    let changes = HabitChanges {
        device_id: req.device_id,
        activity: req.activity,
        notes: req.notes,
        scheduled_time: req.scheduled_time,
        times_per_day: req.times_per_day,
    };
    let habit = state
        .habit_service
        .update_habit(&user.actor(), id, changes)
        .await?;
    Ok(GetResponse::Ok(Json(habit)))
}

/// `DELETE /api/habits/{id}`
pub async fn delete<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: HabitId = parse_id(&id)?;
    state.habit_service.delete_habit(&user.actor(), id).await?;
    Ok(DeleteResponse::NoContent)
}
