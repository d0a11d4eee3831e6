//! JSON REST handlers for animals, served under both `/api/animals` and
//! `/api/pets`.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_app::services::animal_service::{AnimalChanges, NewAnimal};
use pawhub_domain::animal::{Animal, AnimalStatus, AnimalType};
use pawhub_domain::error::{PawHubError, ValidationError};
use pawhub_domain::id::AnimalId;

use super::response::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, JsonBody, QueryParams, parse_id};
use crate::pagination::Pagination;
use crate::state::AppState;

/// Request body for registering an animal.
#[derive(Deserialize)]
pub struct CreateAnimalRequest {
    pub name: String,
    #[serde(default)]
    pub age: u32,
    pub breed: String,
    pub animal_type: AnimalType,
    pub status: Option<AnimalStatus>,
}

/// Request body for updating an animal. Absent fields are left unchanged.
///
/// A `status` change drives the animal's adoption record.
#[derive(Deserialize)]
pub struct UpdateAnimalRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub breed: Option<String>,
    pub animal_type: Option<AnimalType>,
    pub status: Option<AnimalStatus>,
}

/// Request body for `POST /api/animals/{id}/change_status`.
///
/// The status is kept as text so an unknown value gets its own answer
/// instead of a generic decoding error.
#[derive(Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
}

/// Acknowledgement returned by the status action.
#[derive(Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
}

/// Possible responses from the status action.
pub enum ChangeStatusResponse {
    Updated,
    InvalidStatus,
}

impl IntoResponse for ChangeStatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Updated => Json(StatusMessage {
                status: "animal status updated",
            })
            .into_response(),
            Self::InvalidStatus => (
                StatusCode::BAD_REQUEST,
                Json(StatusMessage {
                    status: "invalid status",
                }),
            )
                .into_response(),
        }
    }
}

/// `GET /api/animals`
pub async fn list<S, A>(
    State(state): State<AppState<S, A>>,
    _user: CurrentUser,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<ListResponse<Animal>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let animals = state.animal_service.list_animals(page.request()).await?;
    Ok(ListResponse::Ok(Json(animals.into())))
}

/// `GET /api/animals/{id}`
pub async fn get<S, A>(
    State(state): State<AppState<S, A>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<Animal>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: AnimalId = parse_id(&id)?;
    let animal = state.animal_service.get_animal(id).await?;
    Ok(GetResponse::Ok(Json(animal)))
}

/// `POST /api/animals`
pub async fn create<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    JsonBody(req): JsonBody<CreateAnimalRequest>,
) -> Result<CreateResponse<Animal>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let new = NewAnimal {
        name: req.name,
        age: req.age,
        breed: req.breed,
        animal_type: req.animal_type,
        status: req.status,
    };
    let animal = state
        .animal_service
        .create_animal(&user.actor(), new)
        .await?;
    Ok(CreateResponse::Created(Json(animal)))
}

/// `PUT|PATCH /api/animals/{id}`
pub async fn update<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateAnimalRequest>,
) -> Result<GetResponse<Animal>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: AnimalId = parse_id(&id)?;
    let changes = AnimalChanges {
        name: req.name,
        age: req.age,
        breed: req.breed,
        animal_type: req.animal_type,
        status: req.status,
    };
    let animal = state
        .animal_service
        .update_animal(&user.actor(), id, changes)
        .await?;
    Ok(GetResponse::Ok(Json(animal)))
}

/// `POST /api/animals/{id}/change_status`
pub async fn change_status<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ChangeStatusRequest>,
) -> Result<ChangeStatusResponse, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: AnimalId = parse_id(&id)?;
    match state
        .animal_service
        .change_status(&user.actor(), id, &req.status)
        .await
    {
        Ok(_) => Ok(ChangeStatusResponse::Updated),
        Err(PawHubError::Validation(ValidationError::Invalid { field: "status" })) => {
            Ok(ChangeStatusResponse::InvalidStatus)
        }
        Err(err) => Err(err.into()),
    }
}

/// `DELETE /api/animals/{id}`
pub async fn delete<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: AnimalId = parse_id(&id)?;
    state.animal_service.delete_animal(&user.actor(), id).await?;
    Ok(DeleteResponse::NoContent)
}
