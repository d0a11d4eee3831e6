//! JSON REST handlers for adoptions.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_app::services::adoption_service::{AdoptionChanges, UpdateMode};
use pawhub_domain::adoption::{Adoption, AdoptionStatus};
use pawhub_domain::id::{AdoptionId, AnimalId};

use super::response::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, JsonBody, QueryParams, parse_id};
use crate::pagination::Pagination;
use crate::state::AppState;

/// Request body for applying to adopt an animal.
#[derive(Deserialize)]
pub struct CreateAdoptionRequest {
    #[serde(alias = "animal")]
    pub animal_id: AnimalId,
}

/// Request body for updating an adoption. Absent fields are left unchanged.
#[derive(Deserialize)]
pub struct UpdateAdoptionRequest {
    #[serde(default, alias = "animal")]
    pub animal_id: Option<AnimalId>,
    pub status: Option<AdoptionStatus>,
}

impl From<UpdateAdoptionRequest> for AdoptionChanges {
    fn from(req: UpdateAdoptionRequest) -> Self {
        Self {
            animal_id: req.animal_id,
            status: req.status,
        }
    }
}

/// `GET /api/adoptions`
pub async fn list<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<ListResponse<Adoption>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let adoptions = state.adoption_service.list_adoptions(&user.actor(), page.request()).await?;
    Ok(ListResponse::Ok(Json(adoptions.into())))
}

/// `GET /api/adoptions/{id}`
pub async fn get<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<Adoption>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: AdoptionId = parse_id(&id)?;
    let adoption = state
        .adoption_service
        .get_adoption(&user.actor(), id)
        .await?;
    Ok(GetResponse::Ok(Json(adoption)))
}

/// `POST /api/adoptions`
pub async fn create<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    JsonBody(req): JsonBody<CreateAdoptionRequest>,
) -> Result<CreateResponse<Adoption>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let adoption = state
        .adoption_service
        .create_adoption(&user.actor(), req.animal_id)
        .await?;
    Ok(CreateResponse::Created(Json(adoption)))
}

/// `PATCH /api/adoptions/{id}` (staff)
pub async fn patch<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateAdoptionRequest>,
) -> Result<GetResponse<Adoption>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    update(&state, &user, &id, req, UpdateMode::Partial).await
}

/// `PUT /api/adoptions/{id}` (administrators)
pub async fn put<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateAdoptionRequest>,
) -> Result<GetResponse<Adoption>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    update(&state, &user, &id, req, UpdateMode::Full).await
}

async fn update<S, A>(
    state: &AppState<S, A>,
    user: &CurrentUser,
    id: &str,
    req: UpdateAdoptionRequest,
    mode: UpdateMode,
) -> Result<GetResponse<Adoption>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: AdoptionId = parse_id(id)?;
    let adoption = state
        .adoption_service
        .update_adoption(&user.actor(), id, req.into(), mode)
        .await?;
    Ok(GetResponse::Ok(Json(adoption)))
}

/// `DELETE /api/adoptions/{id}`
pub async fn delete<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: AdoptionId = parse_id(&id)?;
    state
        .adoption_service
        .delete_adoption(&user.actor(), id)
        .await?;
    Ok(DeleteResponse::NoContent)
}
