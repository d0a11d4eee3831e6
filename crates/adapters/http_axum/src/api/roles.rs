//! JSON REST handlers for roles.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_domain::id::RoleId;
use pawhub_domain::role::Role;

use super::response::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, JsonBody, QueryParams, parse_id};
use crate::pagination::Pagination;
use crate::state::AppState;

/// Request body for creating a role.
#[derive(Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request body for updating a role. Absent fields are left unchanged.
#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// `GET /api/roles`
pub async fn list<S, A>(
    State(state): State<AppState<S, A>>,
    _user: CurrentUser,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<ListResponse<Role>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let roles = state.role_service.list_roles(page.request()).await?;
    Ok(ListResponse::Ok(Json(roles.into())))
}

/// `GET /api/roles/{id}`
pub async fn get<S, A>(
    State(state): State<AppState<S, A>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<Role>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: RoleId = parse_id(&id)?;
    let role = state.role_service.get_role(id).await?;
    Ok(GetResponse::Ok(Json(role)))
}

/// `POST /api/roles`
pub async fn create<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    JsonBody(req): JsonBody<CreateRoleRequest>,
) -> Result<CreateResponse<Role>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let role = state
        .role_service
        .create_role(&user.actor(), &req.name, req.description)
        .await?;
    Ok(CreateResponse::Created(Json(role)))
}

/// `PUT|PATCH /api/roles/{id}`
pub async fn update<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateRoleRequest>,
) -> Result<GetResponse<Role>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: RoleId = parse_id(&id)?;
    let role = state
        .role_service
        .update_role(&user.actor(), id, req.name.as_deref(), req.description)
        .await?;
    Ok(GetResponse::Ok(Json(role)))
}

/// `DELETE /api/roles/{id}`
pub async fn delete<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: RoleId = parse_id(&id)?;
    state.role_service.delete_role(&user.actor(), id).await?;
    Ok(DeleteResponse::NoContent)
}
