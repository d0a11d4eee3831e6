//! JSON REST handlers for user accounts.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_app::services::user_service::{NewUser, UserChanges};
use pawhub_domain::id::UserId;
use pawhub_domain::user::{User, UserRole, UserStatus};

use super::response::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, JsonBody, MaybeUser, QueryParams, parse_id};
use crate::pagination::Pagination;
use crate::state::AppState;

/// Request body for creating an account (also used by `/api/signup`).
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            role: req.role,
            status: req.status,
        }
    }
}

/// Request body for updating an account. Absent fields are left unchanged.
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

/// `GET /api/users`
pub async fn list<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<ListResponse<User>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let users = state.user_service.list_users(&user.actor(), page.request()).await?;
    Ok(ListResponse::Ok(Json(users.into())))
}

/// `GET /api/users/me`
pub async fn me(user: CurrentUser) -> GetResponse<User> {
    GetResponse::Ok(Json(user.0))
}

/// `GET /api/users/{id}`
pub async fn get<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<User>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: UserId = parse_id(&id)?;
    let found = state.user_service.get_user(&user.actor(), id).await?;
    Ok(GetResponse::Ok(Json(found)))
}

/// `POST /api/users`
pub async fn create<S, A>(
    State(state): State<AppState<S, A>>,
    caller: MaybeUser,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<CreateResponse<User>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let created = state
        .user_service
        .register(caller.actor().as_ref(), req.into())
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT|PATCH /api/users/{id}`
pub async fn update<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<GetResponse<User>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: UserId = parse_id(&id)?;
    let changes = UserChanges {
        username: req.username,
        email: req.email,
        password: req.password,
        first_name: req.first_name,
        last_name: req.last_name,
        role: req.role,
        status: req.status,
    };
    let updated = state
        .user_service
        .update_user(&user.actor(), id, changes)
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/users/{id}`
pub async fn delete<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: UserId = parse_id(&id)?;
    state.user_service.delete_user(&user.actor(), id).await?;
    Ok(DeleteResponse::NoContent)
}
