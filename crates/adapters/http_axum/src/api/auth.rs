//! Signup and token endpoints.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_domain::user::User;

use super::response::{CreateResponse, GetResponse};
use super::users::CreateUserRequest;
use crate::error::ApiError;
use crate::extract::{JsonBody, MaybeUser};
use crate::state::AppState;

/// Request body for `POST /api/token`.
#[derive(Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Access/refresh pair returned on login.
#[derive(Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

/// Request body for `POST /api/token/refresh`.
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Fresh access token returned on refresh.
#[derive(Serialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

/// `POST /api/signup`
pub async fn signup<S, A>(
    State(state): State<AppState<S, A>>,
    caller: MaybeUser,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<CreateResponse<User>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let user = state
        .user_service
        .register(caller.actor().as_ref(), req.into())
        .await?;
    Ok(CreateResponse::Created(Json(user)))
}

/// `POST /api/token`
pub async fn obtain<S, A>(
    State(state): State<AppState<S, A>>,
    JsonBody(req): JsonBody<TokenRequest>,
) -> Result<GetResponse<TokenPairResponse>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let pair = state
        .user_service
        .login(&req.username, &req.password)
        .await?;
    Ok(GetResponse::Ok(Json(TokenPairResponse {
        access: pair.access,
        refresh: pair.refresh,
    })))
}

/// `POST /api/token/refresh`
pub async fn refresh<S, A>(
    State(state): State<AppState<S, A>>,
    JsonBody(req): JsonBody<RefreshRequest>,
) -> Result<GetResponse<AccessTokenResponse>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let access = state.user_service.refresh(&req.refresh).await?;
    Ok(GetResponse::Ok(Json(AccessTokenResponse { access })))
}
