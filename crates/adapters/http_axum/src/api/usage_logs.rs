//! JSON REST handlers for device usage logs.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_domain::device::{Adjustment, QuantityAction, Resource};
use pawhub_domain::id::{DeviceId, UsageLogId};
use pawhub_domain::usage_log::UsageLog;

use super::response::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, JsonBody, QueryParams, parse_id};
use crate::pagination::Pagination;
use crate::state::AppState;

/// Optional filters for `GET /api/usage-logs`.
#[derive(Deserialize)]
pub struct UsageLogFilter {
    #[serde(alias = "device_id")]
    pub device: Option<DeviceId>,
}

/// Request body for inserting an entry by hand.
#[derive(Deserialize)]
pub struct CreateUsageLogRequest {
    #[serde(alias = "device")]
    pub device_id: DeviceId,
    pub resource: Resource,
    pub action: QuantityAction,
    pub amount: u32,
    pub previous_quantity: u32,
    pub new_quantity: u32,
}

/// `GET /api/usage-logs`
pub async fn list<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    QueryParams(page): QueryParams<Pagination>,
    QueryParams(filter): QueryParams<UsageLogFilter>,
) -> Result<ListResponse<UsageLog>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let logs = state
        .usage_log_service
        .list_logs(&user.actor(), filter.device, page.request())
        .await?;
    Ok(ListResponse::Ok(Json(logs.into())))
}

/// `GET /api/usage-logs/{id}`
pub async fn get<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<UsageLog>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: UsageLogId = parse_id(&id)?;
    let log = state.usage_log_service.get_log(&user.actor(), id).await?;
    Ok(GetResponse::Ok(Json(log)))
}

/// `POST /api/usage-logs`
pub async fn create<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    JsonBody(req): JsonBody<CreateUsageLogRequest>,
) -> Result<CreateResponse<UsageLog>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let log = UsageLog::record(
        req.device_id,
        req.resource,
        req.action,
        req.amount,
        Adjustment {
            previous: req.previous_quantity,
            current: req.new_quantity,
        },
    );
    let created = state
        .usage_log_service
        .create_log(&user.actor(), log)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `DELETE /api/usage-logs/{id}`
pub async fn delete<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: UsageLogId = parse_id(&id)?;
    state
        .usage_log_service
        .delete_log(&user.actor(), id)
        .await?;
    Ok(DeleteResponse::NoContent)
}
