//! JSON REST handlers for notifications.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_app::services::notification_service::{NewNotification, NotificationChanges};
use pawhub_domain::id::{NotificationId, UserId};
use pawhub_domain::notification::{Notification, NotificationLevel};

use super::response::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, JsonBody, QueryParams, parse_id};
use crate::pagination::Pagination;
use crate::state::AppState;

/// Request body for sending a notification.
#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    #[serde(alias = "user")]
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub level: Option<NotificationLevel>,
}

/// Request body for updating a notification. Absent fields are left unchanged.
#[derive(Deserialize)]
pub struct UpdateNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub level: Option<NotificationLevel>,
    pub read: Option<bool>,
}

/// `GET /api/notifications`
pub async fn list<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<ListResponse<Notification>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let notifications = state
        .notification_service
        .list_notifications(&user.actor(), page.request())
        .await?;
    Ok(ListResponse::Ok(Json(notifications.into())))
}

/// `GET /api/notifications/{id}`
pub async fn get<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<Notification>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: NotificationId = parse_id(&id)?;
    let notification = state
        .notification_service
        .get_notification(&user.actor(), id)
        .await?;
    Ok(GetResponse::Ok(Json(notification)))
}

/// `POST /api/notifications`
pub async fn create<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    JsonBody(req): JsonBody<CreateNotificationRequest>,
) -> Result<CreateResponse<Notification>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let new = NewNotification {
        user_id: req.user_id,
        title: req.title,
        message: req.message,
        level: req.level,
    };
    let notification = state
        .notification_service
        .create_notification(&user.actor(), new)
        .await?;
    Ok(CreateResponse::Created(Json(notification)))
}

/// `PUT|PATCH /api/notifications/{id}`
pub async fn update<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateNotificationRequest>,
) -> Result<GetResponse<Notification>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: NotificationId = parse_id(&id)?;
    let changes = NotificationChanges {
        title: req.title,
        message: req.message,
        level: req.level,
        read: req.read,
    };
    let notification = state
        .notification_service
        .update_notification(&user.actor(), id, changes)
        .await?;
    Ok(GetResponse::Ok(Json(notification)))
}

/// `POST /api/notifications/{id}/read`
pub async fn mark_read<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<Notification>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: NotificationId = parse_id(&id)?;
    let notification = state
        .notification_service
        .mark_read(&user.actor(), id)
        .await?;
    Ok(GetResponse::Ok(Json(notification)))
}

/// `DELETE /api/notifications/{id}`
pub async fn delete<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: NotificationId = parse_id(&id)?;
    state
        .notification_service
        .delete_notification(&user.actor(), id)
        .await?;
    Ok(DeleteResponse::NoContent)
}
