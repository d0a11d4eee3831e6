//! JSON REST handlers for subscriptions.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_app::services::subscription_service::{NewSubscription, SubscriptionChanges};
use pawhub_domain::id::{SubscriptionId, UserId};
use pawhub_domain::subscription::{Subscription, SubscriptionPlan, SubscriptionStatus};
use pawhub_domain::time::Timestamp;

use super::response::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, JsonBody, QueryParams, nullable, parse_id};
use crate::pagination::Pagination;
use crate::state::AppState;

/// Request body for starting a subscription.
#[derive(Deserialize)]
pub struct CreateSubscriptionRequest {
    #[serde(default, alias = "user")]
    pub user_id: Option<UserId>,
    pub plan: Option<SubscriptionPlan>,
    pub expires_at: Option<Timestamp>,
    pub auto_renew: Option<bool>,
}

/// Request body for updating a subscription. Absent fields are left
/// unchanged; `expires_at: null` removes the expiry.
#[derive(Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub plan: Option<SubscriptionPlan>,
    pub status: Option<SubscriptionStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub expires_at: Option<Option<Timestamp>>,
    pub auto_renew: Option<bool>,
}

/// `GET /api/subscriptions`
pub async fn list<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<ListResponse<Subscription>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let subscriptions = state
        .subscription_service
        .list_subscriptions(&user.actor(), page.request())
        .await?;
    Ok(ListResponse::Ok(Json(subscriptions.into())))
}

/// `GET /api/subscriptions/{id}`
pub async fn get<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<Subscription>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: SubscriptionId = parse_id(&id)?;
    let subscription = state
        .subscription_service
        .get_subscription(&user.actor(), id)
        .await?;
    Ok(GetResponse::Ok(Json(subscription)))
}

/// `POST /api/subscriptions`
pub async fn create<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    JsonBody(req): JsonBody<CreateSubscriptionRequest>,
) -> Result<CreateResponse<Subscription>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let new = NewSubscription {
        user_id: req.user_id,
        plan: req.plan,
        expires_at: req.expires_at,
        auto_renew: req.auto_renew,
    };
    let subscription = state
        .subscription_service
        .create_subscription(&user.actor(), new)
        .await?;
    Ok(CreateResponse::Created(Json(subscription)))
}

/// `PUT|PATCH /api/subscriptions/{id}`
pub async fn update<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateSubscriptionRequest>,
) -> Result<GetResponse<Subscription>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: SubscriptionId = parse_id(&id)?;
    let changes = SubscriptionChanges {
        plan: req.plan,
        status: req.status,
        expires_at: req.expires_at,
        auto_renew: req.auto_renew,
    };
    let subscription = state
        .subscription_service
        .update_subscription(&user.actor(), id, changes)
        .await?;
    Ok(GetResponse::Ok(Json(subscription)))
}

/// `POST /api/subscriptions/{id}/cancel`
pub async fn cancel<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<Subscription>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: SubscriptionId = parse_id(&id)?;
    let subscription = state
        .subscription_service
        .cancel_subscription(&user.actor(), id)
        .await?;
    Ok(GetResponse::Ok(Json(subscription)))
}

/// `DELETE /api/subscriptions/{id}`
pub async fn delete<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: SubscriptionId = parse_id(&id)?;
    state
        .subscription_service
        .delete_subscription(&user.actor(), id)
        .await?;
    Ok(DeleteResponse::NoContent)
}
