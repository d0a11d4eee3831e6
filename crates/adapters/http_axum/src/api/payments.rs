//! JSON REST handlers for payments.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_app::services::payment_service::NewPayment;
use pawhub_domain::id::{PaymentId, SubscriptionId};
use pawhub_domain::payment::{Payment, PaymentStatus};

use super::response::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, JsonBody, QueryParams, parse_id};
use crate::pagination::Pagination;
use crate::state::AppState;

fn default_currency() -> String {
    "EUR".to_string()
}

/// Request body for recording a payment.
#[derive(Deserialize)]
pub struct CreatePaymentRequest {
    #[serde(alias = "subscription")]
    pub subscription_id: SubscriptionId,
    pub amount_cents: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Request body for settling a payment.
#[derive(Deserialize)]
pub struct UpdatePaymentRequest {
    pub status: PaymentStatus,
}

/// `GET /api/payments`
pub async fn list<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<ListResponse<Payment>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let payments = state.payment_service.list_payments(&user.actor(), page.request()).await?;
    Ok(ListResponse::Ok(Json(payments.into())))
}

/// `GET /api/payments/{id}`
pub async fn get<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<Payment>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: PaymentId = parse_id(&id)?;
    let payment = state.payment_service.get_payment(&user.actor(), id).await?;
    Ok(GetResponse::Ok(Json(payment)))
}

/// `POST /api/payments`
pub async fn create<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    JsonBody(req): JsonBody<CreatePaymentRequest>,
) -> Result<CreateResponse<Payment>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let new = NewPayment {
        subscription_id: req.subscription_id,
        amount_cents: req.amount_cents,
        currency: req.currency,
    };
    let payment = state
        .payment_service
        .create_payment(&user.actor(), new)
        .await?;
    Ok(CreateResponse::Created(Json(payment)))
}

/// `PUT|PATCH /api/payments/{id}`
pub async fn update<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdatePaymentRequest>,
) -> Result<GetResponse<Payment>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: PaymentId = parse_id(&id)?;
    let payment = state
        .payment_service
        .update_status(&user.actor(), id, req.status)
        .await?;
    Ok(GetResponse::Ok(Json(payment)))
}

/// `DELETE /api/payments/{id}`
pub async fn delete<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: PaymentId = parse_id(&id)?;
    state.payment_service.delete_payment(&user.actor(), id).await?;
    Ok(DeleteResponse::NoContent)
}
