//! JSON REST handlers for devices and the device-facing quantity endpoint.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_app::services::device_service::{DeviceChanges, NewDevice, QuantityRequest};
use pawhub_domain::device::{Device, QuantityAction, Resource};
use pawhub_domain::id::{AnimalId, DeviceId, UserId};

use super::response::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, DeviceKey, JsonBody, QueryParams, nullable, parse_id};
use crate::pagination::Pagination;
use crate::state::AppState;

/// Request body for registering a device.
#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    pub serial_number: String,
    pub name: String,
    /// Administrators may register a device on behalf of another user.
    #[serde(default, alias = "owner")]
    pub owner_id: Option<UserId>,
    #[serde(default, alias = "animal")]
    pub animal_id: Option<AnimalId>,
    #[serde(default)]
    pub food_limit: u32,
    #[serde(default)]
    pub water_limit: u32,
    #[serde(default)]
    pub food_quantity: u32,
    #[serde(default)]
    pub water_quantity: u32,
}

/// Request body for updating a device. Absent fields are left unchanged;
/// `animal_id: null` unlinks the animal.
#[derive(Deserialize)]
pub struct UpdateDeviceRequest {
    pub serial_number: Option<String>,
    pub name: Option<String>,
    #[serde(default, alias = "owner")]
    pub owner_id: Option<UserId>,
    #[serde(default, alias = "animal", deserialize_with = "nullable")]
    pub animal_id: Option<Option<AnimalId>>,
    pub food_limit: Option<u32>,
    pub water_limit: Option<u32>,
    pub food_quantity: Option<u32>,
    pub water_quantity: Option<u32>,
}

/// Request body for `POST /api/update-device-quantity`.
#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub serial_number: String,
    pub resource: Resource,
    pub action: QuantityAction,
    pub amount: u32,
}

/// `GET /api/devices`
pub async fn list<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<ListResponse<Device>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let devices = state.device_service.list_devices(&user.actor(), page.request()).await?;
    Ok(ListResponse::Ok(Json(devices.into())))
}

/// `GET /api/devices/{id}`
pub async fn get<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<Device>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: DeviceId = parse_id(&id)?;
    let device = state.device_service.get_device(&user.actor(), id).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /api/devices`
pub async fn create<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    JsonBody(req): JsonBody<CreateDeviceRequest>,
) -> Result<CreateResponse<Device>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let new = NewDevice {
        serial_number: req.serial_number,
        name: req.name,
        owner_id: req.owner_id,
        animal_id: req.animal_id,
        food_limit: req.food_limit,
        water_limit: req.water_limit,
        food_quantity: req.food_quantity,
        water_quantity: req.water_quantity,
    };
    let device = state
        .device_service
        .create_device(&user.actor(), new)
        .await?;
    Ok(CreateResponse::Created(Json(device)))
}

/// `PUT|PATCH /api/devices/{id}`
pub async fn update<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateDeviceRequest>,
) -> Result<GetResponse<Device>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: DeviceId = parse_id(&id)?;
    let changes = DeviceChanges {
        serial_number: req.serial_number,
        name: req.name,
        owner_id: req.owner_id,
        animal_id: req.animal_id,
        food_limit: req.food_limit,
        water_limit: req.water_limit,
        food_quantity: req.food_quantity,
        water_quantity: req.water_quantity,
    };
    let device = state
        .device_service
        .update_device(&user.actor(), id, changes)
        .await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `DELETE /api/devices/{id}`
pub async fn delete<S, A>(
    State(state): State<AppState<S, A>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let id: DeviceId = parse_id(&id)?;
    state.device_service.delete_device(&user.actor(), id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `POST /api/update-device-quantity`
///
/// Called by the devices themselves; authenticated by the `X-API-Key`
/// header rather than a user token.
pub async fn update_quantity<S, A>(
    State(state): State<AppState<S, A>>,
    _key: DeviceKey,
    JsonBody(req): JsonBody<UpdateQuantityRequest>,
) -> Result<GetResponse<Device>, ApiError>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let request = QuantityRequest {
        serial_number: req.serial_number,
        resource: req.resource,
        action: req.action,
        amount: req.amount,
    };
    let (device, _log) = state.device_service.adjust_quantity(request).await?;
    Ok(GetResponse::Ok(Json(device)))
}
