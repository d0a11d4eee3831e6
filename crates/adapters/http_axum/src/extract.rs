//! Request extractors: bearer authentication, the device API key, and JSON
//! or query decoding with JSON error bodies.

use std::str::FromStr;

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use pawhub_app::ports::{Authenticator, Storage};
use pawhub_domain::error::{AuthError, PermissionError};
use pawhub_domain::permission::Actor;
use pawhub_domain::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared device secret.
pub const DEVICE_API_KEY_HEADER: &str = "x-api-key";

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// `Ok(None)` when the header is absent; an error when it is present but
/// not a bearer credential.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AuthError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    match value.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            Ok(Some(token.trim()))
        }
        _ => Err(AuthError::InvalidToken),
    }
}

/// The authenticated user behind a valid access token. Rejects with 401.
pub struct CurrentUser(pub User);

impl CurrentUser {
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::from(&self.0)
    }
}

impl<S, A> FromRequestParts<AppState<S, A>> for CurrentUser
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S, A>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or(AuthError::MissingCredentials)?
            .to_owned();
        let user = state.user_service.resolve_access_token(&token).await?;
        Ok(Self(user))
    }
}

/// Like [`CurrentUser`] for routes open to anonymous callers. A token that
/// is present but invalid is still rejected.
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    #[must_use]
    pub fn actor(&self) -> Option<Actor> {
        self.0.as_ref().map(Actor::from)
    }
}

impl<S, A> FromRequestParts<AppState<S, A>> for MaybeUser
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S, A>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts)?.map(str::to_owned) else {
            return Ok(Self(None));
        };
        let user = state.user_service.resolve_access_token(&token).await?;
        Ok(Self(Some(user)))
    }
}

/// Proof that the request carried the configured device API key.
/// Rejects with 403 when the header is missing or wrong.
pub struct DeviceKey;

impl<S, A> FromRequestParts<AppState<S, A>> for DeviceKey
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S, A>,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(DEVICE_API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        match provided {
            Some(key) if key == &*state.device_api_key => Ok(Self),
            _ => {
                tracing::warn!("device request with missing or wrong API key");
                Err(PermissionError::InvalidApiKey.into())
            }
        }
    }
}

/// JSON request body; decoding failures answer 400 with a JSON error body.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string parameters; decoding failures answer 400 with a JSON error
/// body.
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Parse a path segment into a typed id; malformed ids answer 400.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] when `raw` does not parse.
pub fn parse_id<T: FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid id: {raw}")))
}

/// Deserialize a field that distinguishes "absent" (`None`) from "null"
/// (`Some(None)`). Pair with `#[serde(default)]`.
///
/// # Errors
///
/// Propagates the inner deserialization error.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
