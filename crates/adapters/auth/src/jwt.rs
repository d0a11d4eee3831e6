//! HS256 token issuing and the [`Authenticator`] implementation.

use std::future::Future;
use std::str::FromStr;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use pawhub_app::ports::{Authenticator, TokenKind};
use pawhub_domain::error::{AuthError, PawHubError};
use pawhub_domain::id::UserId;
use pawhub_domain::time::now;
use pawhub_domain::user::User;

use crate::error::AuthAdapterError;
use crate::password;

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared HMAC secret.
    pub secret: String,
    /// Lifetime of access tokens.
    pub access_ttl: Duration,
    /// Lifetime of refresh tokens.
    pub refresh_ttl: Duration,
}

impl Config {
    /// Five-minute access tokens and one-day refresh tokens.
    #[must_use]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::minutes(5),
            refresh_ttl: Duration::days(1),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    kind: String,
    iat: i64,
    exp: i64,
}

fn kind_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Access => "access",
        TokenKind::Refresh => "refresh",
    }
}

/// Argon2 + HS256 JWT implementation of [`Authenticator`].
#[derive(Clone)]
pub struct JwtAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtAuthenticator {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    fn sign(&self, user: &User, kind: TokenKind) -> Result<String, AuthAdapterError> {
        let issued_at = now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.to_string(),
            kind: kind_name(kind).to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl(kind)).timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }
}

impl Authenticator for JwtAuthenticator {
    fn hash_password(
        &self,
        password: &str,
    ) -> impl Future<Output = Result<String, PawHubError>> + Send {
        let plain = password.to_owned();
        async move {
            let hash = tokio::task::spawn_blocking(move || password::hash(&plain))
                .await
                .map_err(AuthAdapterError::from)??;
            Ok::<_, PawHubError>(hash)
        }
    }

    fn verify_password(&self, password: &str, hash: &str) -> impl Future<Output = bool> + Send {
        let plain = password.to_owned();
        let hash = hash.to_owned();
        async move {
            tokio::task::spawn_blocking(move || password::verify(&plain, &hash))
                .await
                .unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "password check task failed");
                    false
                })
        }
    }

    fn issue_token(&self, user: &User, kind: TokenKind) -> Result<String, PawHubError> {
        Ok(self.sign(user, kind)?)
    }

    fn verify_token(&self, token: &str, kind: TokenKind) -> Result<UserId, PawHubError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map_err(
            |err| {
                tracing::debug!(error = %err, "rejected bearer token");
                AuthError::InvalidToken
            },
        )?;
        if data.claims.kind != kind_name(kind) {
            return Err(AuthError::InvalidToken.into());
        }
        UserId::from_str(&data.claims.sub).map_err(|_| AuthError::InvalidToken.into())
    }
}
