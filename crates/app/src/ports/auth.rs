//! Authentication port: password hashing and bearer tokens.

use std::future::Future;

use pawhub_domain::error::PawHubError;
use pawhub_domain::id::UserId;
use pawhub_domain::user::User;

/// Which half of a token pair a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// An access/refresh token pair handed out on login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Hashes passwords and issues/verifies bearer tokens.
///
/// Password work is slow on purpose, so it is asynchronous and must not
/// block the calling executor. Token work is cheap and synchronous.
pub trait Authenticator {
    /// Hash a plaintext password for storage.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Storage`] when hashing itself fails.
    fn hash_password(
        &self,
        password: &str,
    ) -> impl Future<Output = Result<String, PawHubError>> + Send;

    /// Check a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> impl Future<Output = bool> + Send;

    /// Issue a signed token of `kind` for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Storage`] when signing fails.
    fn issue_token(&self, user: &User, kind: TokenKind) -> Result<String, PawHubError>;

    /// Verify a token of `kind` and return the user it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Unauthorized`] when the token is malformed,
    /// expired, or of the other kind.
    fn verify_token(&self, token: &str, kind: TokenKind) -> Result<UserId, PawHubError>;
}

impl<T: Authenticator> Authenticator for std::sync::Arc<T> {
    fn hash_password(
        &self,
        password: &str,
    ) -> impl Future<Output = Result<String, PawHubError>> + Send {
        (**self).hash_password(password)
    }

    fn verify_password(&self, password: &str, hash: &str) -> impl Future<Output = bool> + Send {
        (**self).verify_password(password, hash)
    }

    fn issue_token(&self, user: &User, kind: TokenKind) -> Result<String, PawHubError> {
        (**self).issue_token(user, kind)
    }

    fn verify_token(&self, token: &str, kind: TokenKind) -> Result<UserId, PawHubError> {
        (**self).verify_token(token, kind)
    }
}
