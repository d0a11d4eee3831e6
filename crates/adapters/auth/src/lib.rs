//! # pawhub-adapter-auth
//!
//! Implements the [`Authenticator`](pawhub_app::ports::Authenticator) port.
//!
//! ## Responsibilities
//! - Hash and verify passwords with argon2id (PHC string format) on the
//!   tokio blocking pool
//! - Issue and verify HS256 JSON Web Tokens, split into short-lived access
//!   tokens and longer-lived refresh tokens
//!
//! ## Dependency rule
//! Depends on `pawhub-domain` and `pawhub-app` (for port traits).

mod error;
mod jwt;
mod password;

pub use error::AuthAdapterError;
pub use jwt::{Config, JwtAuthenticator};
