//! # pawhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON REST API** under `/api` (`/api/animals`,
//!   `/api/adoptions`, `/api/devices`, …) plus `GET /health`
//! - Authenticate bearer tokens and the device API key through extractors
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `pawhub-app` (for port traits and services) and `pawhub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod router;
pub mod state;

pub use router::build;
pub use state::AppState;
