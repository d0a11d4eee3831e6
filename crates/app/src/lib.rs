//! # pawhub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - one repository per aggregate (`UserRepository`, `AnimalRepository`, …)
//!   - `Storage`: the bundle of repository types a storage adapter provides
//!   - `Authenticator`: password hashing and bearer tokens
//! - Define **driving/inbound ports** as use-case services:
//!   - `UserService`: signup, login, token refresh, account administration
//!   - `AnimalService` / `AdoptionService`: the adoption workflow
//!   - `DeviceService`: device CRUD and quantity adjustment
//!   - CRUD services for roles, usage logs, habits, notifications,
//!     subscriptions, and payments
//! - Enforce every role gate before touching a repository
//!
//! ## Dependency rule
//! Depends on `pawhub-domain` only (plus `tracing` and `chrono`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
