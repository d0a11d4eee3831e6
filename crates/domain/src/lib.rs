//! # pawhub-domain
//!
//! Pure domain model for the pawhub shelter and pet-tracking backend.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, closed choice enums, error conventions, timestamps
//! - Define **Users** and **Roles** (accounts and RBAC)
//! - Define **Animals** and **Adoptions** (the adoption workflow)
//! - Define **Devices**, **Usage logs**, and **Habits** (IoT telemetry)
//! - Define **Notifications**, **Subscriptions**, and **Payments**
//! - Define **Permission** predicates evaluated against the acting user
//! - Contain all invariant enforcement and transition rules
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod choice;
pub mod error;
pub mod id;
pub mod time;

pub mod adoption;
pub mod animal;
pub mod device;
pub mod habit;
pub mod notification;
pub mod payment;
pub mod permission;
pub mod role;
pub mod subscription;
pub mod usage_log;
pub mod user;
