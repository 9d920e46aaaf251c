//! Pure domain logic for the agriculture registry backend.
//!
//! This crate has zero internal dependencies (no DB, no async, no I/O) so it
//! can be used by the repository layer, the API layer, and any future CLI
//! tooling alike.

pub mod audit;
pub mod biosecurity;
pub mod catalogue;
pub mod error;
pub mod livestock;
pub mod pagination;
pub mod pricing;
pub mod production;
pub mod roles;
pub mod types;
