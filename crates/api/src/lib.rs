//! HTTP server and GraphQL schema for the agriculture registry.

pub mod auth;
pub mod config;
pub mod error;
pub mod graphql;
pub mod router;
pub mod state;
