//! Shared application state.

use std::sync::Arc;

use agrireg_db::DbPool;

use crate::config::ServerConfig;
use crate::graphql::schema::AppSchema;

/// State shared across the axum router.
///
/// The GraphQL schema carries its own copies of the pool and config as
/// context data; the router-level state exists for the non-GraphQL routes
/// (health check) and for building the schema in one place.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    pub schema: AppSchema,
}

impl AppState {
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        let config = Arc::new(config);
        let schema = crate::graphql::schema::build_schema(pool.clone(), config.clone());
        Self {
            pool,
            config,
            schema,
        }
    }
}
