//! Schema assembly: merged query/mutation roots and build limits.

use std::sync::Arc;

use async_graphql::{EmptySubscription, MergedObject, Schema};

use agrireg_db::DbPool;

use crate::config::ServerConfig;
use crate::graphql::resolvers::activity::ActivityQuery;
use crate::graphql::resolvers::auth::{AuthMutation, AuthQuery};
use crate::graphql::resolvers::biosecurity::{BiosecurityMutation, BiosecurityQuery};
use crate::graphql::resolvers::catalogue::{CatalogueMutation, CatalogueQuery};
use crate::graphql::resolvers::livestock::{LivestockMutation, LivestockQuery};
use crate::graphql::resolvers::pricing::{PricingMutation, PricingQuery};
use crate::graphql::resolvers::production::{ProductionMutation, ProductionQuery};
use crate::graphql::resolvers::reference::{ReferenceMutation, ReferenceQuery};

/// Maximum query nesting depth.
const MAX_QUERY_DEPTH: usize = 10;
/// Maximum query complexity (roughly, field count after list multipliers).
const MAX_QUERY_COMPLEXITY: usize = 500;

#[derive(Default, MergedObject)]
pub struct QueryRoot(
    AuthQuery,
    ReferenceQuery,
    ProductionQuery,
    BiosecurityQuery,
    PricingQuery,
    LivestockQuery,
    CatalogueQuery,
    ActivityQuery,
);

#[derive(Default, MergedObject)]
pub struct MutationRoot(
    AuthMutation,
    ReferenceMutation,
    ProductionMutation,
    BiosecurityMutation,
    PricingMutation,
    LivestockMutation,
    CatalogueMutation,
);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the pool and server config as context data.
pub fn build_schema(pool: DbPool, config: Arc<ServerConfig>) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .limit_depth(MAX_QUERY_DEPTH)
    .limit_complexity(MAX_QUERY_COMPLEXITY)
    .data(pool)
    .data(config)
    .finish()
}
