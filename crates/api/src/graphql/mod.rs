//! GraphQL surface: schema assembly, per-request guards, audit recording,
//! tokenized-transport helpers, and the resolver modules.

pub mod audit;
pub mod guard;
pub mod payload_token;
pub mod resolvers;
pub mod schema;
pub mod spreadsheet;
