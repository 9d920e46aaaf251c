//! Error mapping between the domain layer and the GraphQL surface.
//!
//! Resolvers return [`GqlResult`]. Domain errors ([`CoreError`]) and database
//! errors (`sqlx::Error`) are converted into `async_graphql::Error` values
//! carrying a machine-readable `code` extension, so clients can branch on
//! error class without parsing messages.

use agrireg_core::error::CoreError;
use async_graphql::{Error as GqlError, ErrorExtensions};

pub type GqlResult<T> = Result<T, GqlError>;

/// Convert a domain error into a GraphQL error with a `code` extension.
pub fn gql_error(err: CoreError) -> GqlError {
    let code = err.code();
    let message = match &err {
        // Internal details never reach the client.
        CoreError::Internal(detail) => {
            tracing::error!(error = %detail, "internal error");
            "Internal server error".to_string()
        }
        other => other.to_string(),
    };
    GqlError::new(message).extend_with(|_, e| e.set("code", code))
}

/// Map a database error into a domain error.
///
/// Unique-constraint violations (SQLSTATE 23505) on our `uq_`-prefixed
/// constraints surface as [`CoreError::Conflict`]; everything else is
/// internal.
pub fn db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.starts_with("uq_") {
                tracing::debug!(constraint, "unique constraint violation");
                return CoreError::Conflict(format!(
                    "A record with the same unique value already exists ({constraint})"
                ));
            }
        }
    }
    tracing::error!(error = %err, "database error");
    CoreError::Internal(err.to_string())
}

/// Shortcut for `gql_error(db_error(err))`, the common repository-call case.
pub fn gql_db_error(err: sqlx::Error) -> GqlError {
    gql_error(db_error(err))
}
