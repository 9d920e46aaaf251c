//! Domain error type shared across the repository and API layers.

use crate::types::RecordUuid;

/// Domain-level error for registry operations.
///
/// The API layer maps each variant onto a GraphQL error extension code;
/// see `agrireg-api`'s `error` module.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A record was not found (or is soft-deleted, which is the same thing
    /// as far as callers are concerned).
    #[error("{entity} {uuid} not found")]
    NotFound {
        entity: &'static str,
        uuid: RecordUuid,
    },

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state (duplicate registration
    /// number, already-restored record, ...).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials / session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An internal error that must not leak detail to clients.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Machine-readable error code surfaced in GraphQL error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::Unauthorized(_) => "UNAUTHORIZED",
            CoreError::Forbidden(_) => "FORBIDDEN",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
