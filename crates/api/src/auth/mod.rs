//! Authentication: JWT access tokens, refresh-token hashing, Argon2id
//! password hashing, and the per-request authenticated-user context.

pub mod jwt;
pub mod password;

use agrireg_core::types::RecordUuid;

/// The authenticated user attached to each GraphQL request.
///
/// Built from validated JWT claims by the `/graphql` handler and injected
/// into the request's context data; `None` means the request carried no
/// (valid) Bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's public uuid (JWT `sub` claim).
    pub user_uuid: RecordUuid,
    /// The user's login name (denormalized into activity-log rows).
    pub username: String,
    /// The user's role name (`"admin"`, `"officer"`, `"viewer"`).
    pub role: String,
}
