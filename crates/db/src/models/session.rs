//! Session model. One row per issued refresh token; only the SHA-256 hash
//! of the token is stored.

use agrireg_core::types::{DbId, RecordUuid, Timestamp};
use sqlx::FromRow;

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_uuid: RecordUuid,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
