//! User account model.

use agrireg_core::types::{DbId, RecordUuid, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
///
/// `password_hash` is a PHC-formatted Argon2id string; it never leaves the
/// server (the API layer exposes only the stub fields).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The denormalized user stub embedded in audited entities and activity
/// log rows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserStub {
    pub uuid: RecordUuid,
    pub username: String,
}

/// DTO for creating a new user account. `password_hash` must already be
/// hashed by the caller.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
}
