//! Repository for the `users` table.

use std::collections::HashMap;

use agrireg_core::types::{RecordUuid, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserStub};

/// Column list for users queries.
const COLUMNS: &str = "id, uuid, username, email, password_hash, full_name, role, is_active, \
    failed_login_count, locked_until, last_login_at, created_at, updated_at";

/// Provides account lookup and login-state tracking for users.
pub struct UserRepo;

impl UserRepo {
    /// Create a new user account. The password must already be hashed.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, full_name, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.full_name)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by username (login lookup).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE uuid = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Batch-fetch user stubs (uuid + username) for denormalized actor
    /// display on audited entities.
    pub async fn stubs_by_uuids(
        pool: &PgPool,
        uuids: &[RecordUuid],
    ) -> Result<HashMap<RecordUuid, UserStub>, sqlx::Error> {
        if uuids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<UserStub> =
            sqlx::query_as("SELECT uuid, username FROM users WHERE uuid = ANY($1)")
                .bind(uuids)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|s| (s.uuid, s)).collect())
    }

    /// Bump the consecutive failed-login counter.
    pub async fn increment_failed_login(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET failed_login_count = failed_login_count + 1, updated_at = now()
             WHERE uuid = $1",
        )
        .bind(uuid)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Lock the account until the given time.
    pub async fn lock_account(
        pool: &PgPool,
        uuid: RecordUuid,
        locked_until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2, updated_at = now() WHERE uuid = $1")
            .bind(uuid)
            .bind(locked_until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset the failure counter and stamp a successful login.
    pub async fn record_successful_login(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET failed_login_count = 0, locked_until = NULL,
                last_login_at = now(), updated_at = now()
             WHERE uuid = $1",
        )
        .bind(uuid)
        .execute(pool)
        .await?;
        Ok(())
    }
}
