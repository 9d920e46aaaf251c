//! Repository for the `sessions` table (refresh-token sessions).

use agrireg_core::types::{DbId, RecordUuid, Timestamp};
use sqlx::PgPool;

use crate::models::session::Session;

/// Column list for sessions queries.
const COLUMNS: &str = "id, user_uuid, refresh_token_hash, expires_at, revoked_at, created_at";

/// Provides session create / lookup / revoke operations.
pub struct SessionRepo;

impl SessionRepo {
    /// Create a session row for a freshly issued refresh token.
    pub async fn create(
        pool: &PgPool,
        user_uuid: RecordUuid,
        refresh_token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (user_uuid, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(user_uuid)
            .bind(refresh_token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find an active (unrevoked, unexpired) session by refresh-token hash.
    pub async fn find_active_by_token_hash(
        pool: &PgPool,
        refresh_token_hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE refresh_token_hash = $1 AND revoked_at IS NULL AND expires_at > now()"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(refresh_token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a single session (token rotation).
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE sessions SET revoked_at = now() WHERE id = $1 AND revoked_at IS NULL")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Revoke every active session belonging to a user (logout).
    ///
    /// Returns the number of sessions revoked.
    pub async fn revoke_all_for_user(
        pool: &PgPool,
        user_uuid: RecordUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = now()
             WHERE user_uuid = $1 AND revoked_at IS NULL",
        )
        .bind(user_uuid)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
