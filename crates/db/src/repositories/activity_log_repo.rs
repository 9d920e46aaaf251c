//! Repository for the `activity_logs` table (append-only audit trail).

use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use sqlx::PgPool;

use crate::models::activity_log::{ActivityLog, ActivityLogFilter, CreateActivityLog};

/// Column list for activity_logs queries.
const COLUMNS: &str =
    "id, user_uuid, username, action, entity_type, entity_uuid, payload, created_at";

/// Filter fragment shared by query / count. Binds $1-$4.
const FILTER: &str = "($1::UUID IS NULL OR user_uuid = $1) \
    AND ($2::TEXT IS NULL OR action = $2) \
    AND ($3::TEXT IS NULL OR entity_type = $3) \
    AND ($4::UUID IS NULL OR entity_uuid = $4)";

/// Provides insert and query operations for the activity log.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append one activity log row. The payload must already be redacted.
    pub async fn insert(
        pool: &PgPool,
        entry: &CreateActivityLog,
    ) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_logs (user_uuid, username, action, entity_type, entity_uuid, payload)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(entry.user_uuid)
            .bind(&entry.username)
            .bind(&entry.action)
            .bind(&entry.entity_type)
            .bind(entry.entity_uuid)
            .bind(&entry.payload)
            .fetch_one(pool)
            .await
    }

    /// Query activity logs with filtering and pagination, newest first.
    pub async fn query(
        pool: &PgPool,
        filter: &ActivityLogFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs
             WHERE {FILTER}
             ORDER BY id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(filter.user_uuid)
            .bind(&filter.action)
            .bind(&filter.entity_type)
            .bind(filter.entity_uuid)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count activity logs matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &ActivityLogFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*)::BIGINT FROM activity_logs WHERE {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.user_uuid)
            .bind(&filter.action)
            .bind(&filter.entity_type)
            .bind(filter.entity_uuid)
            .fetch_one(pool)
            .await
    }
}
