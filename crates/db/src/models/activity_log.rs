//! Activity log entity model. Rows are immutable once written (no
//! updated_at) and carry a redacted copy of the mutation payload.

use agrireg_core::types::{DbId, RecordUuid, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `activity_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub user_uuid: Option<RecordUuid>,
    pub username: String,
    pub action: String,
    pub entity_type: String,
    pub entity_uuid: Option<RecordUuid>,
    pub payload: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new activity log row. The payload must already be
/// redacted by the caller (see `agrireg_core::audit::redact_payload`).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActivityLog {
    pub user_uuid: Option<RecordUuid>,
    pub username: String,
    pub action: String,
    pub entity_type: String,
    pub entity_uuid: Option<RecordUuid>,
    pub payload: Option<serde_json::Value>,
}

/// Filter parameters for activity-log queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityLogFilter {
    pub user_uuid: Option<RecordUuid>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_uuid: Option<RecordUuid>,
}
