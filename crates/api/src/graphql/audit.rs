//! Activity-log recording for mutations.
//!
//! Every successful mutation appends one activity-log row naming the actor,
//! the action, the affected entity, and a redacted copy of the input
//! payload. If the append fails, the mutation fails: an unauditable write
//! must not be reported as a success.

use agrireg_core::audit::redact_payload;
use agrireg_db::models::activity_log::CreateActivityLog;
use agrireg_db::repositories::ActivityLogRepo;
use agrireg_db::DbPool;

use crate::auth::AuthUser;
use crate::error::{gql_db_error, GqlResult};

use agrireg_core::types::RecordUuid;

/// Append one activity-log row for a mutation performed by `user`.
///
/// The payload is redacted before it is persisted; sensitive keys
/// (passwords, tokens) are replaced with a marker.
pub async fn record_activity(
    pool: &DbPool,
    user: &AuthUser,
    action: &str,
    entity_type: &str,
    entity_uuid: Option<RecordUuid>,
    payload: Option<serde_json::Value>,
) -> GqlResult<()> {
    let entry = CreateActivityLog {
        user_uuid: Some(user.user_uuid),
        username: user.username.clone(),
        action: action.to_string(),
        entity_type: entity_type.to_string(),
        entity_uuid,
        payload: payload.map(redact_payload),
    };
    ActivityLogRepo::insert(pool, &entry)
        .await
        .map_err(gql_db_error)?;
    Ok(())
}

/// Serialize a mutation input into an audit payload value.
///
/// Serialization of our own DTOs cannot fail in practice; if it ever does,
/// the payload is simply omitted rather than failing the mutation.
pub fn audit_payload<T: serde::Serialize>(input: &T) -> Option<serde_json::Value> {
    match serde_json::to_value(input) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize audit payload");
            None
        }
    }
}
