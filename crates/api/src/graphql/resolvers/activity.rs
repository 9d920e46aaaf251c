//! Activity-log query resolvers (admin only).

use async_graphql::{Context, InputObject, Object, SimpleObject};

use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use agrireg_core::types::{RecordUuid, Timestamp};
use agrireg_db::models::activity_log::{ActivityLog, ActivityLogFilter};
use agrireg_db::repositories::ActivityLogRepo;
use agrireg_db::DbPool;

use crate::error::{gql_db_error, GqlResult};
use crate::graphql::guard::require_admin;

/// One audit-trail entry. Rows are immutable; the payload is the redacted
/// input of the recorded mutation.
#[derive(Debug, SimpleObject)]
#[graphql(name = "ActivityLog")]
pub struct ActivityLogObject {
    pub id: String,
    pub user_uuid: Option<RecordUuid>,
    pub username: String,
    pub action: String,
    pub entity_type: String,
    pub entity_uuid: Option<RecordUuid>,
    /// Redacted mutation payload as a JSON string, if one was recorded.
    pub payload: Option<String>,
    pub created_at: Timestamp,
}

impl From<ActivityLog> for ActivityLogObject {
    fn from(log: ActivityLog) -> Self {
        Self {
            id: log.id.to_string(),
            user_uuid: log.user_uuid,
            username: log.username,
            action: log.action,
            entity_type: log.entity_type,
            entity_uuid: log.entity_uuid,
            payload: log.payload.map(|p| p.to_string()),
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct ActivityLogPage {
    pub items: Vec<ActivityLogObject>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct ActivityLogFilterInput {
    pub user_uuid: Option<RecordUuid>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_uuid: Option<RecordUuid>,
}

impl From<ActivityLogFilterInput> for ActivityLogFilter {
    fn from(input: ActivityLogFilterInput) -> Self {
        Self {
            user_uuid: input.user_uuid,
            action: input.action,
            entity_type: input.entity_type,
            entity_uuid: input.entity_uuid,
        }
    }
}

#[derive(Default)]
pub struct ActivityQuery;

#[Object]
impl ActivityQuery {
    /// Query the audit trail, newest first. Admin only.
    async fn activity_logs(
        &self,
        ctx: &Context<'_>,
        filter: Option<ActivityLogFilterInput>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> GqlResult<ActivityLogPage> {
        require_admin(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let filter: ActivityLogFilter = filter.unwrap_or_default().into();
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);

        let rows = ActivityLogRepo::query(pool, &filter, Some(limit), Some(offset))
            .await
            .map_err(gql_db_error)?;
        let total_count = ActivityLogRepo::count(pool, &filter)
            .await
            .map_err(gql_db_error)?;
        Ok(ActivityLogPage {
            items: rows.into_iter().map(Into::into).collect(),
            total_count,
            limit,
            offset,
        })
    }
}
