//! Biosecurity non-compliance case resolvers.

use async_graphql::{Context, InputObject, Object, SimpleObject};
use chrono::NaiveDate;
use serde::Serialize;

use agrireg_core::audit::{actions, entity_types};
use agrireg_core::biosecurity;
use agrireg_core::error::CoreError;
use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use agrireg_core::types::{RecordUuid, Timestamp};
use agrireg_db::models::biosecurity_case::{
    BiosecurityCase, BiosecurityCaseFilter, CreateBiosecurityCase, UpdateBiosecurityCase,
};
use agrireg_db::repositories::{BiosecurityCaseRepo, OffenceTypeRepo, PremiseRepo, UserRepo};
use agrireg_db::DbPool;

use crate::error::{gql_db_error, gql_error, GqlResult};
use crate::graphql::audit::{audit_payload, record_activity};
use crate::graphql::guard::{require_auth, require_officer};
use crate::graphql::resolvers::{actor_stub, ref_name, UserStubObject};
use crate::graphql::spreadsheet::{build_csv, ExportFile};

/// A non-compliance case with denormalized reference names.
#[derive(Debug, SimpleObject)]
#[graphql(name = "BiosecurityCase")]
pub struct BiosecurityCaseObject {
    /// Database id as a string (the raw value exceeds the JS safe-integer
    /// range).
    pub id: String,
    pub uuid: RecordUuid,
    pub case_no: String,
    pub premise_uuid: RecordUuid,
    pub premise_name: String,
    pub offence_type_uuid: RecordUuid,
    pub offence_description: String,
    pub inspection_date: NaiveDate,
    pub findings: String,
    pub action_taken: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<UserStubObject>,
    pub updated_by: Option<UserStubObject>,
}

#[derive(Debug, SimpleObject)]
pub struct BiosecurityCasePage {
    pub items: Vec<BiosecurityCaseObject>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, InputObject, Serialize)]
pub struct CreateBiosecurityCaseInput {
    pub case_no: String,
    pub premise_uuid: RecordUuid,
    pub offence_type_uuid: RecordUuid,
    pub inspection_date: NaiveDate,
    pub findings: String,
    pub action_taken: String,
}

impl From<CreateBiosecurityCaseInput> for CreateBiosecurityCase {
    fn from(input: CreateBiosecurityCaseInput) -> Self {
        Self {
            case_no: input.case_no,
            premise_uuid: input.premise_uuid,
            offence_type_uuid: input.offence_type_uuid,
            inspection_date: input.inspection_date,
            findings: input.findings,
            action_taken: input.action_taken,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject, Serialize)]
pub struct UpdateBiosecurityCaseInput {
    pub findings: Option<String>,
    pub action_taken: Option<String>,
    /// One of `open`, `compounded`, `closed`.
    pub status: Option<String>,
}

impl From<UpdateBiosecurityCaseInput> for UpdateBiosecurityCase {
    fn from(input: UpdateBiosecurityCaseInput) -> Self {
        Self {
            findings: input.findings,
            action_taken: input.action_taken,
            status: input.status,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct BiosecurityCaseFilterInput {
    pub premise_uuid: Option<RecordUuid>,
    pub offence_type_uuid: Option<RecordUuid>,
    pub status: Option<String>,
}

impl From<BiosecurityCaseFilterInput> for BiosecurityCaseFilter {
    fn from(input: BiosecurityCaseFilterInput) -> Self {
        Self {
            premise_uuid: input.premise_uuid,
            offence_type_uuid: input.offence_type_uuid,
            status: input.status,
        }
    }
}

fn validate_create(input: &CreateBiosecurityCaseInput) -> Result<(), CoreError> {
    biosecurity::validate_case_no(&input.case_no).map_err(CoreError::Validation)?;
    biosecurity::validate_text("findings", &input.findings).map_err(CoreError::Validation)?;
    biosecurity::validate_text("action taken", &input.action_taken)
        .map_err(CoreError::Validation)?;
    Ok(())
}

fn validate_update(input: &UpdateBiosecurityCaseInput) -> Result<(), CoreError> {
    if let Some(findings) = &input.findings {
        biosecurity::validate_text("findings", findings).map_err(CoreError::Validation)?;
    }
    if let Some(action_taken) = &input.action_taken {
        biosecurity::validate_text("action taken", action_taken).map_err(CoreError::Validation)?;
    }
    if let Some(status) = &input.status {
        biosecurity::validate_status(status).map_err(CoreError::Validation)?;
    }
    Ok(())
}

async fn decorate(
    pool: &DbPool,
    rows: Vec<BiosecurityCase>,
) -> GqlResult<Vec<BiosecurityCaseObject>> {
    let premise_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.premise_uuid).collect();
    let offence_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.offence_type_uuid).collect();
    let mut actor_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.created_by).collect();
    actor_uuids.extend(rows.iter().filter_map(|r| r.updated_by));

    let premises = PremiseRepo::name_map(pool, &premise_uuids)
        .await
        .map_err(gql_db_error)?;
    let offences = OffenceTypeRepo::name_map(pool, &offence_uuids)
        .await
        .map_err(gql_db_error)?;
    let actors = UserRepo::stubs_by_uuids(pool, &actor_uuids)
        .await
        .map_err(gql_db_error)?;

    Ok(rows
        .into_iter()
        .map(|r| BiosecurityCaseObject {
            id: r.id.to_string(),
            uuid: r.uuid,
            case_no: r.case_no,
            premise_uuid: r.premise_uuid,
            premise_name: ref_name(&premises, r.premise_uuid),
            offence_type_uuid: r.offence_type_uuid,
            offence_description: ref_name(&offences, r.offence_type_uuid),
            inspection_date: r.inspection_date,
            findings: r.findings,
            action_taken: r.action_taken,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
            created_by: actor_stub(&actors, Some(r.created_by)),
            updated_by: actor_stub(&actors, r.updated_by),
        })
        .collect())
}

async fn decorate_one(pool: &DbPool, row: BiosecurityCase) -> GqlResult<BiosecurityCaseObject> {
    let mut items = decorate(pool, vec![row]).await?;
    items
        .pop()
        .ok_or_else(|| gql_error(CoreError::Internal("decoration yielded no row".into())))
}

#[derive(Default)]
pub struct BiosecurityQuery;

#[Object]
impl BiosecurityQuery {
    /// List non-compliance cases, newest first.
    async fn biosecurity_cases(
        &self,
        ctx: &Context<'_>,
        filter: Option<BiosecurityCaseFilterInput>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> GqlResult<BiosecurityCasePage> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let filter: BiosecurityCaseFilter = filter.unwrap_or_default().into();
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);

        let rows = BiosecurityCaseRepo::list(pool, &filter, Some(limit), Some(offset))
            .await
            .map_err(gql_db_error)?;
        let total_count = BiosecurityCaseRepo::count(pool, &filter)
            .await
            .map_err(gql_db_error)?;
        let items = decorate(pool, rows).await?;
        Ok(BiosecurityCasePage {
            items,
            total_count,
            limit,
            offset,
        })
    }

    /// Fetch a single case by uuid.
    async fn biosecurity_case(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<BiosecurityCaseObject> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let row = BiosecurityCaseRepo::find_by_uuid(pool, uuid)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "biosecurity case",
                    uuid,
                })
            })?;
        decorate_one(pool, row).await
    }

    /// Export the filtered cases as a CSV spreadsheet.
    async fn export_biosecurity_cases(
        &self,
        ctx: &Context<'_>,
        filter: Option<BiosecurityCaseFilterInput>,
    ) -> GqlResult<ExportFile> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let filter: BiosecurityCaseFilter = filter.unwrap_or_default().into();
        let rows = BiosecurityCaseRepo::export(pool, &filter)
            .await
            .map_err(gql_db_error)?;
        let items = decorate(pool, rows).await?;

        let data: Vec<Vec<String>> = items
            .iter()
            .map(|r| {
                vec![
                    r.case_no.clone(),
                    r.premise_name.clone(),
                    r.offence_description.clone(),
                    r.inspection_date.to_string(),
                    r.findings.clone(),
                    r.action_taken.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        let csv = build_csv(
            &[
                "case_no",
                "premise",
                "offence",
                "inspection_date",
                "findings",
                "action_taken",
                "status",
            ],
            &data,
        );
        Ok(ExportFile::csv("biosecurity_cases", csv))
    }
}

#[derive(Default)]
pub struct BiosecurityMutation;

#[Object]
impl BiosecurityMutation {
    /// Open a new non-compliance case. The case number must be unique.
    async fn create_biosecurity_case(
        &self,
        ctx: &Context<'_>,
        input: CreateBiosecurityCaseInput,
    ) -> GqlResult<BiosecurityCaseObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        validate_create(&input).map_err(gql_error)?;
        if PremiseRepo::find_by_uuid(pool, input.premise_uuid)
            .await
            .map_err(gql_db_error)?
            .is_none()
        {
            return Err(gql_error(CoreError::NotFound {
                entity: "premise",
                uuid: input.premise_uuid,
            }));
        }
        if OffenceTypeRepo::find_by_uuid(pool, input.offence_type_uuid)
            .await
            .map_err(gql_db_error)?
            .is_none()
        {
            return Err(gql_error(CoreError::NotFound {
                entity: "offence type",
                uuid: input.offence_type_uuid,
            }));
        }

        let payload = audit_payload(&input);
        let row = BiosecurityCaseRepo::create(pool, user.user_uuid, &input.into())
            .await
            .map_err(gql_db_error)?;
        record_activity(
            pool,
            user,
            actions::CREATE,
            entity_types::BIOSECURITY_CASE,
            Some(row.uuid),
            payload,
        )
        .await?;
        tracing::info!(user = %user.username, uuid = %row.uuid, "biosecurity case created");
        decorate_one(pool, row).await
    }

    /// Partial update of findings, action taken, or case status.
    async fn update_biosecurity_case(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
        input: UpdateBiosecurityCaseInput,
    ) -> GqlResult<BiosecurityCaseObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        validate_update(&input).map_err(gql_error)?;
        let payload = audit_payload(&input);
        let row = BiosecurityCaseRepo::update(pool, uuid, user.user_uuid, &input.into())
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "biosecurity case",
                    uuid,
                })
            })?;
        record_activity(
            pool,
            user,
            actions::UPDATE,
            entity_types::BIOSECURITY_CASE,
            Some(uuid),
            payload,
        )
        .await?;
        tracing::info!(user = %user.username, %uuid, "biosecurity case updated");
        decorate_one(pool, row).await
    }

    /// Soft-delete a case.
    async fn delete_biosecurity_case(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<bool> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let deleted = BiosecurityCaseRepo::soft_delete(pool, uuid, user.user_uuid)
            .await
            .map_err(gql_db_error)?;
        if !deleted {
            return Err(gql_error(CoreError::NotFound {
                entity: "biosecurity case",
                uuid,
            }));
        }
        record_activity(
            pool,
            user,
            actions::DELETE,
            entity_types::BIOSECURITY_CASE,
            Some(uuid),
            None,
        )
        .await?;
        tracing::info!(user = %user.username, %uuid, "biosecurity case deleted");
        Ok(true)
    }

    /// Restore a soft-deleted case.
    async fn restore_biosecurity_case(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<BiosecurityCaseObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let restored = BiosecurityCaseRepo::restore(pool, uuid)
            .await
            .map_err(gql_db_error)?;
        if !restored {
            return Err(gql_error(CoreError::NotFound {
                entity: "biosecurity case",
                uuid,
            }));
        }
        record_activity(
            pool,
            user,
            actions::RESTORE,
            entity_types::BIOSECURITY_CASE,
            Some(uuid),
            None,
        )
        .await?;
        let row = BiosecurityCaseRepo::find_by_uuid(pool, uuid)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "biosecurity case",
                    uuid,
                })
            })?;
        decorate_one(pool, row).await
    }
}
