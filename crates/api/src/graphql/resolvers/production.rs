//! Production record resolvers: monthly produced quantity per premise and
//! commodity, with CSV export/import and tokenized create/update.

use std::sync::Arc;

use async_graphql::{Context, InputObject, Object, SimpleObject};
use serde::{Deserialize, Serialize};

use agrireg_core::audit::{actions, entity_types};
use agrireg_core::error::CoreError;
use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use agrireg_core::production;
use agrireg_core::types::{RecordUuid, Timestamp};
use agrireg_db::models::production_record::{
    CreateProductionRecord, ProductionRecord, ProductionRecordFilter, UpdateProductionRecord,
};
use agrireg_db::repositories::{CommodityRepo, PremiseRepo, ProductionRecordRepo, UserRepo};
use agrireg_db::DbPool;

use crate::auth::AuthUser;
use crate::config::ServerConfig;
use crate::error::{db_error, gql_db_error, gql_error, GqlResult};
use crate::graphql::audit::{audit_payload, record_activity};
use crate::graphql::guard::{require_auth, require_officer};
use crate::graphql::payload_token::{sign_payload, verify_payload};
use crate::graphql::resolvers::{actor_stub, ref_name, UserStubObject};
use crate::graphql::spreadsheet::{build_csv, parse_csv, ExportFile, ImportSummary};

/// A production record with denormalized reference names and actor stubs.
#[derive(Debug, SimpleObject)]
#[graphql(name = "ProductionRecord")]
pub struct ProductionRecordObject {
    /// Database id as a string (the raw value exceeds the JS safe-integer
    /// range).
    pub id: String,
    pub uuid: RecordUuid,
    pub premise_uuid: RecordUuid,
    pub premise_name: String,
    pub commodity_uuid: RecordUuid,
    pub commodity_name: String,
    pub year: i32,
    pub month: i32,
    pub quantity: f64,
    pub unit_value: Option<f64>,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<UserStubObject>,
    pub updated_by: Option<UserStubObject>,
}

#[derive(Debug, SimpleObject)]
pub struct ProductionRecordPage {
    pub items: Vec<ProductionRecordObject>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, InputObject, Serialize, Deserialize)]
pub struct CreateProductionRecordInput {
    pub premise_uuid: RecordUuid,
    pub commodity_uuid: RecordUuid,
    pub year: i32,
    pub month: i32,
    pub quantity: f64,
    pub unit_value: Option<f64>,
    pub remarks: Option<String>,
}

impl From<CreateProductionRecordInput> for CreateProductionRecord {
    fn from(input: CreateProductionRecordInput) -> Self {
        Self {
            premise_uuid: input.premise_uuid,
            commodity_uuid: input.commodity_uuid,
            year: input.year,
            month: input.month,
            quantity: input.quantity,
            unit_value: input.unit_value,
            remarks: input.remarks,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject, Serialize, Deserialize)]
pub struct UpdateProductionRecordInput {
    pub quantity: Option<f64>,
    pub unit_value: Option<f64>,
    pub remarks: Option<String>,
}

impl From<UpdateProductionRecordInput> for UpdateProductionRecord {
    fn from(input: UpdateProductionRecordInput) -> Self {
        Self {
            quantity: input.quantity,
            unit_value: input.unit_value,
            remarks: input.remarks,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct ProductionRecordFilterInput {
    pub premise_uuid: Option<RecordUuid>,
    pub commodity_uuid: Option<RecordUuid>,
    pub year: Option<i32>,
    pub month: Option<i32>,
}

impl From<ProductionRecordFilterInput> for ProductionRecordFilter {
    fn from(input: ProductionRecordFilterInput) -> Self {
        Self {
            premise_uuid: input.premise_uuid,
            commodity_uuid: input.commodity_uuid,
            year: input.year,
            month: input.month,
        }
    }
}

/// Tokenized-transport payload for `updateProductionRecordTokenized`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenizedUpdate {
    uuid: RecordUuid,
    input: UpdateProductionRecordInput,
}

fn validate_create(input: &CreateProductionRecordInput) -> Result<(), CoreError> {
    production::validate_year(input.year).map_err(CoreError::Validation)?;
    production::validate_month(input.month).map_err(CoreError::Validation)?;
    production::validate_quantity(input.quantity).map_err(CoreError::Validation)?;
    if let Some(remarks) = &input.remarks {
        production::validate_remarks(remarks).map_err(CoreError::Validation)?;
    }
    Ok(())
}

fn validate_update(input: &UpdateProductionRecordInput) -> Result<(), CoreError> {
    if let Some(quantity) = input.quantity {
        production::validate_quantity(quantity).map_err(CoreError::Validation)?;
    }
    if let Some(remarks) = &input.remarks {
        production::validate_remarks(remarks).map_err(CoreError::Validation)?;
    }
    Ok(())
}

/// Batch-resolve reference names and actor stubs for a page of rows.
async fn decorate(
    pool: &DbPool,
    rows: Vec<ProductionRecord>,
) -> GqlResult<Vec<ProductionRecordObject>> {
    let premise_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.premise_uuid).collect();
    let commodity_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.commodity_uuid).collect();
    let mut actor_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.created_by).collect();
    actor_uuids.extend(rows.iter().filter_map(|r| r.updated_by));

    let premises = PremiseRepo::name_map(pool, &premise_uuids)
        .await
        .map_err(gql_db_error)?;
    let commodities = CommodityRepo::name_map(pool, &commodity_uuids)
        .await
        .map_err(gql_db_error)?;
    let actors = UserRepo::stubs_by_uuids(pool, &actor_uuids)
        .await
        .map_err(gql_db_error)?;

    Ok(rows
        .into_iter()
        .map(|r| ProductionRecordObject {
            id: r.id.to_string(),
            uuid: r.uuid,
            premise_uuid: r.premise_uuid,
            premise_name: ref_name(&premises, r.premise_uuid),
            commodity_uuid: r.commodity_uuid,
            commodity_name: ref_name(&commodities, r.commodity_uuid),
            year: r.year,
            month: r.month,
            quantity: r.quantity,
            unit_value: r.unit_value,
            remarks: r.remarks,
            created_at: r.created_at,
            updated_at: r.updated_at,
            created_by: actor_stub(&actors, Some(r.created_by)),
            updated_by: actor_stub(&actors, r.updated_by),
        })
        .collect())
}

async fn decorate_one(pool: &DbPool, row: ProductionRecord) -> GqlResult<ProductionRecordObject> {
    let mut items = decorate(pool, vec![row]).await?;
    items
        .pop()
        .ok_or_else(|| gql_error(CoreError::Internal("decoration yielded no row".into())))
}

/// Validate, check references, insert, and audit one create. Shared by the
/// plain and tokenized mutations.
async fn create_inner(
    pool: &DbPool,
    user: &AuthUser,
    input: CreateProductionRecordInput,
) -> GqlResult<ProductionRecord> {
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
    if CommodityRepo::find_by_uuid(pool, input.commodity_uuid)
        .await
        .map_err(gql_db_error)?
        .is_none()
    {
        return Err(gql_error(CoreError::NotFound {
            entity: "commodity",
            uuid: input.commodity_uuid,
        }));
    }

    let payload = audit_payload(&input);
    let row = ProductionRecordRepo::create(pool, user.user_uuid, &input.into())
        .await
        .map_err(gql_db_error)?;
    record_activity(
        pool,
        user,
        actions::CREATE,
        entity_types::PRODUCTION_RECORD,
        Some(row.uuid),
        payload,
    )
    .await?;
    tracing::info!(user = %user.username, uuid = %row.uuid, "production record created");
    Ok(row)
}

/// Validate, apply a partial update, and audit. Shared by the plain and
/// tokenized mutations.
async fn update_inner(
    pool: &DbPool,
    user: &AuthUser,
    uuid: RecordUuid,
    input: UpdateProductionRecordInput,
) -> GqlResult<ProductionRecord> {
    validate_update(&input).map_err(gql_error)?;
    let payload = audit_payload(&input);
    let row = ProductionRecordRepo::update(pool, uuid, user.user_uuid, &input.into())
        .await
        .map_err(gql_db_error)?
        .ok_or_else(|| {
            gql_error(CoreError::NotFound {
                entity: "production record",
                uuid,
            })
        })?;
    record_activity(
        pool,
        user,
        actions::UPDATE,
        entity_types::PRODUCTION_RECORD,
        Some(uuid),
        payload,
    )
    .await?;
    tracing::info!(user = %user.username, %uuid, "production record updated");
    Ok(row)
}

#[derive(Default)]
pub struct ProductionQuery;

#[Object]
impl ProductionQuery {
    /// List production records, newest reporting period first.
    async fn production_records(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProductionRecordFilterInput>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> GqlResult<ProductionRecordPage> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let filter: ProductionRecordFilter = filter.unwrap_or_default().into();
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);

        let rows = ProductionRecordRepo::list(pool, &filter, Some(limit), Some(offset))
            .await
            .map_err(gql_db_error)?;
        let total_count = ProductionRecordRepo::count(pool, &filter)
            .await
            .map_err(gql_db_error)?;
        let items = decorate(pool, rows).await?;
        Ok(ProductionRecordPage {
            items,
            total_count,
            limit,
            offset,
        })
    }

    /// Fetch a single production record by uuid.
    async fn production_record(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<ProductionRecordObject> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let row = ProductionRecordRepo::find_by_uuid(pool, uuid)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "production record",
                    uuid,
                })
            })?;
        decorate_one(pool, row).await
    }

    /// Export the filtered records as a CSV spreadsheet.
    async fn export_production_records(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProductionRecordFilterInput>,
    ) -> GqlResult<ExportFile> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let filter: ProductionRecordFilter = filter.unwrap_or_default().into();
        let rows = ProductionRecordRepo::export(pool, &filter)
            .await
            .map_err(gql_db_error)?;
        let items = decorate(pool, rows).await?;

        let data: Vec<Vec<String>> = items
            .iter()
            .map(|r| {
                vec![
                    r.premise_name.clone(),
                    r.commodity_name.clone(),
                    r.year.to_string(),
                    r.month.to_string(),
                    r.quantity.to_string(),
                    r.unit_value.map(|v| v.to_string()).unwrap_or_default(),
                    r.remarks.clone().unwrap_or_default(),
                ]
            })
            .collect();
        let csv = build_csv(
            &[
                "premise",
                "commodity",
                "year",
                "month",
                "quantity",
                "unit_value",
                "remarks",
            ],
            &data,
        );
        Ok(ExportFile::csv("production_records", csv))
    }
}

#[derive(Default)]
pub struct ProductionMutation;

#[Object]
impl ProductionMutation {
    async fn create_production_record(
        &self,
        ctx: &Context<'_>,
        input: CreateProductionRecordInput,
    ) -> GqlResult<ProductionRecordObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let row = create_inner(pool, user, input).await?;
        decorate_one(pool, row).await
    }

    /// Tokenized-transport create: the argument is a signed JWT wrapping
    /// the input payload; the created record is returned the same way.
    async fn create_production_record_tokenized(
        &self,
        ctx: &Context<'_>,
        token: String,
    ) -> GqlResult<String> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let config = ctx.data::<Arc<ServerConfig>>()?;
        let input: CreateProductionRecordInput =
            verify_payload(&token, &config.jwt.secret).map_err(gql_error)?;
        let row = create_inner(pool, user, input).await?;
        sign_payload(&row, &config.jwt.secret).map_err(gql_error)
    }

    /// Partial update: absent fields keep their current value. An all-absent
    /// input still bumps the update stamp and writes an audit entry.
    async fn update_production_record(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
        input: UpdateProductionRecordInput,
    ) -> GqlResult<ProductionRecordObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let row = update_inner(pool, user, uuid, input).await?;
        decorate_one(pool, row).await
    }

    /// Tokenized-transport update; the payload carries the target uuid and
    /// the partial input.
    async fn update_production_record_tokenized(
        &self,
        ctx: &Context<'_>,
        token: String,
    ) -> GqlResult<String> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let config = ctx.data::<Arc<ServerConfig>>()?;
        let payload: TokenizedUpdate =
            verify_payload(&token, &config.jwt.secret).map_err(gql_error)?;
        let row = update_inner(pool, user, payload.uuid, payload.input).await?;
        sign_payload(&row, &config.jwt.secret).map_err(gql_error)
    }

    /// Soft-delete a record. Deleting a missing or already-deleted record
    /// returns a not-found error.
    async fn delete_production_record(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<bool> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let deleted = ProductionRecordRepo::soft_delete(pool, uuid, user.user_uuid)
            .await
            .map_err(gql_db_error)?;
        if !deleted {
            return Err(gql_error(CoreError::NotFound {
                entity: "production record",
                uuid,
            }));
        }
        record_activity(
            pool,
            user,
            actions::DELETE,
            entity_types::PRODUCTION_RECORD,
            Some(uuid),
            None,
        )
        .await?;
        tracing::info!(user = %user.username, %uuid, "production record deleted");
        Ok(true)
    }

    /// Restore a soft-deleted record.
    async fn restore_production_record(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<ProductionRecordObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let restored = ProductionRecordRepo::restore(pool, uuid)
            .await
            .map_err(gql_db_error)?;
        if !restored {
            return Err(gql_error(CoreError::NotFound {
                entity: "production record",
                uuid,
            }));
        }
        record_activity(
            pool,
            user,
            actions::RESTORE,
            entity_types::PRODUCTION_RECORD,
            Some(uuid),
            None,
        )
        .await?;
        let row = ProductionRecordRepo::find_by_uuid(pool, uuid)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "production record",
                    uuid,
                })
            })?;
        decorate_one(pool, row).await
    }

    /// Row-by-row CSV import. Expected columns:
    /// `premise_registration_no, commodity_code, year, month, quantity,
    /// unit_value, remarks` (last two optional). Bad rows are skipped and
    /// reported; valid rows commit.
    async fn import_production_records(
        &self,
        ctx: &Context<'_>,
        csv: String,
    ) -> GqlResult<ImportSummary> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let mut summary = ImportSummary::default();

        for (line_no, fields) in parse_csv(&csv) {
            if fields.len() < 5 {
                summary.record_error(line_no, "expected at least 5 columns");
                continue;
            }
            let registration_no = fields[0].trim();
            let premise = match PremiseRepo::find_by_registration_no(pool, registration_no)
                .await
                .map_err(gql_db_error)?
            {
                Some(p) => p,
                None => {
                    summary.record_error(
                        line_no,
                        format!("unknown premise registration no '{registration_no}'"),
                    );
                    continue;
                }
            };
            let commodity_code = fields[1].trim();
            let commodity = match CommodityRepo::find_by_code(pool, commodity_code)
                .await
                .map_err(gql_db_error)?
            {
                Some(c) => c,
                None => {
                    summary
                        .record_error(line_no, format!("unknown commodity code '{commodity_code}'"));
                    continue;
                }
            };
            let Ok(year) = fields[2].trim().parse::<i32>() else {
                summary.record_error(line_no, "invalid year");
                continue;
            };
            let Ok(month) = fields[3].trim().parse::<i32>() else {
                summary.record_error(line_no, "invalid month");
                continue;
            };
            let Ok(quantity) = fields[4].trim().parse::<f64>() else {
                summary.record_error(line_no, "invalid quantity");
                continue;
            };
            let unit_value = match fields.get(5).map(|s| s.trim()).filter(|s| !s.is_empty()) {
                Some(raw) => match raw.parse::<f64>() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        summary.record_error(line_no, "invalid unit value");
                        continue;
                    }
                },
                None => None,
            };
            let remarks = fields
                .get(6)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());

            let input = CreateProductionRecordInput {
                premise_uuid: premise.uuid,
                commodity_uuid: commodity.uuid,
                year,
                month,
                quantity,
                unit_value,
                remarks,
            };
            if let Err(e) = validate_create(&input) {
                summary.record_error(line_no, e);
                continue;
            }
            match ProductionRecordRepo::create(pool, user.user_uuid, &input.into()).await {
                Ok(_) => summary.imported += 1,
                Err(e) => summary.record_error(line_no, db_error(e)),
            }
        }

        record_activity(
            pool,
            user,
            actions::IMPORT,
            entity_types::PRODUCTION_RECORD,
            None,
            Some(serde_json::json!({
                "imported": summary.imported,
                "skipped": summary.skipped,
            })),
        )
        .await?;
        tracing::info!(
            user = %user.username,
            imported = summary.imported,
            skipped = summary.skipped,
            "production record import finished"
        );
        Ok(summary)
    }
}
