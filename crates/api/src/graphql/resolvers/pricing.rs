//! Retail price resolvers: market price surveys per district and commodity,
//! with CSV export/import and tokenized create/update.

use std::sync::Arc;

use async_graphql::{Context, InputObject, Object, SimpleObject};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use agrireg_core::audit::{actions, entity_types};
use agrireg_core::error::CoreError;
use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use agrireg_core::pricing;
use agrireg_core::types::{RecordUuid, Timestamp};
use agrireg_db::models::retail_price::{
    CreateRetailPrice, RetailPrice, RetailPriceFilter, UpdateRetailPrice,
};
use agrireg_db::repositories::{CommodityRepo, DistrictRepo, RetailPriceRepo, UserRepo};
use agrireg_db::DbPool;

use crate::auth::AuthUser;
use crate::config::ServerConfig;
use crate::error::{db_error, gql_db_error, gql_error, GqlResult};
use crate::graphql::audit::{audit_payload, record_activity};
use crate::graphql::guard::{require_auth, require_officer};
use crate::graphql::payload_token::{sign_payload, verify_payload};
use crate::graphql::resolvers::{actor_stub, ref_name, UserStubObject};
use crate::graphql::spreadsheet::{build_csv, parse_csv, ExportFile, ImportSummary};

/// A retail price survey row with denormalized reference names.
#[derive(Debug, SimpleObject)]
#[graphql(name = "RetailPrice")]
pub struct RetailPriceObject {
    /// Database id as a string (the raw value exceeds the JS safe-integer
    /// range).
    pub id: String,
    pub uuid: RecordUuid,
    pub district_uuid: RecordUuid,
    pub district_name: String,
    pub commodity_uuid: RecordUuid,
    pub commodity_name: String,
    pub market_name: String,
    pub survey_date: NaiveDate,
    pub price: f64,
    pub unit: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<UserStubObject>,
    pub updated_by: Option<UserStubObject>,
}

#[derive(Debug, SimpleObject)]
pub struct RetailPricePage {
    pub items: Vec<RetailPriceObject>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, InputObject, Serialize, Deserialize)]
pub struct CreateRetailPriceInput {
    pub district_uuid: RecordUuid,
    pub commodity_uuid: RecordUuid,
    pub market_name: String,
    pub survey_date: NaiveDate,
    pub price: f64,
    pub unit: String,
}

impl From<CreateRetailPriceInput> for CreateRetailPrice {
    fn from(input: CreateRetailPriceInput) -> Self {
        Self {
            district_uuid: input.district_uuid,
            commodity_uuid: input.commodity_uuid,
            market_name: input.market_name,
            survey_date: input.survey_date,
            price: input.price,
            unit: input.unit,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject, Serialize, Deserialize)]
pub struct UpdateRetailPriceInput {
    pub market_name: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
}

impl From<UpdateRetailPriceInput> for UpdateRetailPrice {
    fn from(input: UpdateRetailPriceInput) -> Self {
        Self {
            market_name: input.market_name,
            price: input.price,
            unit: input.unit,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct RetailPriceFilterInput {
    pub district_uuid: Option<RecordUuid>,
    pub commodity_uuid: Option<RecordUuid>,
    pub survey_date_from: Option<NaiveDate>,
    pub survey_date_to: Option<NaiveDate>,
}

impl From<RetailPriceFilterInput> for RetailPriceFilter {
    fn from(input: RetailPriceFilterInput) -> Self {
        Self {
            district_uuid: input.district_uuid,
            commodity_uuid: input.commodity_uuid,
            survey_date_from: input.survey_date_from,
            survey_date_to: input.survey_date_to,
        }
    }
}

/// Tokenized-transport payload for `updateRetailPriceTokenized`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenizedUpdate {
    uuid: RecordUuid,
    input: UpdateRetailPriceInput,
}

fn validate_create(input: &CreateRetailPriceInput) -> Result<(), CoreError> {
    pricing::validate_market_name(&input.market_name).map_err(CoreError::Validation)?;
    pricing::validate_price(input.price).map_err(CoreError::Validation)?;
    pricing::validate_unit(&input.unit).map_err(CoreError::Validation)?;
    Ok(())
}

fn validate_update(input: &UpdateRetailPriceInput) -> Result<(), CoreError> {
    if let Some(market_name) = &input.market_name {
        pricing::validate_market_name(market_name).map_err(CoreError::Validation)?;
    }
    if let Some(price) = input.price {
        pricing::validate_price(price).map_err(CoreError::Validation)?;
    }
    if let Some(unit) = &input.unit {
        pricing::validate_unit(unit).map_err(CoreError::Validation)?;
    }
    Ok(())
}

async fn decorate(pool: &DbPool, rows: Vec<RetailPrice>) -> GqlResult<Vec<RetailPriceObject>> {
    let district_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.district_uuid).collect();
    let commodity_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.commodity_uuid).collect();
    let mut actor_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.created_by).collect();
    actor_uuids.extend(rows.iter().filter_map(|r| r.updated_by));

    let districts = DistrictRepo::name_map(pool, &district_uuids)
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
        .map(|r| RetailPriceObject {
            id: r.id.to_string(),
            uuid: r.uuid,
            district_uuid: r.district_uuid,
            district_name: ref_name(&districts, r.district_uuid),
            commodity_uuid: r.commodity_uuid,
            commodity_name: ref_name(&commodities, r.commodity_uuid),
            market_name: r.market_name,
            survey_date: r.survey_date,
            price: r.price,
            unit: r.unit,
            created_at: r.created_at,
            updated_at: r.updated_at,
            created_by: actor_stub(&actors, Some(r.created_by)),
            updated_by: actor_stub(&actors, r.updated_by),
        })
        .collect())
}

async fn decorate_one(pool: &DbPool, row: RetailPrice) -> GqlResult<RetailPriceObject> {
    let mut items = decorate(pool, vec![row]).await?;
    items
        .pop()
        .ok_or_else(|| gql_error(CoreError::Internal("decoration yielded no row".into())))
}

async fn create_inner(
    pool: &DbPool,
    user: &AuthUser,
    input: CreateRetailPriceInput,
) -> GqlResult<RetailPrice> {
    validate_create(&input).map_err(gql_error)?;
    if DistrictRepo::find_by_uuid(pool, input.district_uuid)
        .await
        .map_err(gql_db_error)?
        .is_none()
    {
        return Err(gql_error(CoreError::NotFound {
            entity: "district",
            uuid: input.district_uuid,
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
    let row = RetailPriceRepo::create(pool, user.user_uuid, &input.into())
        .await
        .map_err(gql_db_error)?;
    record_activity(
        pool,
        user,
        actions::CREATE,
        entity_types::RETAIL_PRICE,
        Some(row.uuid),
        payload,
    )
    .await?;
    tracing::info!(user = %user.username, uuid = %row.uuid, "retail price created");
    Ok(row)
}

async fn update_inner(
    pool: &DbPool,
    user: &AuthUser,
    uuid: RecordUuid,
    input: UpdateRetailPriceInput,
) -> GqlResult<RetailPrice> {
    validate_update(&input).map_err(gql_error)?;
    let payload = audit_payload(&input);
    let row = RetailPriceRepo::update(pool, uuid, user.user_uuid, &input.into())
        .await
        .map_err(gql_db_error)?
        .ok_or_else(|| {
            gql_error(CoreError::NotFound {
                entity: "retail price",
                uuid,
            })
        })?;
    record_activity(
        pool,
        user,
        actions::UPDATE,
        entity_types::RETAIL_PRICE,
        Some(uuid),
        payload,
    )
    .await?;
    tracing::info!(user = %user.username, %uuid, "retail price updated");
    Ok(row)
}

#[derive(Default)]
pub struct PricingQuery;

#[Object]
impl PricingQuery {
    /// List retail price surveys, newest survey date first.
    async fn retail_prices(
        &self,
        ctx: &Context<'_>,
        filter: Option<RetailPriceFilterInput>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> GqlResult<RetailPricePage> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let filter: RetailPriceFilter = filter.unwrap_or_default().into();
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);

        let rows = RetailPriceRepo::list(pool, &filter, Some(limit), Some(offset))
            .await
            .map_err(gql_db_error)?;
        let total_count = RetailPriceRepo::count(pool, &filter)
            .await
            .map_err(gql_db_error)?;
        let items = decorate(pool, rows).await?;
        Ok(RetailPricePage {
            items,
            total_count,
            limit,
            offset,
        })
    }

    /// Fetch a single retail price survey by uuid.
    async fn retail_price(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<RetailPriceObject> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let row = RetailPriceRepo::find_by_uuid(pool, uuid)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "retail price",
                    uuid,
                })
            })?;
        decorate_one(pool, row).await
    }

    /// Export the filtered surveys as a CSV spreadsheet.
    async fn export_retail_prices(
        &self,
        ctx: &Context<'_>,
        filter: Option<RetailPriceFilterInput>,
    ) -> GqlResult<ExportFile> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let filter: RetailPriceFilter = filter.unwrap_or_default().into();
        let rows = RetailPriceRepo::export(pool, &filter)
            .await
            .map_err(gql_db_error)?;
        let items = decorate(pool, rows).await?;

        let data: Vec<Vec<String>> = items
            .iter()
            .map(|r| {
                vec![
                    r.district_name.clone(),
                    r.commodity_name.clone(),
                    r.market_name.clone(),
                    r.survey_date.to_string(),
                    r.price.to_string(),
                    r.unit.clone(),
                ]
            })
            .collect();
        let csv = build_csv(
            &[
                "district",
                "commodity",
                "market",
                "survey_date",
                "price",
                "unit",
            ],
            &data,
        );
        Ok(ExportFile::csv("retail_prices", csv))
    }
}

#[derive(Default)]
pub struct PricingMutation;

#[Object]
impl PricingMutation {
    async fn create_retail_price(
        &self,
        ctx: &Context<'_>,
        input: CreateRetailPriceInput,
    ) -> GqlResult<RetailPriceObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let row = create_inner(pool, user, input).await?;
        decorate_one(pool, row).await
    }

    /// Tokenized-transport create: the argument is a signed JWT wrapping
    /// the input payload; the created record is returned the same way.
    async fn create_retail_price_tokenized(
        &self,
        ctx: &Context<'_>,
        token: String,
    ) -> GqlResult<String> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let config = ctx.data::<Arc<ServerConfig>>()?;
        let input: CreateRetailPriceInput =
            verify_payload(&token, &config.jwt.secret).map_err(gql_error)?;
        let row = create_inner(pool, user, input).await?;
        sign_payload(&row, &config.jwt.secret).map_err(gql_error)
    }

    async fn update_retail_price(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
        input: UpdateRetailPriceInput,
    ) -> GqlResult<RetailPriceObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let row = update_inner(pool, user, uuid, input).await?;
        decorate_one(pool, row).await
    }

    /// Tokenized-transport update; the payload carries the target uuid and
    /// the partial input.
    async fn update_retail_price_tokenized(
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

    /// Soft-delete a survey row.
    async fn delete_retail_price(&self, ctx: &Context<'_>, uuid: RecordUuid) -> GqlResult<bool> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let deleted = RetailPriceRepo::soft_delete(pool, uuid, user.user_uuid)
            .await
            .map_err(gql_db_error)?;
        if !deleted {
            return Err(gql_error(CoreError::NotFound {
                entity: "retail price",
                uuid,
            }));
        }
        record_activity(
            pool,
            user,
            actions::DELETE,
            entity_types::RETAIL_PRICE,
            Some(uuid),
            None,
        )
        .await?;
        tracing::info!(user = %user.username, %uuid, "retail price deleted");
        Ok(true)
    }

    /// Restore a soft-deleted survey row.
    async fn restore_retail_price(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<RetailPriceObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let restored = RetailPriceRepo::restore(pool, uuid)
            .await
            .map_err(gql_db_error)?;
        if !restored {
            return Err(gql_error(CoreError::NotFound {
                entity: "retail price",
                uuid,
            }));
        }
        record_activity(
            pool,
            user,
            actions::RESTORE,
            entity_types::RETAIL_PRICE,
            Some(uuid),
            None,
        )
        .await?;
        let row = RetailPriceRepo::find_by_uuid(pool, uuid)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "retail price",
                    uuid,
                })
            })?;
        decorate_one(pool, row).await
    }

    /// Row-by-row CSV import. Expected columns: `district_code,
    /// commodity_code, market_name, survey_date, price, unit` with the
    /// date in `YYYY-MM-DD` form. Bad rows are skipped and reported.
    async fn import_retail_prices(
        &self,
        ctx: &Context<'_>,
        csv: String,
    ) -> GqlResult<ImportSummary> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let mut summary = ImportSummary::default();

        for (line_no, fields) in parse_csv(&csv) {
            if fields.len() < 6 {
                summary.record_error(line_no, "expected 6 columns");
                continue;
            }
            let district_code = fields[0].trim();
            let district = match DistrictRepo::find_by_code(pool, district_code)
                .await
                .map_err(gql_db_error)?
            {
                Some(d) => d,
                None => {
                    summary
                        .record_error(line_no, format!("unknown district code '{district_code}'"));
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
            let market_name = fields[2].trim().to_string();
            let Ok(survey_date) = fields[3].trim().parse::<NaiveDate>() else {
                summary.record_error(line_no, "invalid survey date (expected YYYY-MM-DD)");
                continue;
            };
            let Ok(price) = fields[4].trim().parse::<f64>() else {
                summary.record_error(line_no, "invalid price");
                continue;
            };
            let unit = fields[5].trim().to_string();

            let input = CreateRetailPriceInput {
                district_uuid: district.uuid,
                commodity_uuid: commodity.uuid,
                market_name,
                survey_date,
                price,
                unit,
            };
            if let Err(e) = validate_create(&input) {
                summary.record_error(line_no, e);
                continue;
            }
            match RetailPriceRepo::create(pool, user.user_uuid, &input.into()).await {
                Ok(_) => summary.imported += 1,
                Err(e) => summary.record_error(line_no, db_error(e)),
            }
        }

        record_activity(
            pool,
            user,
            actions::IMPORT,
            entity_types::RETAIL_PRICE,
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
            "retail price import finished"
        );
        Ok(summary)
    }
}
