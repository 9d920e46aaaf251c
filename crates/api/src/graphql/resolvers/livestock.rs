//! Livestock stock count resolvers: yearly headcount per premise and
//! species.

use async_graphql::{Context, InputObject, Object, SimpleObject};
use serde::Serialize;

use agrireg_core::audit::{actions, entity_types};
use agrireg_core::error::CoreError;
use agrireg_core::livestock;
use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use agrireg_core::production::validate_year;
use agrireg_core::types::{RecordUuid, Timestamp};
use agrireg_db::models::livestock_stock::{
    CreateLivestockStock, LivestockStock, LivestockStockFilter, UpdateLivestockStock,
};
use agrireg_db::repositories::{LivestockStockRepo, PremiseRepo, SpeciesRepo, UserRepo};
use agrireg_db::DbPool;

use crate::error::{gql_db_error, gql_error, GqlResult};
use crate::graphql::audit::{audit_payload, record_activity};
use crate::graphql::guard::{require_auth, require_officer};
use crate::graphql::resolvers::{actor_stub, ref_name, UserStubObject};
use crate::graphql::spreadsheet::{build_csv, ExportFile};

/// A stock count with denormalized reference names.
#[derive(Debug, SimpleObject)]
#[graphql(name = "LivestockStock")]
pub struct LivestockStockObject {
    /// Database id as a string (the raw value exceeds the JS safe-integer
    /// range).
    pub id: String,
    pub uuid: RecordUuid,
    pub premise_uuid: RecordUuid,
    pub premise_name: String,
    pub species_uuid: RecordUuid,
    pub species_name: String,
    pub year: i32,
    pub headcount_male: i64,
    pub headcount_female: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<UserStubObject>,
    pub updated_by: Option<UserStubObject>,
}

#[derive(Debug, SimpleObject)]
pub struct LivestockStockPage {
    pub items: Vec<LivestockStockObject>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, InputObject, Serialize)]
pub struct CreateLivestockStockInput {
    pub premise_uuid: RecordUuid,
    pub species_uuid: RecordUuid,
    pub year: i32,
    pub headcount_male: i64,
    pub headcount_female: i64,
}

impl From<CreateLivestockStockInput> for CreateLivestockStock {
    fn from(input: CreateLivestockStockInput) -> Self {
        Self {
            premise_uuid: input.premise_uuid,
            species_uuid: input.species_uuid,
            year: input.year,
            headcount_male: input.headcount_male,
            headcount_female: input.headcount_female,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject, Serialize)]
pub struct UpdateLivestockStockInput {
    pub headcount_male: Option<i64>,
    pub headcount_female: Option<i64>,
}

impl From<UpdateLivestockStockInput> for UpdateLivestockStock {
    fn from(input: UpdateLivestockStockInput) -> Self {
        Self {
            headcount_male: input.headcount_male,
            headcount_female: input.headcount_female,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct LivestockStockFilterInput {
    pub premise_uuid: Option<RecordUuid>,
    pub species_uuid: Option<RecordUuid>,
    pub year: Option<i32>,
}

impl From<LivestockStockFilterInput> for LivestockStockFilter {
    fn from(input: LivestockStockFilterInput) -> Self {
        Self {
            premise_uuid: input.premise_uuid,
            species_uuid: input.species_uuid,
            year: input.year,
        }
    }
}

fn validate_create(input: &CreateLivestockStockInput) -> Result<(), CoreError> {
    validate_year(input.year).map_err(CoreError::Validation)?;
    livestock::validate_headcount("male headcount", input.headcount_male)
        .map_err(CoreError::Validation)?;
    livestock::validate_headcount("female headcount", input.headcount_female)
        .map_err(CoreError::Validation)?;
    Ok(())
}

fn validate_update(input: &UpdateLivestockStockInput) -> Result<(), CoreError> {
    if let Some(count) = input.headcount_male {
        livestock::validate_headcount("male headcount", count).map_err(CoreError::Validation)?;
    }
    if let Some(count) = input.headcount_female {
        livestock::validate_headcount("female headcount", count).map_err(CoreError::Validation)?;
    }
    Ok(())
}

async fn decorate(
    pool: &DbPool,
    rows: Vec<LivestockStock>,
) -> GqlResult<Vec<LivestockStockObject>> {
    let premise_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.premise_uuid).collect();
    let species_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.species_uuid).collect();
    let mut actor_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.created_by).collect();
    actor_uuids.extend(rows.iter().filter_map(|r| r.updated_by));

    let premises = PremiseRepo::name_map(pool, &premise_uuids)
        .await
        .map_err(gql_db_error)?;
    let species = SpeciesRepo::name_map(pool, &species_uuids)
        .await
        .map_err(gql_db_error)?;
    let actors = UserRepo::stubs_by_uuids(pool, &actor_uuids)
        .await
        .map_err(gql_db_error)?;

    Ok(rows
        .into_iter()
        .map(|r| LivestockStockObject {
            id: r.id.to_string(),
            uuid: r.uuid,
            premise_uuid: r.premise_uuid,
            premise_name: ref_name(&premises, r.premise_uuid),
            species_uuid: r.species_uuid,
            species_name: ref_name(&species, r.species_uuid),
            year: r.year,
            headcount_male: r.headcount_male,
            headcount_female: r.headcount_female,
            created_at: r.created_at,
            updated_at: r.updated_at,
            created_by: actor_stub(&actors, Some(r.created_by)),
            updated_by: actor_stub(&actors, r.updated_by),
        })
        .collect())
}

async fn decorate_one(pool: &DbPool, row: LivestockStock) -> GqlResult<LivestockStockObject> {
    let mut items = decorate(pool, vec![row]).await?;
    items
        .pop()
        .ok_or_else(|| gql_error(CoreError::Internal("decoration yielded no row".into())))
}

#[derive(Default)]
pub struct LivestockQuery;

#[Object]
impl LivestockQuery {
    /// List stock counts, newest census year first.
    async fn livestock_stocks(
        &self,
        ctx: &Context<'_>,
        filter: Option<LivestockStockFilterInput>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> GqlResult<LivestockStockPage> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let filter: LivestockStockFilter = filter.unwrap_or_default().into();
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);

        let rows = LivestockStockRepo::list(pool, &filter, Some(limit), Some(offset))
            .await
            .map_err(gql_db_error)?;
        let total_count = LivestockStockRepo::count(pool, &filter)
            .await
            .map_err(gql_db_error)?;
        let items = decorate(pool, rows).await?;
        Ok(LivestockStockPage {
            items,
            total_count,
            limit,
            offset,
        })
    }

    /// Fetch a single stock count by uuid.
    async fn livestock_stock(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<LivestockStockObject> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let row = LivestockStockRepo::find_by_uuid(pool, uuid)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "livestock stock",
                    uuid,
                })
            })?;
        decorate_one(pool, row).await
    }

    /// Export the filtered stock counts as a CSV spreadsheet.
    async fn export_livestock_stocks(
        &self,
        ctx: &Context<'_>,
        filter: Option<LivestockStockFilterInput>,
    ) -> GqlResult<ExportFile> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let filter: LivestockStockFilter = filter.unwrap_or_default().into();
        let rows = LivestockStockRepo::export(pool, &filter)
            .await
            .map_err(gql_db_error)?;
        let items = decorate(pool, rows).await?;

        let data: Vec<Vec<String>> = items
            .iter()
            .map(|r| {
                vec![
                    r.premise_name.clone(),
                    r.species_name.clone(),
                    r.year.to_string(),
                    r.headcount_male.to_string(),
                    r.headcount_female.to_string(),
                ]
            })
            .collect();
        let csv = build_csv(
            &[
                "premise",
                "species",
                "year",
                "headcount_male",
                "headcount_female",
            ],
            &data,
        );
        Ok(ExportFile::csv("livestock_stocks", csv))
    }
}

#[derive(Default)]
pub struct LivestockMutation;

#[Object]
impl LivestockMutation {
    /// Record a yearly census count. One count per premise, species, and
    /// year.
    async fn create_livestock_stock(
        &self,
        ctx: &Context<'_>,
        input: CreateLivestockStockInput,
    ) -> GqlResult<LivestockStockObject> {
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
        if SpeciesRepo::find_by_uuid(pool, input.species_uuid)
            .await
            .map_err(gql_db_error)?
            .is_none()
        {
            return Err(gql_error(CoreError::NotFound {
                entity: "species",
                uuid: input.species_uuid,
            }));
        }

        let payload = audit_payload(&input);
        let row = LivestockStockRepo::create(pool, user.user_uuid, &input.into())
            .await
            .map_err(gql_db_error)?;
        record_activity(
            pool,
            user,
            actions::CREATE,
            entity_types::LIVESTOCK_STOCK,
            Some(row.uuid),
            payload,
        )
        .await?;
        tracing::info!(user = %user.username, uuid = %row.uuid, "livestock stock created");
        decorate_one(pool, row).await
    }

    /// Partial update of the headcounts.
    async fn update_livestock_stock(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
        input: UpdateLivestockStockInput,
    ) -> GqlResult<LivestockStockObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        validate_update(&input).map_err(gql_error)?;
        let payload = audit_payload(&input);
        let row = LivestockStockRepo::update(pool, uuid, user.user_uuid, &input.into())
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "livestock stock",
                    uuid,
                })
            })?;
        record_activity(
            pool,
            user,
            actions::UPDATE,
            entity_types::LIVESTOCK_STOCK,
            Some(uuid),
            payload,
        )
        .await?;
        tracing::info!(user = %user.username, %uuid, "livestock stock updated");
        decorate_one(pool, row).await
    }

    /// Soft-delete a stock count.
    async fn delete_livestock_stock(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<bool> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let deleted = LivestockStockRepo::soft_delete(pool, uuid, user.user_uuid)
            .await
            .map_err(gql_db_error)?;
        if !deleted {
            return Err(gql_error(CoreError::NotFound {
                entity: "livestock stock",
                uuid,
            }));
        }
        record_activity(
            pool,
            user,
            actions::DELETE,
            entity_types::LIVESTOCK_STOCK,
            Some(uuid),
            None,
        )
        .await?;
        tracing::info!(user = %user.username, %uuid, "livestock stock deleted");
        Ok(true)
    }

    /// Restore a soft-deleted stock count.
    async fn restore_livestock_stock(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<LivestockStockObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let restored = LivestockStockRepo::restore(pool, uuid)
            .await
            .map_err(gql_db_error)?;
        if !restored {
            return Err(gql_error(CoreError::NotFound {
                entity: "livestock stock",
                uuid,
            }));
        }
        record_activity(
            pool,
            user,
            actions::RESTORE,
            entity_types::LIVESTOCK_STOCK,
            Some(uuid),
            None,
        )
        .await?;
        let row = LivestockStockRepo::find_by_uuid(pool, uuid)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "livestock stock",
                    uuid,
                })
            })?;
        decorate_one(pool, row).await
    }
}
