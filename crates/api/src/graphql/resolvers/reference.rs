//! Reference-data resolvers: lookup lists used by every domain form, plus
//! admin-only creation. Reference rows are never deleted (they are FK
//! targets for the domain entities).

use async_graphql::{Context, InputObject, Object, SimpleObject};
use serde::Serialize;

use agrireg_core::audit::actions;
use agrireg_core::error::CoreError;
use agrireg_core::types::{RecordUuid, Timestamp};
use agrireg_db::models::reference::{
    Commodity, CreateCommodity, CreateDistrict, CreateOffenceType, CreatePremise, CreateRegion,
    CreateSpecies, District, OffenceType, Premise, Region, Species,
};
use agrireg_db::repositories::{
    CommodityRepo, DistrictRepo, OffenceTypeRepo, PremiseRepo, RegionRepo, SpeciesRepo,
};
use agrireg_db::DbPool;

use crate::error::{gql_db_error, gql_error, GqlResult};
use crate::graphql::audit::{audit_payload, record_activity};
use crate::graphql::guard::{require_admin, require_auth};

#[derive(Debug, SimpleObject)]
#[graphql(name = "Region")]
pub struct RegionObject {
    pub id: String,
    pub uuid: RecordUuid,
    pub code: String,
    pub name: String,
    pub created_at: Timestamp,
}

impl From<Region> for RegionObject {
    fn from(r: Region) -> Self {
        Self {
            id: r.id.to_string(),
            uuid: r.uuid,
            code: r.code,
            name: r.name,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(name = "District")]
pub struct DistrictObject {
    pub id: String,
    pub uuid: RecordUuid,
    pub region_uuid: RecordUuid,
    pub code: String,
    pub name: String,
    pub created_at: Timestamp,
}

impl From<District> for DistrictObject {
    fn from(d: District) -> Self {
        Self {
            id: d.id.to_string(),
            uuid: d.uuid,
            region_uuid: d.region_uuid,
            code: d.code,
            name: d.name,
            created_at: d.created_at,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(name = "Commodity")]
pub struct CommodityObject {
    pub id: String,
    pub uuid: RecordUuid,
    /// One of `livestock`, `crop`, `fishery`.
    pub category: String,
    pub code: String,
    pub name: String,
    pub unit: String,
    pub created_at: Timestamp,
}

impl From<Commodity> for CommodityObject {
    fn from(c: Commodity) -> Self {
        Self {
            id: c.id.to_string(),
            uuid: c.uuid,
            category: c.category,
            code: c.code,
            name: c.name,
            unit: c.unit,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(name = "Species")]
pub struct SpeciesObject {
    pub id: String,
    pub uuid: RecordUuid,
    pub code: String,
    pub name: String,
    pub created_at: Timestamp,
}

impl From<Species> for SpeciesObject {
    fn from(s: Species) -> Self {
        Self {
            id: s.id.to_string(),
            uuid: s.uuid,
            code: s.code,
            name: s.name,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(name = "Premise")]
pub struct PremiseObject {
    pub id: String,
    pub uuid: RecordUuid,
    pub district_uuid: RecordUuid,
    pub registration_no: String,
    pub name: String,
    pub owner_name: String,
    pub premise_type: String,
    pub created_at: Timestamp,
}

impl From<Premise> for PremiseObject {
    fn from(p: Premise) -> Self {
        Self {
            id: p.id.to_string(),
            uuid: p.uuid,
            district_uuid: p.district_uuid,
            registration_no: p.registration_no,
            name: p.name,
            owner_name: p.owner_name,
            premise_type: p.premise_type,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(name = "OffenceType")]
pub struct OffenceTypeObject {
    pub id: String,
    pub uuid: RecordUuid,
    pub code: String,
    pub description: String,
    pub created_at: Timestamp,
}

impl From<OffenceType> for OffenceTypeObject {
    fn from(o: OffenceType) -> Self {
        Self {
            id: o.id.to_string(),
            uuid: o.uuid,
            code: o.code,
            description: o.description,
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Clone, InputObject, Serialize)]
pub struct CreateRegionInput {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, InputObject, Serialize)]
pub struct CreateDistrictInput {
    pub region_uuid: RecordUuid,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, InputObject, Serialize)]
pub struct CreateCommodityInput {
    pub category: String,
    pub code: String,
    pub name: String,
    pub unit: String,
}

#[derive(Debug, Clone, InputObject, Serialize)]
pub struct CreateSpeciesInput {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, InputObject, Serialize)]
pub struct CreatePremiseInput {
    pub district_uuid: RecordUuid,
    pub registration_no: String,
    pub name: String,
    pub owner_name: String,
    pub premise_type: String,
}

#[derive(Debug, Clone, InputObject, Serialize)]
pub struct CreateOffenceTypeInput {
    pub code: String,
    pub description: String,
}

#[derive(Default)]
pub struct ReferenceQuery;

#[Object]
impl ReferenceQuery {
    async fn regions(&self, ctx: &Context<'_>) -> GqlResult<Vec<RegionObject>> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let rows = RegionRepo::list(pool).await.map_err(gql_db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn districts(
        &self,
        ctx: &Context<'_>,
        region_uuid: Option<RecordUuid>,
    ) -> GqlResult<Vec<DistrictObject>> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let rows = DistrictRepo::list(pool, region_uuid)
            .await
            .map_err(gql_db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn commodities(
        &self,
        ctx: &Context<'_>,
        category: Option<String>,
    ) -> GqlResult<Vec<CommodityObject>> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let rows = CommodityRepo::list(pool, category.as_deref())
            .await
            .map_err(gql_db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn species(&self, ctx: &Context<'_>) -> GqlResult<Vec<SpeciesObject>> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let rows = SpeciesRepo::list(pool).await.map_err(gql_db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn premises(
        &self,
        ctx: &Context<'_>,
        district_uuid: Option<RecordUuid>,
    ) -> GqlResult<Vec<PremiseObject>> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let rows = PremiseRepo::list(pool, district_uuid)
            .await
            .map_err(gql_db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn offence_types(&self, ctx: &Context<'_>) -> GqlResult<Vec<OffenceTypeObject>> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let rows = OffenceTypeRepo::list(pool).await.map_err(gql_db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(Default)]
pub struct ReferenceMutation;

#[Object]
impl ReferenceMutation {
    async fn create_region(
        &self,
        ctx: &Context<'_>,
        input: CreateRegionInput,
    ) -> GqlResult<RegionObject> {
        let user = require_admin(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let payload = audit_payload(&input);
        let row = RegionRepo::create(
            pool,
            &CreateRegion {
                code: input.code,
                name: input.name,
            },
        )
        .await
        .map_err(gql_db_error)?;
        record_activity(pool, user, actions::CREATE, "region", Some(row.uuid), payload).await?;
        Ok(row.into())
    }

    async fn create_district(
        &self,
        ctx: &Context<'_>,
        input: CreateDistrictInput,
    ) -> GqlResult<DistrictObject> {
        let user = require_admin(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        if RegionRepo::find_by_uuid(pool, input.region_uuid)
            .await
            .map_err(gql_db_error)?
            .is_none()
        {
            return Err(gql_error(CoreError::NotFound {
                entity: "region",
                uuid: input.region_uuid,
            }));
        }
        let payload = audit_payload(&input);
        let row = DistrictRepo::create(
            pool,
            &CreateDistrict {
                region_uuid: input.region_uuid,
                code: input.code,
                name: input.name,
            },
        )
        .await
        .map_err(gql_db_error)?;
        record_activity(pool, user, actions::CREATE, "district", Some(row.uuid), payload).await?;
        Ok(row.into())
    }

    async fn create_commodity(
        &self,
        ctx: &Context<'_>,
        input: CreateCommodityInput,
    ) -> GqlResult<CommodityObject> {
        let user = require_admin(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let payload = audit_payload(&input);
        let row = CommodityRepo::create(
            pool,
            &CreateCommodity {
                category: input.category,
                code: input.code,
                name: input.name,
                unit: input.unit,
            },
        )
        .await
        .map_err(gql_db_error)?;
        record_activity(pool, user, actions::CREATE, "commodity", Some(row.uuid), payload).await?;
        Ok(row.into())
    }

    async fn create_species(
        &self,
        ctx: &Context<'_>,
        input: CreateSpeciesInput,
    ) -> GqlResult<SpeciesObject> {
        let user = require_admin(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let payload = audit_payload(&input);
        let row = SpeciesRepo::create(
            pool,
            &CreateSpecies {
                code: input.code,
                name: input.name,
            },
        )
        .await
        .map_err(gql_db_error)?;
        record_activity(pool, user, actions::CREATE, "species", Some(row.uuid), payload).await?;
        Ok(row.into())
    }

    async fn create_premise(
        &self,
        ctx: &Context<'_>,
        input: CreatePremiseInput,
    ) -> GqlResult<PremiseObject> {
        let user = require_admin(ctx)?;
        let pool = ctx.data::<DbPool>()?;
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
        let payload = audit_payload(&input);
        let row = PremiseRepo::create(
            pool,
            &CreatePremise {
                district_uuid: input.district_uuid,
                registration_no: input.registration_no,
                name: input.name,
                owner_name: input.owner_name,
                premise_type: input.premise_type,
            },
        )
        .await
        .map_err(gql_db_error)?;
        record_activity(pool, user, actions::CREATE, "premise", Some(row.uuid), payload).await?;
        Ok(row.into())
    }

    async fn create_offence_type(
        &self,
        ctx: &Context<'_>,
        input: CreateOffenceTypeInput,
    ) -> GqlResult<OffenceTypeObject> {
        let user = require_admin(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let payload = audit_payload(&input);
        let row = OffenceTypeRepo::create(
            pool,
            &CreateOffenceType {
                code: input.code,
                description: input.description,
            },
        )
        .await
        .map_err(gql_db_error)?;
        record_activity(pool, user, actions::CREATE, "offence_type", Some(row.uuid), payload)
            .await?;
        Ok(row.into())
    }
}
