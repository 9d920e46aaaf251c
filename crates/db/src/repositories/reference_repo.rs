//! Repositories for the reference-data tables: regions, districts,
//! commodities, species, premises, and offence types.
//!
//! Each repo also exposes a `name_map` used by the API layer to resolve
//! foreign-key uuids into denormalized display names (the data layer does
//! no automatic joins; the lookups happen in application code).

use std::collections::HashMap;

use agrireg_core::types::RecordUuid;
use sqlx::{FromRow, PgPool};

use crate::models::reference::{
    Commodity, CreateCommodity, CreateDistrict, CreateOffenceType, CreatePremise, CreateRegion,
    CreateSpecies, District, OffenceType, Premise, Region, Species,
};

/// Row shape for uuid-to-name lookups.
#[derive(Debug, FromRow)]
struct UuidName {
    uuid: RecordUuid,
    name: String,
}

/// Batch-fetch a uuid-to-display-name map from a reference table.
///
/// `name_expr` is the column (or expression) projected as the display name.
async fn name_map(
    pool: &PgPool,
    table: &str,
    name_expr: &str,
    uuids: &[RecordUuid],
) -> Result<HashMap<RecordUuid, String>, sqlx::Error> {
    if uuids.is_empty() {
        return Ok(HashMap::new());
    }
    let query = format!("SELECT uuid, {name_expr} AS name FROM {table} WHERE uuid = ANY($1)");
    let rows: Vec<UuidName> = sqlx::query_as(&query).bind(uuids).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|r| (r.uuid, r.name)).collect())
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

const REGION_COLUMNS: &str = "id, uuid, code, name, created_at, updated_at";

pub struct RegionRepo;

impl RegionRepo {
    /// List all regions ordered by code.
    pub async fn list(pool: &PgPool) -> Result<Vec<Region>, sqlx::Error> {
        let query = format!("SELECT {REGION_COLUMNS} FROM regions ORDER BY code");
        sqlx::query_as::<_, Region>(&query).fetch_all(pool).await
    }

    /// Find a region by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<Region>, sqlx::Error> {
        let query = format!("SELECT {REGION_COLUMNS} FROM regions WHERE uuid = $1");
        sqlx::query_as::<_, Region>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Create a region (admin only at the API layer).
    pub async fn create(pool: &PgPool, input: &CreateRegion) -> Result<Region, sqlx::Error> {
        let query = format!(
            "INSERT INTO regions (code, name) VALUES ($1, $2) RETURNING {REGION_COLUMNS}"
        );
        sqlx::query_as::<_, Region>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Districts
// ---------------------------------------------------------------------------

const DISTRICT_COLUMNS: &str = "id, uuid, region_uuid, code, name, created_at, updated_at";

pub struct DistrictRepo;

impl DistrictRepo {
    /// List districts, optionally scoped to a region, ordered by code.
    pub async fn list(
        pool: &PgPool,
        region_uuid: Option<RecordUuid>,
    ) -> Result<Vec<District>, sqlx::Error> {
        let query = format!(
            "SELECT {DISTRICT_COLUMNS} FROM districts
             WHERE ($1::UUID IS NULL OR region_uuid = $1)
             ORDER BY code"
        );
        sqlx::query_as::<_, District>(&query)
            .bind(region_uuid)
            .fetch_all(pool)
            .await
    }

    /// Find a district by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<District>, sqlx::Error> {
        let query = format!("SELECT {DISTRICT_COLUMNS} FROM districts WHERE uuid = $1");
        sqlx::query_as::<_, District>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Find a district by its short code (used by spreadsheet import).
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<District>, sqlx::Error> {
        let query = format!("SELECT {DISTRICT_COLUMNS} FROM districts WHERE code = $1");
        sqlx::query_as::<_, District>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Create a district (admin only at the API layer).
    pub async fn create(pool: &PgPool, input: &CreateDistrict) -> Result<District, sqlx::Error> {
        let query = format!(
            "INSERT INTO districts (region_uuid, code, name) VALUES ($1, $2, $3)
             RETURNING {DISTRICT_COLUMNS}"
        );
        sqlx::query_as::<_, District>(&query)
            .bind(input.region_uuid)
            .bind(&input.code)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Batch uuid-to-name lookup for denormalized district names.
    pub async fn name_map(
        pool: &PgPool,
        uuids: &[RecordUuid],
    ) -> Result<HashMap<RecordUuid, String>, sqlx::Error> {
        name_map(pool, "districts", "name", uuids).await
    }
}

// ---------------------------------------------------------------------------
// Commodities
// ---------------------------------------------------------------------------

const COMMODITY_COLUMNS: &str = "id, uuid, category, code, name, unit, created_at, updated_at";

pub struct CommodityRepo;

impl CommodityRepo {
    /// List commodities, optionally scoped to a category, ordered by code.
    pub async fn list(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Vec<Commodity>, sqlx::Error> {
        let query = format!(
            "SELECT {COMMODITY_COLUMNS} FROM commodities
             WHERE ($1::TEXT IS NULL OR category = $1)
             ORDER BY code"
        );
        sqlx::query_as::<_, Commodity>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Find a commodity by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<Commodity>, sqlx::Error> {
        let query = format!("SELECT {COMMODITY_COLUMNS} FROM commodities WHERE uuid = $1");
        sqlx::query_as::<_, Commodity>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Find a commodity by its short code (used by spreadsheet import).
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Commodity>, sqlx::Error> {
        let query = format!("SELECT {COMMODITY_COLUMNS} FROM commodities WHERE code = $1");
        sqlx::query_as::<_, Commodity>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Create a commodity (admin only at the API layer).
    pub async fn create(pool: &PgPool, input: &CreateCommodity) -> Result<Commodity, sqlx::Error> {
        let query = format!(
            "INSERT INTO commodities (category, code, name, unit) VALUES ($1, $2, $3, $4)
             RETURNING {COMMODITY_COLUMNS}"
        );
        sqlx::query_as::<_, Commodity>(&query)
            .bind(&input.category)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.unit)
            .fetch_one(pool)
            .await
    }

    /// Batch uuid-to-name lookup for denormalized commodity names.
    pub async fn name_map(
        pool: &PgPool,
        uuids: &[RecordUuid],
    ) -> Result<HashMap<RecordUuid, String>, sqlx::Error> {
        name_map(pool, "commodities", "name", uuids).await
    }
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

const SPECIES_COLUMNS: &str = "id, uuid, code, name, created_at, updated_at";

pub struct SpeciesRepo;

impl SpeciesRepo {
    /// List all species ordered by code.
    pub async fn list(pool: &PgPool) -> Result<Vec<Species>, sqlx::Error> {
        let query = format!("SELECT {SPECIES_COLUMNS} FROM species ORDER BY code");
        sqlx::query_as::<_, Species>(&query).fetch_all(pool).await
    }

    /// Find a species by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<Species>, sqlx::Error> {
        let query = format!("SELECT {SPECIES_COLUMNS} FROM species WHERE uuid = $1");
        sqlx::query_as::<_, Species>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Create a species (admin only at the API layer).
    pub async fn create(pool: &PgPool, input: &CreateSpecies) -> Result<Species, sqlx::Error> {
        let query = format!(
            "INSERT INTO species (code, name) VALUES ($1, $2) RETURNING {SPECIES_COLUMNS}"
        );
        sqlx::query_as::<_, Species>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Batch uuid-to-name lookup for denormalized species names.
    pub async fn name_map(
        pool: &PgPool,
        uuids: &[RecordUuid],
    ) -> Result<HashMap<RecordUuid, String>, sqlx::Error> {
        name_map(pool, "species", "name", uuids).await
    }
}

// ---------------------------------------------------------------------------
// Premises
// ---------------------------------------------------------------------------

const PREMISE_COLUMNS: &str =
    "id, uuid, district_uuid, registration_no, name, owner_name, premise_type, \
     created_at, updated_at";

pub struct PremiseRepo;

impl PremiseRepo {
    /// List premises, optionally scoped to a district, ordered by name.
    pub async fn list(
        pool: &PgPool,
        district_uuid: Option<RecordUuid>,
    ) -> Result<Vec<Premise>, sqlx::Error> {
        let query = format!(
            "SELECT {PREMISE_COLUMNS} FROM premises
             WHERE ($1::UUID IS NULL OR district_uuid = $1)
             ORDER BY name"
        );
        sqlx::query_as::<_, Premise>(&query)
            .bind(district_uuid)
            .fetch_all(pool)
            .await
    }

    /// Find a premise by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<Premise>, sqlx::Error> {
        let query = format!("SELECT {PREMISE_COLUMNS} FROM premises WHERE uuid = $1");
        sqlx::query_as::<_, Premise>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Find a premise by its registration number (used by spreadsheet import).
    pub async fn find_by_registration_no(
        pool: &PgPool,
        registration_no: &str,
    ) -> Result<Option<Premise>, sqlx::Error> {
        let query = format!("SELECT {PREMISE_COLUMNS} FROM premises WHERE registration_no = $1");
        sqlx::query_as::<_, Premise>(&query)
            .bind(registration_no)
            .fetch_optional(pool)
            .await
    }

    /// Register a premise (admin only at the API layer).
    pub async fn create(pool: &PgPool, input: &CreatePremise) -> Result<Premise, sqlx::Error> {
        let query = format!(
            "INSERT INTO premises (district_uuid, registration_no, name, owner_name, premise_type)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PREMISE_COLUMNS}"
        );
        sqlx::query_as::<_, Premise>(&query)
            .bind(input.district_uuid)
            .bind(&input.registration_no)
            .bind(&input.name)
            .bind(&input.owner_name)
            .bind(&input.premise_type)
            .fetch_one(pool)
            .await
    }

    /// Batch uuid-to-name lookup for denormalized premise names.
    pub async fn name_map(
        pool: &PgPool,
        uuids: &[RecordUuid],
    ) -> Result<HashMap<RecordUuid, String>, sqlx::Error> {
        name_map(pool, "premises", "name", uuids).await
    }
}

// ---------------------------------------------------------------------------
// Offence types
// ---------------------------------------------------------------------------

const OFFENCE_COLUMNS: &str = "id, uuid, code, description, created_at, updated_at";

pub struct OffenceTypeRepo;

impl OffenceTypeRepo {
    /// List all offence types ordered by code.
    pub async fn list(pool: &PgPool) -> Result<Vec<OffenceType>, sqlx::Error> {
        let query = format!("SELECT {OFFENCE_COLUMNS} FROM offence_types ORDER BY code");
        sqlx::query_as::<_, OffenceType>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find an offence type by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<OffenceType>, sqlx::Error> {
        let query = format!("SELECT {OFFENCE_COLUMNS} FROM offence_types WHERE uuid = $1");
        sqlx::query_as::<_, OffenceType>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Create an offence type (admin only at the API layer).
    pub async fn create(
        pool: &PgPool,
        input: &CreateOffenceType,
    ) -> Result<OffenceType, sqlx::Error> {
        let query = format!(
            "INSERT INTO offence_types (code, description) VALUES ($1, $2)
             RETURNING {OFFENCE_COLUMNS}"
        );
        sqlx::query_as::<_, OffenceType>(&query)
            .bind(&input.code)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Batch uuid-to-description lookup for denormalized offence labels.
    pub async fn name_map(
        pool: &PgPool,
        uuids: &[RecordUuid],
    ) -> Result<HashMap<RecordUuid, String>, sqlx::Error> {
        name_map(pool, "offence_types", "description", uuids).await
    }
}
