//! Reference-data models: regions, districts, commodities, species,
//! premises, and offence types.
//!
//! Reference rows are FK targets for the domain entities and are therefore
//! never soft-deleted; admin users may add new rows but not remove them.

use agrireg_core::types::{DbId, RecordUuid, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `regions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Region {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub code: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `districts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct District {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub region_uuid: RecordUuid,
    pub code: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `commodities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Commodity {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub category: String,
    pub code: String,
    pub name: String,
    pub unit: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `species` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Species {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub code: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `premises` table (farms, markets, processing plants).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Premise {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub district_uuid: RecordUuid,
    pub registration_no: String,
    pub name: String,
    pub owner_name: String,
    pub premise_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `offence_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OffenceType {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub code: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTOs (admin writes)
// ---------------------------------------------------------------------------

/// DTO for creating a region.
#[derive(Debug, Deserialize)]
pub struct CreateRegion {
    pub code: String,
    pub name: String,
}

/// DTO for creating a district within a region.
#[derive(Debug, Deserialize)]
pub struct CreateDistrict {
    pub region_uuid: RecordUuid,
    pub code: String,
    pub name: String,
}

/// DTO for creating a commodity.
#[derive(Debug, Deserialize)]
pub struct CreateCommodity {
    pub category: String,
    pub code: String,
    pub name: String,
    pub unit: String,
}

/// DTO for creating a species.
#[derive(Debug, Deserialize)]
pub struct CreateSpecies {
    pub code: String,
    pub name: String,
}

/// DTO for registering a premise.
#[derive(Debug, Deserialize)]
pub struct CreatePremise {
    pub district_uuid: RecordUuid,
    pub registration_no: String,
    pub name: String,
    pub owner_name: String,
    pub premise_type: String,
}

/// DTO for creating an offence type.
#[derive(Debug, Deserialize)]
pub struct CreateOffenceType {
    pub code: String,
    pub description: String,
}
