//! Livestock stock count model: yearly headcount per premise and species.

use agrireg_core::types::{DbId, RecordUuid, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `livestock_stocks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LivestockStock {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub premise_uuid: RecordUuid,
    pub species_uuid: RecordUuid,
    pub year: i32,
    pub headcount_male: i64,
    pub headcount_female: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub created_by: RecordUuid,
    pub updated_by: Option<RecordUuid>,
    pub deleted_by: Option<RecordUuid>,
}

/// DTO for creating a stock count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLivestockStock {
    pub premise_uuid: RecordUuid,
    pub species_uuid: RecordUuid,
    pub year: i32,
    pub headcount_male: i64,
    pub headcount_female: i64,
}

/// DTO for a partial stock-count update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLivestockStock {
    pub headcount_male: Option<i64>,
    pub headcount_female: Option<i64>,
}

/// Filter parameters for list / count / export queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LivestockStockFilter {
    pub premise_uuid: Option<RecordUuid>,
    pub species_uuid: Option<RecordUuid>,
    pub year: Option<i32>,
}
