//! Production record model: monthly produced quantity per premise and
//! commodity.

use agrireg_core::types::{DbId, RecordUuid, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `production_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductionRecord {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub premise_uuid: RecordUuid,
    pub commodity_uuid: RecordUuid,
    pub year: i32,
    pub month: i32,
    pub quantity: f64,
    pub unit_value: Option<f64>,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub created_by: RecordUuid,
    pub updated_by: Option<RecordUuid>,
    pub deleted_by: Option<RecordUuid>,
}

/// DTO for creating a production record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductionRecord {
    pub premise_uuid: RecordUuid,
    pub commodity_uuid: RecordUuid,
    pub year: i32,
    pub month: i32,
    pub quantity: f64,
    pub unit_value: Option<f64>,
    pub remarks: Option<String>,
}

/// DTO for a partial update. `None` fields keep their current value
/// (COALESCE semantics).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductionRecord {
    pub quantity: Option<f64>,
    pub unit_value: Option<f64>,
    pub remarks: Option<String>,
}

/// Filter parameters for list / count / export queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductionRecordFilter {
    pub premise_uuid: Option<RecordUuid>,
    pub commodity_uuid: Option<RecordUuid>,
    pub year: Option<i32>,
    pub month: Option<i32>,
}
