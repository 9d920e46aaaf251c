//! Retail price survey record model.

use agrireg_core::types::{DbId, RecordUuid, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `retail_prices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RetailPrice {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub district_uuid: RecordUuid,
    pub commodity_uuid: RecordUuid,
    pub market_name: String,
    pub survey_date: NaiveDate,
    pub price: f64,
    pub unit: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub created_by: RecordUuid,
    pub updated_by: Option<RecordUuid>,
    pub deleted_by: Option<RecordUuid>,
}

/// DTO for recording a surveyed price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRetailPrice {
    pub district_uuid: RecordUuid,
    pub commodity_uuid: RecordUuid,
    pub market_name: String,
    pub survey_date: NaiveDate,
    pub price: f64,
    pub unit: String,
}

/// DTO for a partial price-record update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRetailPrice {
    pub market_name: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
}

/// Filter parameters for list / count / export queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetailPriceFilter {
    pub district_uuid: Option<RecordUuid>,
    pub commodity_uuid: Option<RecordUuid>,
    pub survey_date_from: Option<NaiveDate>,
    pub survey_date_to: Option<NaiveDate>,
}
