//! Registered-product catalogue model.

use agrireg_core::types::{DbId, RecordUuid, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub registration_no: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub manufacturer: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub created_by: RecordUuid,
    pub updated_by: Option<RecordUuid>,
    pub deleted_by: Option<RecordUuid>,
}

/// DTO for registering a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduct {
    pub registration_no: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub manufacturer: String,
}

/// DTO for a partial product update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub status: Option<String>,
}

/// Filter parameters for list / count / export queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}
