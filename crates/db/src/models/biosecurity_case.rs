//! Biosecurity non-compliance case model.

use agrireg_core::types::{DbId, RecordUuid, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `biosecurity_cases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BiosecurityCase {
    pub id: DbId,
    pub uuid: RecordUuid,
    pub case_no: String,
    pub premise_uuid: RecordUuid,
    pub offence_type_uuid: RecordUuid,
    pub inspection_date: NaiveDate,
    pub findings: String,
    pub action_taken: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub created_by: RecordUuid,
    pub updated_by: Option<RecordUuid>,
    pub deleted_by: Option<RecordUuid>,
}

/// DTO for opening a new case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBiosecurityCase {
    pub case_no: String,
    pub premise_uuid: RecordUuid,
    pub offence_type_uuid: RecordUuid,
    pub inspection_date: NaiveDate,
    pub findings: String,
    pub action_taken: String,
}

/// DTO for a partial case update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBiosecurityCase {
    pub findings: Option<String>,
    pub action_taken: Option<String>,
    pub status: Option<String>,
}

/// Filter parameters for list / count / export queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BiosecurityCaseFilter {
    pub premise_uuid: Option<RecordUuid>,
    pub offence_type_uuid: Option<RecordUuid>,
    pub status: Option<String>,
}
