//! Repository for the `biosecurity_cases` table.

use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use agrireg_core::types::RecordUuid;
use sqlx::PgPool;

use super::NOT_DELETED;
use crate::models::biosecurity_case::{
    BiosecurityCase, BiosecurityCaseFilter, CreateBiosecurityCase, UpdateBiosecurityCase,
};

/// Column list for biosecurity_cases queries.
const COLUMNS: &str = "id, uuid, case_no, premise_uuid, offence_type_uuid, inspection_date, \
    findings, action_taken, status, created_at, updated_at, deleted_at, created_by, \
    updated_by, deleted_by";

/// Filter fragment shared by list / count / export. Binds $1-$3.
const FILTER: &str = "($1::UUID IS NULL OR premise_uuid = $1) \
    AND ($2::UUID IS NULL OR offence_type_uuid = $2) \
    AND ($3::TEXT IS NULL OR status = $3)";

/// Provides CRUD for biosecurity non-compliance cases.
pub struct BiosecurityCaseRepo;

impl BiosecurityCaseRepo {
    /// Open a new case, stamping the creating actor.
    pub async fn create(
        pool: &PgPool,
        actor: RecordUuid,
        input: &CreateBiosecurityCase,
    ) -> Result<BiosecurityCase, sqlx::Error> {
        let query = format!(
            "INSERT INTO biosecurity_cases
                (case_no, premise_uuid, offence_type_uuid, inspection_date, findings, action_taken, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BiosecurityCase>(&query)
            .bind(&input.case_no)
            .bind(input.premise_uuid)
            .bind(input.offence_type_uuid)
            .bind(input.inspection_date)
            .bind(&input.findings)
            .bind(&input.action_taken)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// Find a live case by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<BiosecurityCase>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM biosecurity_cases WHERE uuid = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, BiosecurityCase>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// List live cases matching the filter, most recent inspection first.
    pub async fn list(
        pool: &PgPool,
        filter: &BiosecurityCaseFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<BiosecurityCase>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM biosecurity_cases
             WHERE {NOT_DELETED} AND {FILTER}
             ORDER BY inspection_date DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, BiosecurityCase>(&query)
            .bind(filter.premise_uuid)
            .bind(filter.offence_type_uuid)
            .bind(&filter.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count live cases matching the filter.
    pub async fn count(
        pool: &PgPool,
        filter: &BiosecurityCaseFilter,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM biosecurity_cases WHERE {NOT_DELETED} AND {FILTER}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.premise_uuid)
            .bind(filter.offence_type_uuid)
            .bind(&filter.status)
            .fetch_one(pool)
            .await
    }

    /// Fetch all live cases matching the filter for spreadsheet export,
    /// oldest inspection first.
    pub async fn export(
        pool: &PgPool,
        filter: &BiosecurityCaseFilter,
    ) -> Result<Vec<BiosecurityCase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM biosecurity_cases
             WHERE {NOT_DELETED} AND {FILTER}
             ORDER BY inspection_date ASC, id ASC"
        );
        sqlx::query_as::<_, BiosecurityCase>(&query)
            .bind(filter.premise_uuid)
            .bind(filter.offence_type_uuid)
            .bind(&filter.status)
            .fetch_all(pool)
            .await
    }

    /// Partially update a live case, stamping the updating actor.
    pub async fn update(
        pool: &PgPool,
        uuid: RecordUuid,
        actor: RecordUuid,
        input: &UpdateBiosecurityCase,
    ) -> Result<Option<BiosecurityCase>, sqlx::Error> {
        let query = format!(
            "UPDATE biosecurity_cases SET
                findings = COALESCE($3, findings),
                action_taken = COALESCE($4, action_taken),
                status = COALESCE($5, status),
                updated_by = $2,
                updated_at = now()
             WHERE uuid = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BiosecurityCase>(&query)
            .bind(uuid)
            .bind(actor)
            .bind(&input.findings)
            .bind(&input.action_taken)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a live case, stamping the deleting actor.
    pub async fn soft_delete(
        pool: &PgPool,
        uuid: RecordUuid,
        actor: RecordUuid,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE biosecurity_cases SET deleted_at = now(), deleted_by = $2
             WHERE uuid = $1 AND {NOT_DELETED}"
        );
        let result = sqlx::query(&query).bind(uuid).bind(actor).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted case.
    pub async fn restore(pool: &PgPool, uuid: RecordUuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE biosecurity_cases SET deleted_at = NULL, deleted_by = NULL
             WHERE uuid = $1 AND deleted_at IS NOT NULL",
        )
        .bind(uuid)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
