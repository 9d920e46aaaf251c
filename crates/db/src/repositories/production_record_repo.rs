//! Repository for the `production_records` table.

use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use agrireg_core::types::RecordUuid;
use sqlx::PgPool;

use super::NOT_DELETED;
use crate::models::production_record::{
    CreateProductionRecord, ProductionRecord, ProductionRecordFilter, UpdateProductionRecord,
};

/// Column list for production_records queries.
const COLUMNS: &str = "id, uuid, premise_uuid, commodity_uuid, year, month, quantity, \
    unit_value, remarks, created_at, updated_at, deleted_at, created_by, updated_by, deleted_by";

/// Filter fragment shared by list / count / export. Binds $1-$4.
const FILTER: &str = "($1::UUID IS NULL OR premise_uuid = $1) \
    AND ($2::UUID IS NULL OR commodity_uuid = $2) \
    AND ($3::INTEGER IS NULL OR year = $3) \
    AND ($4::INTEGER IS NULL OR month = $4)";

/// Provides CRUD for production records.
pub struct ProductionRecordRepo;

impl ProductionRecordRepo {
    /// Insert a new record, stamping the creating actor.
    pub async fn create(
        pool: &PgPool,
        actor: RecordUuid,
        input: &CreateProductionRecord,
    ) -> Result<ProductionRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO production_records
                (premise_uuid, commodity_uuid, year, month, quantity, unit_value, remarks, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductionRecord>(&query)
            .bind(input.premise_uuid)
            .bind(input.commodity_uuid)
            .bind(input.year)
            .bind(input.month)
            .bind(input.quantity)
            .bind(input.unit_value)
            .bind(&input.remarks)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// Find a live (not soft-deleted) record by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<ProductionRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM production_records WHERE uuid = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, ProductionRecord>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// List live records matching the filter, newest reporting period first.
    pub async fn list(
        pool: &PgPool,
        filter: &ProductionRecordFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ProductionRecord>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM production_records
             WHERE {NOT_DELETED} AND {FILTER}
             ORDER BY year DESC, month DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, ProductionRecord>(&query)
            .bind(filter.premise_uuid)
            .bind(filter.commodity_uuid)
            .bind(filter.year)
            .bind(filter.month)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count live records matching the filter (for pagination metadata).
    pub async fn count(
        pool: &PgPool,
        filter: &ProductionRecordFilter,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM production_records WHERE {NOT_DELETED} AND {FILTER}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.premise_uuid)
            .bind(filter.commodity_uuid)
            .bind(filter.year)
            .bind(filter.month)
            .fetch_one(pool)
            .await
    }

    /// Fetch all live records matching the filter for spreadsheet export,
    /// oldest reporting period first.
    pub async fn export(
        pool: &PgPool,
        filter: &ProductionRecordFilter,
    ) -> Result<Vec<ProductionRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM production_records
             WHERE {NOT_DELETED} AND {FILTER}
             ORDER BY year ASC, month ASC, id ASC"
        );
        sqlx::query_as::<_, ProductionRecord>(&query)
            .bind(filter.premise_uuid)
            .bind(filter.commodity_uuid)
            .bind(filter.year)
            .bind(filter.month)
            .fetch_all(pool)
            .await
    }

    /// Partially update a live record, stamping the updating actor.
    ///
    /// All-None input still bumps `updated_at` / `updated_by`.
    pub async fn update(
        pool: &PgPool,
        uuid: RecordUuid,
        actor: RecordUuid,
        input: &UpdateProductionRecord,
    ) -> Result<Option<ProductionRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE production_records SET
                quantity = COALESCE($3, quantity),
                unit_value = COALESCE($4, unit_value),
                remarks = COALESCE($5, remarks),
                updated_by = $2,
                updated_at = now()
             WHERE uuid = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductionRecord>(&query)
            .bind(uuid)
            .bind(actor)
            .bind(input.quantity)
            .bind(input.unit_value)
            .bind(&input.remarks)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a live record, stamping the deleting actor.
    ///
    /// Returns `false` if the record does not exist or is already deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        uuid: RecordUuid,
        actor: RecordUuid,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE production_records SET deleted_at = now(), deleted_by = $2
             WHERE uuid = $1 AND {NOT_DELETED}"
        );
        let result = sqlx::query(&query).bind(uuid).bind(actor).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted record. Returns `false` if no deleted record
    /// with that uuid exists.
    pub async fn restore(pool: &PgPool, uuid: RecordUuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE production_records SET deleted_at = NULL, deleted_by = NULL
             WHERE uuid = $1 AND deleted_at IS NOT NULL",
        )
        .bind(uuid)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
