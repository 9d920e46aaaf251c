//! Repository for the `livestock_stocks` table.

use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use agrireg_core::types::RecordUuid;
use sqlx::PgPool;

use super::NOT_DELETED;
use crate::models::livestock_stock::{
    CreateLivestockStock, LivestockStock, LivestockStockFilter, UpdateLivestockStock,
};

/// Column list for livestock_stocks queries.
const COLUMNS: &str = "id, uuid, premise_uuid, species_uuid, year, headcount_male, \
    headcount_female, created_at, updated_at, deleted_at, created_by, updated_by, deleted_by";

/// Filter fragment shared by list / count / export. Binds $1-$3.
const FILTER: &str = "($1::UUID IS NULL OR premise_uuid = $1) \
    AND ($2::UUID IS NULL OR species_uuid = $2) \
    AND ($3::INTEGER IS NULL OR year = $3)";

/// Provides CRUD for livestock stock counts.
pub struct LivestockStockRepo;

impl LivestockStockRepo {
    /// Insert a new stock count, stamping the creating actor.
    pub async fn create(
        pool: &PgPool,
        actor: RecordUuid,
        input: &CreateLivestockStock,
    ) -> Result<LivestockStock, sqlx::Error> {
        let query = format!(
            "INSERT INTO livestock_stocks
                (premise_uuid, species_uuid, year, headcount_male, headcount_female, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LivestockStock>(&query)
            .bind(input.premise_uuid)
            .bind(input.species_uuid)
            .bind(input.year)
            .bind(input.headcount_male)
            .bind(input.headcount_female)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// Find a live stock count by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<LivestockStock>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM livestock_stocks WHERE uuid = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, LivestockStock>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// List live stock counts matching the filter, newest census year first.
    pub async fn list(
        pool: &PgPool,
        filter: &LivestockStockFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<LivestockStock>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM livestock_stocks
             WHERE {NOT_DELETED} AND {FILTER}
             ORDER BY year DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, LivestockStock>(&query)
            .bind(filter.premise_uuid)
            .bind(filter.species_uuid)
            .bind(filter.year)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count live stock counts matching the filter.
    pub async fn count(pool: &PgPool, filter: &LivestockStockFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM livestock_stocks WHERE {NOT_DELETED} AND {FILTER}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.premise_uuid)
            .bind(filter.species_uuid)
            .bind(filter.year)
            .fetch_one(pool)
            .await
    }

    /// Fetch all live stock counts matching the filter for export.
    pub async fn export(
        pool: &PgPool,
        filter: &LivestockStockFilter,
    ) -> Result<Vec<LivestockStock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM livestock_stocks
             WHERE {NOT_DELETED} AND {FILTER}
             ORDER BY year ASC, id ASC"
        );
        sqlx::query_as::<_, LivestockStock>(&query)
            .bind(filter.premise_uuid)
            .bind(filter.species_uuid)
            .bind(filter.year)
            .fetch_all(pool)
            .await
    }

    /// Partially update a live stock count, stamping the updating actor.
    pub async fn update(
        pool: &PgPool,
        uuid: RecordUuid,
        actor: RecordUuid,
        input: &UpdateLivestockStock,
    ) -> Result<Option<LivestockStock>, sqlx::Error> {
        let query = format!(
            "UPDATE livestock_stocks SET
                headcount_male = COALESCE($3, headcount_male),
                headcount_female = COALESCE($4, headcount_female),
                updated_by = $2,
                updated_at = now()
             WHERE uuid = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LivestockStock>(&query)
            .bind(uuid)
            .bind(actor)
            .bind(input.headcount_male)
            .bind(input.headcount_female)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a live stock count, stamping the deleting actor.
    pub async fn soft_delete(
        pool: &PgPool,
        uuid: RecordUuid,
        actor: RecordUuid,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE livestock_stocks SET deleted_at = now(), deleted_by = $2
             WHERE uuid = $1 AND {NOT_DELETED}"
        );
        let result = sqlx::query(&query).bind(uuid).bind(actor).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted stock count.
    pub async fn restore(pool: &PgPool, uuid: RecordUuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE livestock_stocks SET deleted_at = NULL, deleted_by = NULL
             WHERE uuid = $1 AND deleted_at IS NOT NULL",
        )
        .bind(uuid)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
