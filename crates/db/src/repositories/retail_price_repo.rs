//! Repository for the `retail_prices` table.

use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use agrireg_core::types::RecordUuid;
use sqlx::PgPool;

use super::NOT_DELETED;
use crate::models::retail_price::{
    CreateRetailPrice, RetailPrice, RetailPriceFilter, UpdateRetailPrice,
};

/// Column list for retail_prices queries.
const COLUMNS: &str = "id, uuid, district_uuid, commodity_uuid, market_name, survey_date, \
    price, unit, created_at, updated_at, deleted_at, created_by, updated_by, deleted_by";

/// Filter fragment shared by list / count / export. Binds $1-$4.
const FILTER: &str = "($1::UUID IS NULL OR district_uuid = $1) \
    AND ($2::UUID IS NULL OR commodity_uuid = $2) \
    AND ($3::DATE IS NULL OR survey_date >= $3) \
    AND ($4::DATE IS NULL OR survey_date <= $4)";

/// Provides CRUD for retail price survey records.
pub struct RetailPriceRepo;

impl RetailPriceRepo {
    /// Insert a new survey record, stamping the creating actor.
    pub async fn create(
        pool: &PgPool,
        actor: RecordUuid,
        input: &CreateRetailPrice,
    ) -> Result<RetailPrice, sqlx::Error> {
        let query = format!(
            "INSERT INTO retail_prices
                (district_uuid, commodity_uuid, market_name, survey_date, price, unit, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RetailPrice>(&query)
            .bind(input.district_uuid)
            .bind(input.commodity_uuid)
            .bind(&input.market_name)
            .bind(input.survey_date)
            .bind(input.price)
            .bind(&input.unit)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// Find a live survey record by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<RetailPrice>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM retail_prices WHERE uuid = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, RetailPrice>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// List live survey records matching the filter, newest survey first.
    pub async fn list(
        pool: &PgPool,
        filter: &RetailPriceFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<RetailPrice>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM retail_prices
             WHERE {NOT_DELETED} AND {FILTER}
             ORDER BY survey_date DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, RetailPrice>(&query)
            .bind(filter.district_uuid)
            .bind(filter.commodity_uuid)
            .bind(filter.survey_date_from)
            .bind(filter.survey_date_to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count live survey records matching the filter.
    pub async fn count(pool: &PgPool, filter: &RetailPriceFilter) -> Result<i64, sqlx::Error> {
        let query =
            format!("SELECT COUNT(*)::BIGINT FROM retail_prices WHERE {NOT_DELETED} AND {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.district_uuid)
            .bind(filter.commodity_uuid)
            .bind(filter.survey_date_from)
            .bind(filter.survey_date_to)
            .fetch_one(pool)
            .await
    }

    /// Fetch all live survey records matching the filter for export,
    /// oldest survey first.
    pub async fn export(
        pool: &PgPool,
        filter: &RetailPriceFilter,
    ) -> Result<Vec<RetailPrice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM retail_prices
             WHERE {NOT_DELETED} AND {FILTER}
             ORDER BY survey_date ASC, id ASC"
        );
        sqlx::query_as::<_, RetailPrice>(&query)
            .bind(filter.district_uuid)
            .bind(filter.commodity_uuid)
            .bind(filter.survey_date_from)
            .bind(filter.survey_date_to)
            .fetch_all(pool)
            .await
    }

    /// Partially update a live survey record, stamping the updating actor.
    pub async fn update(
        pool: &PgPool,
        uuid: RecordUuid,
        actor: RecordUuid,
        input: &UpdateRetailPrice,
    ) -> Result<Option<RetailPrice>, sqlx::Error> {
        let query = format!(
            "UPDATE retail_prices SET
                market_name = COALESCE($3, market_name),
                price = COALESCE($4, price),
                unit = COALESCE($5, unit),
                updated_by = $2,
                updated_at = now()
             WHERE uuid = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RetailPrice>(&query)
            .bind(uuid)
            .bind(actor)
            .bind(&input.market_name)
            .bind(input.price)
            .bind(&input.unit)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a live survey record, stamping the deleting actor.
    pub async fn soft_delete(
        pool: &PgPool,
        uuid: RecordUuid,
        actor: RecordUuid,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE retail_prices SET deleted_at = now(), deleted_by = $2
             WHERE uuid = $1 AND {NOT_DELETED}"
        );
        let result = sqlx::query(&query).bind(uuid).bind(actor).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted survey record.
    pub async fn restore(pool: &PgPool, uuid: RecordUuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE retail_prices SET deleted_at = NULL, deleted_by = NULL
             WHERE uuid = $1 AND deleted_at IS NOT NULL",
        )
        .bind(uuid)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
