//! Repository for the `products` table (registered-product catalogue).

use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use agrireg_core::types::RecordUuid;
use sqlx::PgPool;

use super::NOT_DELETED;
use crate::models::product::{CreateProduct, Product, ProductFilter, UpdateProduct};

/// Column list for products queries.
const COLUMNS: &str = "id, uuid, registration_no, name, brand, category, manufacturer, \
    status, created_at, updated_at, deleted_at, created_by, updated_by, deleted_by";

/// Filter fragment shared by list / count / export. Binds $1-$3.
/// `$3` is a case-insensitive substring search over name / brand /
/// registration number.
const FILTER: &str = "($1::TEXT IS NULL OR category = $1) \
    AND ($2::TEXT IS NULL OR status = $2) \
    AND ($3::TEXT IS NULL OR name ILIKE '%' || $3 || '%' \
         OR brand ILIKE '%' || $3 || '%' \
         OR registration_no ILIKE '%' || $3 || '%')";

/// Provides CRUD for the product catalogue.
pub struct ProductRepo;

impl ProductRepo {
    /// Register a new product, stamping the creating actor.
    pub async fn create(
        pool: &PgPool,
        actor: RecordUuid,
        input: &CreateProduct,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products
                (registration_no, name, brand, category, manufacturer, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.registration_no)
            .bind(&input.name)
            .bind(&input.brand)
            .bind(&input.category)
            .bind(&input.manufacturer)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// Find a live product by public uuid.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: RecordUuid,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE uuid = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, Product>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// List live products matching the filter, alphabetical by name.
    pub async fn list(
        pool: &PgPool,
        filter: &ProductFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE {NOT_DELETED} AND {FILTER}
             ORDER BY name ASC, id ASC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&filter.category)
            .bind(&filter.status)
            .bind(&filter.search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count live products matching the filter.
    pub async fn count(pool: &PgPool, filter: &ProductFilter) -> Result<i64, sqlx::Error> {
        let query =
            format!("SELECT COUNT(*)::BIGINT FROM products WHERE {NOT_DELETED} AND {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(&filter.category)
            .bind(&filter.status)
            .bind(&filter.search)
            .fetch_one(pool)
            .await
    }

    /// Fetch all live products matching the filter for export.
    pub async fn export(
        pool: &PgPool,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE {NOT_DELETED} AND {FILTER}
             ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&filter.category)
            .bind(&filter.status)
            .bind(&filter.search)
            .fetch_all(pool)
            .await
    }

    /// Partially update a live product, stamping the updating actor.
    pub async fn update(
        pool: &PgPool,
        uuid: RecordUuid,
        actor: RecordUuid,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($3, name),
                brand = COALESCE($4, brand),
                category = COALESCE($5, category),
                manufacturer = COALESCE($6, manufacturer),
                status = COALESCE($7, status),
                updated_by = $2,
                updated_at = now()
             WHERE uuid = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(uuid)
            .bind(actor)
            .bind(&input.name)
            .bind(&input.brand)
            .bind(&input.category)
            .bind(&input.manufacturer)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a live product, stamping the deleting actor.
    pub async fn soft_delete(
        pool: &PgPool,
        uuid: RecordUuid,
        actor: RecordUuid,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE products SET deleted_at = now(), deleted_by = $2
             WHERE uuid = $1 AND {NOT_DELETED}"
        );
        let result = sqlx::query(&query).bind(uuid).bind(actor).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted product.
    pub async fn restore(pool: &PgPool, uuid: RecordUuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NULL, deleted_by = NULL
             WHERE uuid = $1 AND deleted_at IS NOT NULL",
        )
        .bind(uuid)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
