//! Registered-product catalogue resolvers.

use async_graphql::{Context, InputObject, Object, SimpleObject};
use serde::Serialize;

use agrireg_core::audit::{actions, entity_types};
use agrireg_core::catalogue;
use agrireg_core::error::CoreError;
use agrireg_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use agrireg_core::types::{RecordUuid, Timestamp};
use agrireg_db::models::product::{CreateProduct, Product, ProductFilter, UpdateProduct};
use agrireg_db::repositories::{ProductRepo, UserRepo};
use agrireg_db::DbPool;

use crate::error::{gql_db_error, gql_error, GqlResult};
use crate::graphql::audit::{audit_payload, record_activity};
use crate::graphql::guard::{require_auth, require_officer};
use crate::graphql::resolvers::{actor_stub, UserStubObject};
use crate::graphql::spreadsheet::{build_csv, ExportFile};

/// A registered product.
#[derive(Debug, SimpleObject)]
#[graphql(name = "Product")]
pub struct ProductObject {
    /// Database id as a string (the raw value exceeds the JS safe-integer
    /// range).
    pub id: String,
    pub uuid: RecordUuid,
    pub registration_no: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub manufacturer: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<UserStubObject>,
    pub updated_by: Option<UserStubObject>,
}

#[derive(Debug, SimpleObject)]
pub struct ProductPage {
    pub items: Vec<ProductObject>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, InputObject, Serialize)]
pub struct CreateProductInput {
    pub registration_no: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub manufacturer: String,
}

impl From<CreateProductInput> for CreateProduct {
    fn from(input: CreateProductInput) -> Self {
        Self {
            registration_no: input.registration_no,
            name: input.name,
            brand: input.brand,
            category: input.category,
            manufacturer: input.manufacturer,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject, Serialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    /// One of `active`, `suspended`, `revoked`.
    pub status: Option<String>,
}

impl From<UpdateProductInput> for UpdateProduct {
    fn from(input: UpdateProductInput) -> Self {
        Self {
            name: input.name,
            brand: input.brand,
            category: input.category,
            manufacturer: input.manufacturer,
            status: input.status,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct ProductFilterInput {
    pub category: Option<String>,
    pub status: Option<String>,
    /// Case-insensitive substring match on name, brand, or registration
    /// number.
    pub search: Option<String>,
}

impl From<ProductFilterInput> for ProductFilter {
    fn from(input: ProductFilterInput) -> Self {
        Self {
            category: input.category,
            status: input.status,
            search: input.search,
        }
    }
}

fn validate_create(input: &CreateProductInput) -> Result<(), CoreError> {
    catalogue::validate_registration_no(&input.registration_no).map_err(CoreError::Validation)?;
    catalogue::validate_required_field("name", &input.name).map_err(CoreError::Validation)?;
    catalogue::validate_required_field("brand", &input.brand).map_err(CoreError::Validation)?;
    catalogue::validate_required_field("category", &input.category)
        .map_err(CoreError::Validation)?;
    catalogue::validate_required_field("manufacturer", &input.manufacturer)
        .map_err(CoreError::Validation)?;
    Ok(())
}

fn validate_update(input: &UpdateProductInput) -> Result<(), CoreError> {
    if let Some(name) = &input.name {
        catalogue::validate_required_field("name", name).map_err(CoreError::Validation)?;
    }
    if let Some(brand) = &input.brand {
        catalogue::validate_required_field("brand", brand).map_err(CoreError::Validation)?;
    }
    if let Some(category) = &input.category {
        catalogue::validate_required_field("category", category).map_err(CoreError::Validation)?;
    }
    if let Some(manufacturer) = &input.manufacturer {
        catalogue::validate_required_field("manufacturer", manufacturer)
            .map_err(CoreError::Validation)?;
    }
    if let Some(status) = &input.status {
        catalogue::validate_status(status).map_err(CoreError::Validation)?;
    }
    Ok(())
}

async fn decorate(pool: &DbPool, rows: Vec<Product>) -> GqlResult<Vec<ProductObject>> {
    let mut actor_uuids: Vec<RecordUuid> = rows.iter().map(|r| r.created_by).collect();
    actor_uuids.extend(rows.iter().filter_map(|r| r.updated_by));
    let actors = UserRepo::stubs_by_uuids(pool, &actor_uuids)
        .await
        .map_err(gql_db_error)?;

    Ok(rows
        .into_iter()
        .map(|r| ProductObject {
            id: r.id.to_string(),
            uuid: r.uuid,
            registration_no: r.registration_no,
            name: r.name,
            brand: r.brand,
            category: r.category,
            manufacturer: r.manufacturer,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
            created_by: actor_stub(&actors, Some(r.created_by)),
            updated_by: actor_stub(&actors, r.updated_by),
        })
        .collect())
}

async fn decorate_one(pool: &DbPool, row: Product) -> GqlResult<ProductObject> {
    let mut items = decorate(pool, vec![row]).await?;
    items
        .pop()
        .ok_or_else(|| gql_error(CoreError::Internal("decoration yielded no row".into())))
}

#[derive(Default)]
pub struct CatalogueQuery;

#[Object]
impl CatalogueQuery {
    /// List registered products, newest registration first.
    async fn products(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProductFilterInput>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> GqlResult<ProductPage> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let filter: ProductFilter = filter.unwrap_or_default().into();
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(offset);

        let rows = ProductRepo::list(pool, &filter, Some(limit), Some(offset))
            .await
            .map_err(gql_db_error)?;
        let total_count = ProductRepo::count(pool, &filter)
            .await
            .map_err(gql_db_error)?;
        let items = decorate(pool, rows).await?;
        Ok(ProductPage {
            items,
            total_count,
            limit,
            offset,
        })
    }

    /// Fetch a single product by uuid.
    async fn product(&self, ctx: &Context<'_>, uuid: RecordUuid) -> GqlResult<ProductObject> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let row = ProductRepo::find_by_uuid(pool, uuid)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "product",
                    uuid,
                })
            })?;
        decorate_one(pool, row).await
    }

    /// Export the filtered products as a CSV spreadsheet.
    async fn export_products(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProductFilterInput>,
    ) -> GqlResult<ExportFile> {
        require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let filter: ProductFilter = filter.unwrap_or_default().into();
        let rows = ProductRepo::export(pool, &filter)
            .await
            .map_err(gql_db_error)?;
        let items = decorate(pool, rows).await?;

        let data: Vec<Vec<String>> = items
            .iter()
            .map(|r| {
                vec![
                    r.registration_no.clone(),
                    r.name.clone(),
                    r.brand.clone(),
                    r.category.clone(),
                    r.manufacturer.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        let csv = build_csv(
            &[
                "registration_no",
                "name",
                "brand",
                "category",
                "manufacturer",
                "status",
            ],
            &data,
        );
        Ok(ExportFile::csv("products", csv))
    }
}

#[derive(Default)]
pub struct CatalogueMutation;

#[Object]
impl CatalogueMutation {
    /// Register a product. The registration number must be unique among
    /// live products.
    async fn create_product(
        &self,
        ctx: &Context<'_>,
        input: CreateProductInput,
    ) -> GqlResult<ProductObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        validate_create(&input).map_err(gql_error)?;

        let payload = audit_payload(&input);
        let row = ProductRepo::create(pool, user.user_uuid, &input.into())
            .await
            .map_err(gql_db_error)?;
        record_activity(
            pool,
            user,
            actions::CREATE,
            entity_types::PRODUCT,
            Some(row.uuid),
            payload,
        )
        .await?;
        tracing::info!(user = %user.username, uuid = %row.uuid, "product created");
        decorate_one(pool, row).await
    }

    /// Partial update of product details or registration status.
    async fn update_product(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
        input: UpdateProductInput,
    ) -> GqlResult<ProductObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        validate_update(&input).map_err(gql_error)?;
        let payload = audit_payload(&input);
        let row = ProductRepo::update(pool, uuid, user.user_uuid, &input.into())
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "product",
                    uuid,
                })
            })?;
        record_activity(
            pool,
            user,
            actions::UPDATE,
            entity_types::PRODUCT,
            Some(uuid),
            payload,
        )
        .await?;
        tracing::info!(user = %user.username, %uuid, "product updated");
        decorate_one(pool, row).await
    }

    /// Soft-delete a product.
    async fn delete_product(&self, ctx: &Context<'_>, uuid: RecordUuid) -> GqlResult<bool> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let deleted = ProductRepo::soft_delete(pool, uuid, user.user_uuid)
            .await
            .map_err(gql_db_error)?;
        if !deleted {
            return Err(gql_error(CoreError::NotFound {
                entity: "product",
                uuid,
            }));
        }
        record_activity(
            pool,
            user,
            actions::DELETE,
            entity_types::PRODUCT,
            Some(uuid),
            None,
        )
        .await?;
        tracing::info!(user = %user.username, %uuid, "product deleted");
        Ok(true)
    }

    /// Restore a soft-deleted product. Fails with a conflict if another
    /// live product has since taken the registration number.
    async fn restore_product(
        &self,
        ctx: &Context<'_>,
        uuid: RecordUuid,
    ) -> GqlResult<ProductObject> {
        let user = require_officer(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let restored = ProductRepo::restore(pool, uuid)
            .await
            .map_err(gql_db_error)?;
        if !restored {
            return Err(gql_error(CoreError::NotFound {
                entity: "product",
                uuid,
            }));
        }
        record_activity(
            pool,
            user,
            actions::RESTORE,
            entity_types::PRODUCT,
            Some(uuid),
            None,
        )
        .await?;
        let row = ProductRepo::find_by_uuid(pool, uuid)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::NotFound {
                    entity: "product",
                    uuid,
                })
            })?;
        decorate_one(pool, row).await
    }
}
