//! Integration tests for soft-delete, restore, and actor stamping.
//!
//! Verifies that:
//! - Soft-deleted rows vanish from `find_by_uuid`, lists, and counts
//! - Soft-delete stamps `deleted_by` and is idempotent (second call: false)
//! - Restore clears the deletion markers and makes the row visible again
//! - The behaviour is uniform across entity types

use agrireg_db::models::product::{CreateProduct, ProductFilter};
use agrireg_db::models::production_record::{CreateProductionRecord, ProductionRecordFilter};
use agrireg_db::models::reference::CreatePremise;
use agrireg_db::repositories::{PremiseRepo, ProductRepo, ProductionRecordRepo};
use sqlx::PgPool;
use uuid::Uuid;

fn seeded_district() -> Uuid {
    Uuid::parse_str("a2000000-0000-0000-0000-000000000001").unwrap()
}

fn seeded_commodity() -> Uuid {
    Uuid::parse_str("a3000000-0000-0000-0000-000000000001").unwrap()
}

async fn make_record(pool: &PgPool, actor: Uuid) -> agrireg_db::models::production_record::ProductionRecord {
    let premise = PremiseRepo::create(
        pool,
        &CreatePremise {
            district_uuid: seeded_district(),
            registration_no: format!("PRM-{}", &Uuid::new_v4().to_string()[..8]),
            name: "Soft Delete Farm".to_string(),
            owner_name: "Owner".to_string(),
            premise_type: "farm".to_string(),
        },
    )
    .await
    .unwrap();

    ProductionRecordRepo::create(
        pool,
        actor,
        &CreateProductionRecord {
            premise_uuid: premise.uuid,
            commodity_uuid: seeded_commodity(),
            year: 2024,
            month: 7,
            quantity: 500.0,
            unit_value: None,
            remarks: None,
        },
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_hides_record(pool: PgPool) {
    let actor = Uuid::new_v4();
    let record = make_record(&pool, actor).await;

    let deleted = ProductionRecordRepo::soft_delete(&pool, record.uuid, actor)
        .await
        .unwrap();
    assert!(deleted);

    assert!(ProductionRecordRepo::find_by_uuid(&pool, record.uuid)
        .await
        .unwrap()
        .is_none());

    let filter = ProductionRecordFilter {
        premise_uuid: Some(record.premise_uuid),
        ..Default::default()
    };
    assert!(ProductionRecordRepo::list(&pool, &filter, None, None)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(ProductionRecordRepo::count(&pool, &filter).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_is_idempotent(pool: PgPool) {
    let actor = Uuid::new_v4();
    let record = make_record(&pool, actor).await;

    assert!(ProductionRecordRepo::soft_delete(&pool, record.uuid, actor)
        .await
        .unwrap());
    // Second delete of the same row reports nothing to do.
    assert!(!ProductionRecordRepo::soft_delete(&pool, record.uuid, actor)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_restore_round_trip(pool: PgPool) {
    let actor = Uuid::new_v4();
    let record = make_record(&pool, actor).await;

    ProductionRecordRepo::soft_delete(&pool, record.uuid, actor)
        .await
        .unwrap();
    assert!(ProductionRecordRepo::restore(&pool, record.uuid).await.unwrap());

    let restored = ProductionRecordRepo::find_by_uuid(&pool, record.uuid)
        .await
        .unwrap()
        .expect("restored record should be visible");
    assert!(restored.deleted_at.is_none());
    assert!(restored.deleted_by.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_restore_of_live_record_is_a_noop(pool: PgPool) {
    let actor = Uuid::new_v4();
    let record = make_record(&pool, actor).await;

    assert!(!ProductionRecordRepo::restore(&pool, record.uuid).await.unwrap());
    assert!(!ProductionRecordRepo::restore(&pool, Uuid::new_v4()).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_frees_unique_period(pool: PgPool) {
    let actor = Uuid::new_v4();
    let record = make_record(&pool, actor).await;

    ProductionRecordRepo::soft_delete(&pool, record.uuid, actor)
        .await
        .unwrap();

    // The partial unique index only covers live rows, so the same reporting
    // period can be re-entered after a delete.
    let replacement = ProductionRecordRepo::create(
        &pool,
        actor,
        &CreateProductionRecord {
            premise_uuid: record.premise_uuid,
            commodity_uuid: record.commodity_uuid,
            year: record.year,
            month: record.month,
            quantity: 610.0,
            unit_value: None,
            remarks: None,
        },
    )
    .await
    .unwrap();
    assert_ne!(replacement.uuid, record.uuid);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_applies_to_products_too(pool: PgPool) {
    let actor = Uuid::new_v4();
    let product = ProductRepo::create(
        &pool,
        actor,
        &CreateProduct {
            registration_no: "MAL-2024-0099".to_string(),
            name: "Goat Milk Replacer".to_string(),
            brand: "AgroCo".to_string(),
            category: "feed".to_string(),
            manufacturer: "AgroCo Sdn Bhd".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(ProductRepo::soft_delete(&pool, product.uuid, actor).await.unwrap());
    assert!(ProductRepo::find_by_uuid(&pool, product.uuid).await.unwrap().is_none());
    assert!(ProductRepo::list(&pool, &ProductFilter::default(), None, None)
        .await
        .unwrap()
        .is_empty());

    assert!(ProductRepo::restore(&pool, product.uuid).await.unwrap());
    let restored = ProductRepo::find_by_uuid(&pool, product.uuid).await.unwrap();
    assert!(restored.is_some());
}
