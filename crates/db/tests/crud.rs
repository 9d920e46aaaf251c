//! Integration tests for repository CRUD behaviour against a real database.
//!
//! Reference rows (districts, commodities, species, offence types) come from
//! the seed migration; premises and domain records are created per test.

use agrireg_db::models::livestock_stock::CreateLivestockStock;
use agrireg_db::models::product::{CreateProduct, ProductFilter, UpdateProduct};
use agrireg_db::models::production_record::{
    CreateProductionRecord, ProductionRecordFilter, UpdateProductionRecord,
};
use agrireg_db::models::reference::CreatePremise;
use agrireg_db::models::retail_price::{CreateRetailPrice, RetailPriceFilter};
use agrireg_db::repositories::{
    CommodityRepo, DistrictRepo, LivestockStockRepo, PremiseRepo, ProductRepo,
    ProductionRecordRepo, RetailPriceRepo,
};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Seeded district "Hulu Langat".
fn seeded_district() -> Uuid {
    Uuid::parse_str("a2000000-0000-0000-0000-000000000001").unwrap()
}

/// Seeded commodity "Broiler Chicken".
fn seeded_commodity() -> Uuid {
    Uuid::parse_str("a3000000-0000-0000-0000-000000000001").unwrap()
}

/// Seeded species "Chicken".
fn seeded_species() -> Uuid {
    Uuid::parse_str("a4000000-0000-0000-0000-000000000001").unwrap()
}

fn actor() -> Uuid {
    Uuid::new_v4()
}

async fn make_premise(pool: &PgPool, registration_no: &str) -> Uuid {
    let premise = PremiseRepo::create(
        pool,
        &CreatePremise {
            district_uuid: seeded_district(),
            registration_no: registration_no.to_string(),
            name: format!("Farm {registration_no}"),
            owner_name: "Test Owner".to_string(),
            premise_type: "farm".to_string(),
        },
    )
    .await
    .unwrap();
    premise.uuid
}

fn new_production_record(premise_uuid: Uuid, year: i32, month: i32) -> CreateProductionRecord {
    CreateProductionRecord {
        premise_uuid,
        commodity_uuid: seeded_commodity(),
        year,
        month,
        quantity: 1250.5,
        unit_value: Some(8.40),
        remarks: None,
    }
}

// ---------------------------------------------------------------------------
// Production records
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_find_production_record(pool: PgPool) {
    let premise = make_premise(&pool, "PRM-0001").await;
    let actor = actor();

    let record = ProductionRecordRepo::create(&pool, actor, &new_production_record(premise, 2024, 3))
        .await
        .unwrap();

    assert_eq!(record.year, 2024);
    assert_eq!(record.month, 3);
    assert_eq!(record.created_by, actor);
    assert!(record.updated_by.is_none());
    assert!(record.deleted_at.is_none());

    let found = ProductionRecordRepo::find_by_uuid(&pool, record.uuid)
        .await
        .unwrap()
        .expect("record should be found by uuid");
    assert_eq!(found.id, record.id);
    assert!((found.quantity - 1250.5).abs() < f64::EPSILON);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_production_records_filtered_by_year(pool: PgPool) {
    let premise = make_premise(&pool, "PRM-0002").await;
    let actor = actor();

    for (year, month) in [(2023, 11), (2024, 1), (2024, 2)] {
        ProductionRecordRepo::create(&pool, actor, &new_production_record(premise, year, month))
            .await
            .unwrap();
    }

    let filter = ProductionRecordFilter {
        premise_uuid: Some(premise),
        year: Some(2024),
        ..Default::default()
    };
    let records = ProductionRecordRepo::list(&pool, &filter, None, None)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.year == 2024));

    // Newest reporting period first.
    assert_eq!(records[0].month, 2);

    let total = ProductionRecordRepo::count(&pool, &filter).await.unwrap();
    assert_eq!(total, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_production_record_is_partial(pool: PgPool) {
    let premise = make_premise(&pool, "PRM-0003").await;
    let creator = actor();
    let updater = actor();

    let record = ProductionRecordRepo::create(&pool, creator, &new_production_record(premise, 2024, 5))
        .await
        .unwrap();

    let updated = ProductionRecordRepo::update(
        &pool,
        record.uuid,
        updater,
        &UpdateProductionRecord {
            quantity: Some(1400.0),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("update should return the row");

    assert!((updated.quantity - 1400.0).abs() < f64::EPSILON);
    // Untouched fields keep their values.
    assert_eq!(updated.unit_value, record.unit_value);
    assert_eq!(updated.updated_by, Some(updater));
    assert!(updated.updated_at > record.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_unknown_uuid_returns_none(pool: PgPool) {
    let updated = ProductionRecordRepo::update(
        &pool,
        Uuid::new_v4(),
        actor(),
        &UpdateProductionRecord::default(),
    )
    .await
    .unwrap();
    assert!(updated.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_reporting_period_is_rejected(pool: PgPool) {
    let premise = make_premise(&pool, "PRM-0004").await;
    let actor = actor();

    ProductionRecordRepo::create(&pool, actor, &new_production_record(premise, 2024, 6))
        .await
        .unwrap();

    // Same premise + commodity + year + month violates the partial unique
    // index on live rows.
    let err = ProductionRecordRepo::create(&pool, actor, &new_production_record(premise, 2024, 6))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Retail prices
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_retail_price_date_range_filter(pool: PgPool) {
    let actor = actor();
    for (day, price) in [(1, 9.50), (15, 9.80), (28, 10.20)] {
        RetailPriceRepo::create(
            &pool,
            actor,
            &CreateRetailPrice {
                district_uuid: seeded_district(),
                commodity_uuid: seeded_commodity(),
                market_name: "Pasar Besar".to_string(),
                survey_date: chrono::NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
                price,
                unit: "kg".to_string(),
            },
        )
        .await
        .unwrap();
    }

    let filter = RetailPriceFilter {
        survey_date_from: chrono::NaiveDate::from_ymd_opt(2024, 4, 10),
        survey_date_to: chrono::NaiveDate::from_ymd_opt(2024, 4, 20),
        ..Default::default()
    };
    let prices = RetailPriceRepo::list(&pool, &filter, None, None).await.unwrap();
    assert_eq!(prices.len(), 1);
    assert!((prices[0].price - 9.80).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// Livestock stocks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_livestock_stock_census_uniqueness(pool: PgPool) {
    let premise = make_premise(&pool, "PRM-0005").await;
    let actor = actor();
    let input = CreateLivestockStock {
        premise_uuid: premise,
        species_uuid: seeded_species(),
        year: 2024,
        headcount_male: 120,
        headcount_female: 4800,
    };

    LivestockStockRepo::create(&pool, actor, &input).await.unwrap();
    let err = LivestockStockRepo::create(&pool, actor, &input).await.unwrap_err();
    assert!(matches!(err, sqlx::Error::Database(_)));
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_product_search_filter(pool: PgPool) {
    let actor = actor();
    for (reg, name) in [
        ("MAL-2024-0001", "Layer Feed Premix"),
        ("MAL-2024-0002", "Broiler Starter Feed"),
        ("MAL-2024-0003", "Teat Disinfectant"),
    ] {
        ProductRepo::create(
            &pool,
            actor,
            &CreateProduct {
                registration_no: reg.to_string(),
                name: name.to_string(),
                brand: "AgroCo".to_string(),
                category: "feed".to_string(),
                manufacturer: "AgroCo Sdn Bhd".to_string(),
            },
        )
        .await
        .unwrap();
    }

    let filter = ProductFilter {
        search: Some("feed".to_string()),
        ..Default::default()
    };
    let products = ProductRepo::list(&pool, &filter, None, None).await.unwrap();
    assert_eq!(products.len(), 2);

    let updated = ProductRepo::update(
        &pool,
        products[0].uuid,
        actor,
        &UpdateProduct {
            status: Some("suspended".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.status, "suspended");
}

// ---------------------------------------------------------------------------
// Reference name maps (manual-join lookups)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_reference_name_maps(pool: PgPool) {
    let premise = make_premise(&pool, "PRM-0006").await;

    let premises = PremiseRepo::name_map(&pool, &[premise]).await.unwrap();
    assert_eq!(premises.get(&premise).unwrap(), "Farm PRM-0006");

    let commodities = CommodityRepo::name_map(&pool, &[seeded_commodity()])
        .await
        .unwrap();
    assert_eq!(commodities.get(&seeded_commodity()).unwrap(), "Broiler Chicken");

    let districts = DistrictRepo::name_map(&pool, &[seeded_district()])
        .await
        .unwrap();
    assert_eq!(districts.get(&seeded_district()).unwrap(), "Hulu Langat");

    // Empty input short-circuits without touching the database.
    let empty = DistrictRepo::name_map(&pool, &[]).await.unwrap();
    assert!(empty.is_empty());

    // Unknown uuids simply produce no entry.
    let missing = DistrictRepo::name_map(&pool, &[Uuid::new_v4()]).await.unwrap();
    assert!(missing.is_empty());
}
