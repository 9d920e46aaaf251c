//! HTTP-level tests for CSV export, CSV import, and the tokenized
//! transport mode.

mod common;

use common::{build_test_app, create_user, first_error_code, login, post_graphql, TEST_JWT_SECRET};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use agrireg_api::graphql::payload_token::{sign_payload, verify_payload};
use agrireg_db::models::reference::CreatePremise;
use agrireg_db::repositories::PremiseRepo;

fn seeded_district() -> Uuid {
    Uuid::parse_str("a2000000-0000-0000-0000-000000000001").unwrap()
}

fn seeded_commodity() -> Uuid {
    Uuid::parse_str("a3000000-0000-0000-0000-000000000001").unwrap()
}

async fn make_premise(pool: &PgPool, registration_no: &str) -> Uuid {
    PremiseRepo::create(
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
    .unwrap()
    .uuid
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_export_includes_reference_names(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let premise = make_premise(&pool, "PRM-2001").await;
    let app = build_test_app(pool);
    let token = login(&app, "norlia", "officer-password").await;

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "mutation($input: CreateProductionRecordInput!) { \
                createProductionRecord(input: $input) { uuid } }",
            "variables": { "input": {
                "premiseUuid": premise,
                "commodityUuid": seeded_commodity(),
                "year": 2026, "month": 2, "quantity": 500.0,
            } },
        }),
        Some(&token),
    )
    .await;
    assert!(json["data"]["createProductionRecord"]["uuid"].is_string());

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "{ exportProductionRecords { fileName contentType content } }",
        }),
        Some(&token),
    )
    .await;
    let file = &json["data"]["exportProductionRecords"];
    assert_eq!(file["contentType"], "text/csv");
    assert!(file["fileName"]
        .as_str()
        .unwrap()
        .starts_with("production_records_"));

    let content = file["content"].as_str().unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "premise,commodity,year,month,quantity,unit_value,remarks"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("Farm PRM-2001"));
    assert!(row.contains("Broiler Chicken"));
    assert!(row.contains("2026"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_retail_prices_reports_per_row_errors(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let app = build_test_app(pool);
    let token = login(&app, "norlia", "officer-password").await;

    // Line 2 is valid, line 3 has an unknown district code, line 4 a bad
    // price.
    let csv = "district_code,commodity_code,market_name,survey_date,price,unit\n\
        CTR-01,CHK-BRL,Pasar Kajang,2026-08-20,9.50,kg\n\
        XXX-99,CHK-BRL,Pasar Kajang,2026-08-20,9.50,kg\n\
        CTR-01,CHK-BRL,Pasar Kajang,2026-08-20,free,kg\n";

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "mutation($csv: String!) { \
                importRetailPrices(csv: $csv) { imported skipped errors } }",
            "variables": { "csv": csv },
        }),
        Some(&token),
    )
    .await;
    let summary = &json["data"]["importRetailPrices"];
    assert_eq!(summary["imported"], 1);
    assert_eq!(summary["skipped"], 2);
    let errors = summary["errors"].as_array().unwrap();
    assert!(errors[0].as_str().unwrap().starts_with("line 3:"));
    assert!(errors[1].as_str().unwrap().starts_with("line 4:"));

    // The valid row landed.
    let (_, json) = post_graphql(
        &app,
        json!({ "query": "{ retailPrices { totalCount items { marketName districtName } } }" }),
        Some(&token),
    )
    .await;
    let page = &json["data"]["retailPrices"];
    assert_eq!(page["totalCount"], 1);
    assert_eq!(page["items"][0]["marketName"], "Pasar Kajang");
    assert_eq!(page["items"][0]["districtName"], "Hulu Langat");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_production_records_resolves_registration_no(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    make_premise(&pool, "PRM-2002").await;
    let app = build_test_app(pool);
    let token = login(&app, "norlia", "officer-password").await;

    let csv = "premise_registration_no,commodity_code,year,month,quantity,unit_value,remarks\n\
        PRM-2002,CHK-BRL,2026,1,1000,8.5,first batch\n\
        PRM-2002,CHK-BRL,2026,1,1000,8.5,duplicate period\n";

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "mutation($csv: String!) { \
                importProductionRecords(csv: $csv) { imported skipped errors } }",
            "variables": { "csv": csv },
        }),
        Some(&token),
    )
    .await;
    let summary = &json["data"]["importProductionRecords"];
    // The second row collides on (premise, commodity, year, month).
    assert_eq!(summary["imported"], 1);
    assert_eq!(summary["skipped"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_tokenized_create_round_trip(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let premise = make_premise(&pool, "PRM-2003").await;
    let app = build_test_app(pool);
    let token = login(&app, "norlia", "officer-password").await;

    let payload = json!({
        "premise_uuid": premise,
        "commodity_uuid": seeded_commodity(),
        "year": 2026,
        "month": 4,
        "quantity": 750.0,
        "unit_value": null,
        "remarks": null,
    });
    let signed = sign_payload(&payload, TEST_JWT_SECRET).unwrap();

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "mutation($t: String!) { createProductionRecordTokenized(token: $t) }",
            "variables": { "t": signed },
        }),
        Some(&token),
    )
    .await;
    let result_token = json["data"]["createProductionRecordTokenized"]
        .as_str()
        .unwrap_or_else(|| panic!("tokenized create failed: {json}"));

    let record: serde_json::Value = verify_payload(result_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(record["year"], 2026);
    assert_eq!(record["month"], 4);
    assert_eq!(record["quantity"], 750.0);
    assert!(record["uuid"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_tokenized_create_rejects_bad_signature(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let premise = make_premise(&pool, "PRM-2004").await;
    let app = build_test_app(pool);
    let token = login(&app, "norlia", "officer-password").await;

    let payload = json!({
        "premise_uuid": premise,
        "commodity_uuid": seeded_commodity(),
        "year": 2026, "month": 5, "quantity": 1.0,
        "unit_value": null, "remarks": null,
    });
    let signed = sign_payload(&payload, "some-other-secret").unwrap();

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "mutation($t: String!) { createProductionRecordTokenized(token: $t) }",
            "variables": { "t": signed },
        }),
        Some(&token),
    )
    .await;
    assert_eq!(first_error_code(&json), Some("UNAUTHORIZED"));
}
