//! HTTP-level tests for production record CRUD, role gating, soft delete,
//! and the audit trail.

mod common;

use common::{build_test_app, create_user, first_error_code, login, post_graphql};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use agrireg_db::models::reference::CreatePremise;
use agrireg_db::repositories::PremiseRepo;

/// Seeded district "Hulu Langat".
fn seeded_district() -> Uuid {
    Uuid::parse_str("a2000000-0000-0000-0000-000000000001").unwrap()
}

/// Seeded commodity "Broiler Chicken".
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

const CREATE_MUTATION: &str = "mutation($input: CreateProductionRecordInput!) { \
    createProductionRecord(input: $input) { \
        uuid premiseName commodityName year month quantity \
        createdBy { username } } }";

fn create_input(premise: Uuid, year: i32, month: i32) -> serde_json::Value {
    json!({
        "premiseUuid": premise,
        "commodityUuid": seeded_commodity(),
        "year": year,
        "month": month,
        "quantity": 1250.5,
        "unitValue": 8.2,
        "remarks": "normal month",
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_embeds_denormalized_names(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let premise = make_premise(&pool, "PRM-1001").await;
    let app = build_test_app(pool);
    let token = login(&app, "norlia", "officer-password").await;

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": CREATE_MUTATION,
            "variables": { "input": create_input(premise, 2026, 3) },
        }),
        Some(&token),
    )
    .await;
    let record = &json["data"]["createProductionRecord"];
    assert_eq!(record["premiseName"], "Farm PRM-1001");
    assert_eq!(record["commodityName"], "Broiler Chicken");
    assert_eq!(record["createdBy"]["username"], "norlia");
    assert_eq!(record["quantity"], 1250.5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_mutations_are_role_gated(pool: PgPool) {
    create_user(&pool, "viewer", "viewer-password", "viewer").await;
    let premise = make_premise(&pool, "PRM-1002").await;
    let app = build_test_app(pool);

    let body = json!({
        "query": CREATE_MUTATION,
        "variables": { "input": create_input(premise, 2026, 4) },
    });

    // No token at all.
    let (_, json) = post_graphql(&app, body.clone(), None).await;
    assert_eq!(first_error_code(&json), Some("UNAUTHORIZED"));

    // Viewers can read but not write.
    let token = login(&app, "viewer", "viewer-password").await;
    let (_, json) = post_graphql(&app, body, Some(&token)).await;
    assert_eq!(first_error_code(&json), Some("FORBIDDEN"));

    let (_, json) = post_graphql(
        &app,
        json!({ "query": "{ productionRecords { totalCount } }" }),
        Some(&token),
    )
    .await;
    assert_eq!(json["data"]["productionRecords"]["totalCount"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_validation_rejects_bad_month(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let premise = make_premise(&pool, "PRM-1003").await;
    let app = build_test_app(pool);
    let token = login(&app, "norlia", "officer-password").await;

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": CREATE_MUTATION,
            "variables": { "input": create_input(premise, 2026, 13) },
        }),
        Some(&token),
    )
    .await;
    assert_eq!(first_error_code(&json), Some("VALIDATION_ERROR"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_period_is_conflict(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let premise = make_premise(&pool, "PRM-1004").await;
    let app = build_test_app(pool);
    let token = login(&app, "norlia", "officer-password").await;

    let body = json!({
        "query": CREATE_MUTATION,
        "variables": { "input": create_input(premise, 2026, 5) },
    });
    let (_, json) = post_graphql(&app, body.clone(), Some(&token)).await;
    assert!(json["data"]["createProductionRecord"]["uuid"].is_string());

    let (_, json) = post_graphql(&app, body, Some(&token)).await;
    assert_eq!(first_error_code(&json), Some("CONFLICT"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_partial_update_keeps_other_fields(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let premise = make_premise(&pool, "PRM-1005").await;
    let app = build_test_app(pool);
    let token = login(&app, "norlia", "officer-password").await;

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": CREATE_MUTATION,
            "variables": { "input": create_input(premise, 2026, 6) },
        }),
        Some(&token),
    )
    .await;
    let uuid = json["data"]["createProductionRecord"]["uuid"]
        .as_str()
        .unwrap()
        .to_string();

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "mutation($uuid: UUID!, $input: UpdateProductionRecordInput!) { \
                updateProductionRecord(uuid: $uuid, input: $input) { \
                    quantity remarks updatedBy { username } } }",
            "variables": { "uuid": uuid, "input": { "quantity": 900.0 } },
        }),
        Some(&token),
    )
    .await;
    let record = &json["data"]["updateProductionRecord"];
    assert_eq!(record["quantity"], 900.0);
    assert_eq!(record["remarks"], "normal month");
    assert_eq!(record["updatedBy"]["username"], "norlia");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_empty_update_bumps_stamp_and_audits(pool: PgPool) {
    create_user(&pool, "admin", "admin-password", "admin").await;
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let premise = make_premise(&pool, "PRM-1008").await;
    let app = build_test_app(pool);
    let token = login(&app, "norlia", "officer-password").await;

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": CREATE_MUTATION,
            "variables": { "input": create_input(premise, 2026, 9) },
        }),
        Some(&token),
    )
    .await;
    let uuid = json["data"]["createProductionRecord"]["uuid"]
        .as_str()
        .unwrap()
        .to_string();

    // An all-absent input changes no field but still stamps the row.
    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "mutation($uuid: UUID!, $input: UpdateProductionRecordInput!) { \
                updateProductionRecord(uuid: $uuid, input: $input) { \
                    quantity remarks createdAt updatedAt updatedBy { username } } }",
            "variables": { "uuid": uuid, "input": {} },
        }),
        Some(&token),
    )
    .await;
    let record = &json["data"]["updateProductionRecord"];
    assert_eq!(record["quantity"], 1250.5);
    assert_eq!(record["remarks"], "normal month");
    assert_eq!(record["updatedBy"]["username"], "norlia");
    assert_ne!(record["updatedAt"], record["createdAt"]);

    let admin_token = login(&app, "admin", "admin-password").await;
    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "query($f: ActivityLogFilterInput) { \
                activityLogs(filter: $f) { totalCount items { action } } }",
            "variables": { "f": { "entityType": "production_record", "action": "update" } },
        }),
        Some(&admin_token),
    )
    .await;
    let logs = &json["data"]["activityLogs"];
    assert_eq!(logs["totalCount"], 1);
    assert_eq!(logs["items"][0]["action"], "update");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_hides_and_restore_revives(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let premise = make_premise(&pool, "PRM-1006").await;
    let app = build_test_app(pool);
    let token = login(&app, "norlia", "officer-password").await;

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": CREATE_MUTATION,
            "variables": { "input": create_input(premise, 2026, 7) },
        }),
        Some(&token),
    )
    .await;
    let uuid = json["data"]["createProductionRecord"]["uuid"]
        .as_str()
        .unwrap()
        .to_string();

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "mutation($uuid: UUID!) { deleteProductionRecord(uuid: $uuid) }",
            "variables": { "uuid": uuid },
        }),
        Some(&token),
    )
    .await;
    assert_eq!(json["data"]["deleteProductionRecord"], true);

    // Gone from reads.
    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "query($uuid: UUID!) { productionRecord(uuid: $uuid) { uuid } }",
            "variables": { "uuid": uuid },
        }),
        Some(&token),
    )
    .await;
    assert_eq!(first_error_code(&json), Some("NOT_FOUND"));

    // A second delete is not found either.
    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "mutation($uuid: UUID!) { deleteProductionRecord(uuid: $uuid) }",
            "variables": { "uuid": uuid },
        }),
        Some(&token),
    )
    .await;
    assert_eq!(first_error_code(&json), Some("NOT_FOUND"));

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "mutation($uuid: UUID!) { restoreProductionRecord(uuid: $uuid) { uuid year } }",
            "variables": { "uuid": uuid },
        }),
        Some(&token),
    )
    .await;
    assert_eq!(json["data"]["restoreProductionRecord"]["year"], 2026);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_mutations_leave_an_audit_trail(pool: PgPool) {
    create_user(&pool, "admin", "admin-password", "admin").await;
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let premise = make_premise(&pool, "PRM-1007").await;
    let app = build_test_app(pool);
    let officer_token = login(&app, "norlia", "officer-password").await;

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": CREATE_MUTATION,
            "variables": { "input": create_input(premise, 2026, 8) },
        }),
        Some(&officer_token),
    )
    .await;
    let uuid = json["data"]["createProductionRecord"]["uuid"]
        .as_str()
        .unwrap()
        .to_string();

    let logs_query = json!({
        "query": "query($f: ActivityLogFilterInput) { \
            activityLogs(filter: $f) { totalCount items { action username entityUuid } } }",
        "variables": { "f": { "entityType": "production_record" } },
    });

    // Officers cannot read the audit trail.
    let (_, json) = post_graphql(&app, logs_query.clone(), Some(&officer_token)).await;
    assert_eq!(first_error_code(&json), Some("FORBIDDEN"));

    let admin_token = login(&app, "admin", "admin-password").await;
    let (_, json) = post_graphql(&app, logs_query, Some(&admin_token)).await;
    let logs = &json["data"]["activityLogs"];
    assert_eq!(logs["totalCount"], 1);
    assert_eq!(logs["items"][0]["action"], "create");
    assert_eq!(logs["items"][0]["username"], "norlia");
    assert_eq!(logs["items"][0]["entityUuid"], uuid);
}
