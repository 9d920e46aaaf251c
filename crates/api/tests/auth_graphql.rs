//! HTTP-level tests for login, lockout, refresh rotation, logout, and `me`.

mod common;

use axum::http::StatusCode;
use common::{build_test_app, create_user, first_error_code, login, post_graphql};
use serde_json::json;
use sqlx::PgPool;

const LOGIN_MUTATION: &str = "mutation($u: String!, $p: String!) { \
    login(username: $u, password: $p) { \
        accessToken refreshToken expiresIn user { username role } } }";

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_returns_tokens_and_user(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let app = build_test_app(pool);

    let (status, json) = post_graphql(
        &app,
        json!({
            "query": LOGIN_MUTATION,
            "variables": { "u": "norlia", "p": "officer-password" },
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let payload = &json["data"]["login"];
    assert!(payload["accessToken"].as_str().unwrap().len() > 20);
    assert!(payload["refreshToken"].as_str().unwrap().len() > 20);
    assert_eq!(payload["expiresIn"], 1800);
    assert_eq!(payload["user"]["username"], "norlia");
    assert_eq!(payload["user"]["role"], "officer");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password_is_unauthorized(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let app = build_test_app(pool);

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": LOGIN_MUTATION,
            "variables": { "u": "norlia", "p": "wrong-password" },
        }),
        None,
    )
    .await;
    assert_eq!(first_error_code(&json), Some("UNAUTHORIZED"));
    // Unknown usernames get the same error class.
    let (_, json) = post_graphql(
        &app,
        json!({
            "query": LOGIN_MUTATION,
            "variables": { "u": "nobody", "p": "whatever-password" },
        }),
        None,
    )
    .await;
    assert_eq!(first_error_code(&json), Some("UNAUTHORIZED"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_lockout_after_repeated_failures(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let app = build_test_app(pool);

    for _ in 0..5 {
        let (_, json) = post_graphql(
            &app,
            json!({
                "query": LOGIN_MUTATION,
                "variables": { "u": "norlia", "p": "wrong-password" },
            }),
            None,
        )
        .await;
        assert_eq!(first_error_code(&json), Some("UNAUTHORIZED"));
    }

    // Even the correct password is rejected while locked.
    let (_, json) = post_graphql(
        &app,
        json!({
            "query": LOGIN_MUTATION,
            "variables": { "u": "norlia", "p": "officer-password" },
        }),
        None,
    )
    .await;
    assert_eq!(first_error_code(&json), Some("UNAUTHORIZED"));
    assert!(json["errors"][0]["message"]
        .as_str()
        .unwrap()
        .contains("locked"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_requires_and_reflects_session(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let app = build_test_app(pool);

    let me_query = json!({ "query": "{ me { username role email } }" });

    let (_, json) = post_graphql(&app, me_query.clone(), None).await;
    assert_eq!(first_error_code(&json), Some("UNAUTHORIZED"));

    let token = login(&app, "norlia", "officer-password").await;
    let (_, json) = post_graphql(&app, me_query, Some(&token)).await;
    assert_eq!(json["data"]["me"]["username"], "norlia");
    assert_eq!(json["data"]["me"]["role"], "officer");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let app = build_test_app(pool);

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": LOGIN_MUTATION,
            "variables": { "u": "norlia", "p": "officer-password" },
        }),
        None,
    )
    .await;
    let refresh_token = json["data"]["login"]["refreshToken"]
        .as_str()
        .unwrap()
        .to_string();

    let refresh_mutation = "mutation($t: String!) { \
        refreshSession(refreshToken: $t) { accessToken refreshToken } }";

    let (_, json) = post_graphql(
        &app,
        json!({ "query": refresh_mutation, "variables": { "t": refresh_token } }),
        None,
    )
    .await;
    let rotated = json["data"]["refreshSession"]["refreshToken"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(rotated, refresh_token);

    // The original token was revoked by the rotation.
    let (_, json) = post_graphql(
        &app,
        json!({ "query": refresh_mutation, "variables": { "t": refresh_token } }),
        None,
    )
    .await;
    assert_eq!(first_error_code(&json), Some("UNAUTHORIZED"));

    // The rotated token still works.
    let (_, json) = post_graphql(
        &app,
        json!({ "query": refresh_mutation, "variables": { "t": rotated } }),
        None,
    )
    .await;
    assert!(json["data"]["refreshSession"]["accessToken"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    create_user(&pool, "norlia", "officer-password", "officer").await;
    let app = build_test_app(pool);

    let (_, json) = post_graphql(
        &app,
        json!({
            "query": LOGIN_MUTATION,
            "variables": { "u": "norlia", "p": "officer-password" },
        }),
        None,
    )
    .await;
    let access_token = json["data"]["login"]["accessToken"]
        .as_str()
        .unwrap()
        .to_string();
    let refresh_token = json["data"]["login"]["refreshToken"]
        .as_str()
        .unwrap()
        .to_string();

    let (_, json) = post_graphql(
        &app,
        json!({ "query": "mutation { logout }" }),
        Some(&access_token),
    )
    .await;
    assert_eq!(json["data"]["logout"], 1);

    // The refresh token no longer works after logout.
    let (_, json) = post_graphql(
        &app,
        json!({
            "query": "mutation($t: String!) { refreshSession(refreshToken: $t) { accessToken } }",
            "variables": { "t": refresh_token },
        }),
        None,
    )
    .await;
    assert_eq!(first_error_code(&json), Some("UNAUTHORIZED"));
}
