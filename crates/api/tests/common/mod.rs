//! Shared helpers for HTTP-level GraphQL integration tests.
//!
//! Tests drive the full router (middleware included) via
//! `tower::ServiceExt::oneshot`, so they exercise the same stack production
//! uses, with a fixed JWT secret for signing test tokens.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use agrireg_api::auth::jwt::JwtConfig;
use agrireg_api::auth::password::hash_password;
use agrireg_api::config::ServerConfig;
use agrireg_api::router::build_app_router;
use agrireg_api::state::AppState;
use agrireg_db::models::user::{CreateUser, User};
use agrireg_db::repositories::UserRepo;

/// JWT secret used for every test app; tests that sign their own payload
/// tokens must use the same value.
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        enable_playground: false,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 30,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router against the given pool, mirroring the
/// construction in `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

/// Create a user account with an Argon2id-hashed password.
pub async fn create_user(pool: &PgPool, username: &str, password: &str, role: &str) -> User {
    let password_hash = hash_password(password).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@registry.test"),
            password_hash,
            full_name: format!("Test {username}"),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// POST a GraphQL request body (`{"query": ..., "variables": ...}`) with an
/// optional bearer token; returns the HTTP status and parsed JSON body.
pub async fn post_graphql(
    app: &Router,
    body: serde_json::Value,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should complete");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).expect("body should be JSON");
    (status, json)
}

/// Log in through the GraphQL API and return the access token.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, json) = post_graphql(
        app,
        serde_json::json!({
            "query": "mutation($u: String!, $p: String!) { \
                login(username: $u, password: $p) { accessToken } }",
            "variables": { "u": username, "p": password },
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["data"]["login"]["accessToken"]
        .as_str()
        .unwrap_or_else(|| panic!("login failed: {json}"))
        .to_string()
}

/// The `extensions.code` of the first GraphQL error, if any.
pub fn first_error_code(json: &serde_json::Value) -> Option<&str> {
    json["errors"][0]["extensions"]["code"].as_str()
}
