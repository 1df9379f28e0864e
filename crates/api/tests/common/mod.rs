#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use cgk_api::auth::jwt::{generate_access_token, JwtConfig};
use cgk_api::config::{JobConfig, ServerConfig};
use cgk_api::router::build_app_router;
use cgk_api::state::AppState;

pub const TEST_TENANT: &str = "acme";

/// Build a test `ServerConfig` with a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-do-not-use-in-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        jobs: JobConfig::default(),
    }
}

/// A pool that never connects until a query runs.
///
/// Requests rejected by extractors or validation never touch it. The short
/// acquire timeout keeps database-dependent paths from hanging when no
/// server is running.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://localhost/cgk_test")
        .expect("lazy pool URL should parse")
}

/// Build the application router exactly as `main.rs` does.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// App backed by [`lazy_pool`].
pub fn app() -> Router {
    build_test_app(lazy_pool())
}

/// Mint an access token signed with the test secret.
pub fn token(user_id: i64, role: &str, tenant: Option<&str>) -> String {
    generate_access_token(user_id, role, tenant, &test_config().jwt)
        .expect("token generation should succeed")
}

pub fn admin_token() -> String {
    token(1, "admin", Some(TEST_TENANT))
}

pub fn super_admin_token() -> String {
    token(99, "super_admin", None)
}

/// Fire a single request at the router.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    tenant_header: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    if let Some(slug) = tenant_header {
        builder = builder.header("x-tenant-slug", slug);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, bearer: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(bearer), None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    bearer: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(bearer), None, Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
