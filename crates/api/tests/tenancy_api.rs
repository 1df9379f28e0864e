//! Authentication, tenant resolution and role checks at the HTTP layer.
//!
//! Every request here is rejected by an extractor before a handler touches
//! the database, so the app runs on a lazily-connected pool.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{admin_token, body_json, get, get_auth, send, super_admin_token, token, TEST_TENANT};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn missing_token_is_401() {
    let response = get(common::app(), "/api/v1/creators").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn malformed_authorization_header_is_401() {
    let request = Request::builder()
        .uri("/api/v1/creators")
        .header("authorization", "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = common::app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_401() {
    let config = cgk_api::auth::jwt::JwtConfig {
        secret: "some-other-secret".into(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 7,
    };
    let forged =
        cgk_api::auth::jwt::generate_access_token(1, "admin", Some(TEST_TENANT), &config).unwrap();

    let response = get_auth(common::app(), "/api/v1/creators", &forged).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tenant_user_cannot_select_another_tenant() {
    let response = send(
        common::app(),
        Method::GET,
        "/api/v1/creators",
        Some(&admin_token()),
        Some("globex"),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn platform_operator_must_name_a_tenant() {
    let response = get_auth(common::app(), "/api/v1/creators", &super_admin_token()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn platform_operator_tenant_header_must_be_a_valid_slug() {
    let response = send(
        common::app(),
        Method::GET,
        "/api/v1/creators",
        Some(&super_admin_token()),
        Some("Not A Slug"),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn token_without_tenant_for_non_operator_is_403() {
    let orphan = token(5, "admin", None);
    let response = send(
        common::app(),
        Method::GET,
        "/api/v1/creators",
        Some(&orphan),
        Some(TEST_TENANT),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_admin_cannot_use_admin_routes() {
    let contractor = token(7, "contractor", Some(TEST_TENANT));
    let response = send(
        common::app(),
        Method::POST,
        "/api/v1/subscriptions",
        Some(&contractor),
        None,
        Some(json!({
            "customer_email": "a@example.com",
            "product_ref": "coffee",
            "frequency": "monthly"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn tenant_admin_cannot_manage_tenants() {
    let response = get_auth(common::app(), "/api/v1/platform/tenants", &admin_token()).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn creators_cannot_file_draw_requests() {
    let creator = token(8, "creator", Some(TEST_TENANT));
    let response = send(
        common::app(),
        Method::POST,
        "/api/v1/draw-requests",
        Some(&creator),
        None,
        Some(json!({ "amount_cents": 5000 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_requires_authentication() {
    let response = send(common::app(), Method::POST, "/api/v1/auth/logout", None, None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
