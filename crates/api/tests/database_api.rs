//! HTTP tests that need a real database.
//!
//! Require a PostgreSQL `DATABASE_URL`; run with `cargo test -- --ignored`.

mod common;

use axum::http::StatusCode;
use cgk_api::auth::password::hash_password;
use cgk_db::models::creator::CreateCreator;
use cgk_db::models::tenant::CreateTenant;
use cgk_db::models::user::{CreateUser, User};
use cgk_db::repositories::{CreatorRepo, TenantRepo, UserRepo};
use common::{body_json, build_test_app, post_json, post_json_auth, token};
use serde_json::json;
use sqlx::PgPool;

const PASSWORD: &str = "correct-horse-battery";

async fn seed_tenant_admin(pool: &PgPool, slug: &str) -> User {
    TenantRepo::create(
        pool,
        &CreateTenant {
            slug: slug.to_string(),
            name: format!("Tenant {slug}"),
        },
    )
    .await
    .unwrap();
    UserRepo::create(
        pool,
        &CreateUser {
            tenant_slug: Some(slug.to_string()),
            email: format!("admin@{slug}.test"),
            display_name: "Admin".to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            role: "admin".to_string(),
        },
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn booking_rejects_creator_of_another_tenant(pool: PgPool) {
    let admin = seed_tenant_admin(&pool, "acme").await;
    seed_tenant_admin(&pool, "other").await;
    let foreign = CreatorRepo::create(
        &pool,
        "other",
        &CreateCreator {
            user_id: None,
            name: "Foreign Creator".to_string(),
            email: "foreign@other.test".to_string(),
            status: None,
            commission_percent: None,
        },
    )
    .await
    .unwrap();

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/welcome-calls/bookings",
        &token(admin.id, "admin", Some("acme")),
        json!({
            "host_user_id": admin.id,
            "creator_id": foreign.id,
            "attendee_name": "Jo",
            "attendee_email": "jo@example.com",
            "starts_at": "2030-06-03T09:00:00Z"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn creator_cannot_link_user_of_another_tenant(pool: PgPool) {
    let admin = seed_tenant_admin(&pool, "acme").await;
    let foreign_user = seed_tenant_admin(&pool, "other").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/creators",
        &token(admin.id, "admin", Some("acme")),
        json!({
            "user_id": foreign_user.id,
            "name": "Jo Creator",
            "email": "jo@acme.test"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(CreatorRepo::list(&pool, "acme", None, 50, 0)
        .await
        .unwrap()
        .is_empty());

    // Linking a user of the caller's own tenant still works.
    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/creators",
        &token(admin.id, "admin", Some("acme")),
        json!({
            "user_id": admin.id,
            "name": "Jo Creator",
            "email": "jo@acme.test"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user_id"], admin.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn five_failed_logins_lock_the_account(pool: PgPool) {
    seed_tenant_admin(&pool, "acme").await;
    let attempt = |password: &'static str| {
        let pool = pool.clone();
        async move {
            post_json(
                build_test_app(pool),
                "/api/v1/auth/login",
                json!({
                    "tenant_slug": "acme",
                    "email": "admin@acme.test",
                    "password": password
                }),
            )
            .await
            .status()
        }
    };

    for _ in 0..5 {
        assert_eq!(attempt("wrong-password-123").await, StatusCode::UNAUTHORIZED);
    }

    // The correct password is refused while the lock holds.
    assert_eq!(attempt(PASSWORD).await, StatusCode::FORBIDDEN);

    let user = UserRepo::find_for_login(&pool, Some("acme"), "admin@acme.test")
        .await
        .unwrap()
        .unwrap();
    assert!(user.locked_until.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn four_failures_then_success_resets_the_counter(pool: PgPool) {
    seed_tenant_admin(&pool, "acme").await;
    let body = |password: &str| {
        json!({
            "tenant_slug": "acme",
            "email": "admin@acme.test",
            "password": password
        })
    };

    for _ in 0..4 {
        let response =
            post_json(build_test_app(pool.clone()), "/api/v1/auth/login", body("nope-nope-nope")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    let response = post_json(build_test_app(pool.clone()), "/api/v1/auth/login", body(PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let user = UserRepo::find_for_login(&pool, Some("acme"), "admin@acme.test")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.failed_login_count, 0);
}
