//! Repository integration tests for the conditional-update workflows.
//!
//! Require a PostgreSQL `DATABASE_URL`; run with `cargo test -- --ignored`.

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use cgk_db::models::ai_agent::{CreateAiAgent, RecordInteraction};
use cgk_db::models::esign::{CreateEsignDocument, CreateSigner};
use cgk_db::models::session::CreateSession;
use cgk_db::models::subscription::NewSubscription;
use cgk_db::models::tenant::CreateTenant;
use cgk_db::models::user::{CreateUser, User};
use cgk_db::models::welcome_call::CreateBooking;
use cgk_db::repositories::esign_repo::SignerAction;
use cgk_db::repositories::{
    AgentRelationshipRepo, AiAgentRepo, BookingRepo, EsignRepo, SessionRepo, SubscriptionRepo,
    TenantRepo, UserRepo,
};
use sqlx::PgPool;

const TENANT: &str = "acme";

async fn seed(pool: &PgPool) -> User {
    TenantRepo::create(
        pool,
        &CreateTenant {
            slug: TENANT.to_string(),
            name: "Acme".to_string(),
        },
    )
    .await
    .unwrap();
    UserRepo::create(
        pool,
        &CreateUser {
            tenant_slug: Some(TENANT.to_string()),
            email: "admin@acme.test".to_string(),
            display_name: "Admin".to_string(),
            password_hash: "x".to_string(),
            role: "admin".to_string(),
        },
    )
    .await
    .unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn subscription_updates_are_guarded_by_status(pool: PgPool) {
    seed(&pool).await;
    let sub = SubscriptionRepo::create(
        &pool,
        TENANT,
        &NewSubscription {
            customer_email: "buyer@example.com".to_string(),
            product_ref: "coffee".to_string(),
            quantity: 1,
            frequency: "monthly".to_string(),
            next_billing_date: date(2026, 7, 1),
        },
    )
    .await
    .unwrap();

    let skipped = SubscriptionRepo::skip(&pool, TENANT, sub.id, date(2026, 7, 1), date(2026, 7, 31))
        .await
        .unwrap()
        .expect("active subscription can be skipped");
    assert_eq!(skipped.next_billing_date, date(2026, 7, 31));
    assert_eq!(skipped.skipped_count, 1);

    // A stale expected date loses the race.
    assert!(
        SubscriptionRepo::skip(&pool, TENANT, sub.id, date(2026, 7, 1), date(2026, 7, 31))
            .await
            .unwrap()
            .is_none()
    );

    let paused = SubscriptionRepo::pause(&pool, TENANT, sub.id).await.unwrap().unwrap();
    assert_eq!(paused.status, "paused");
    assert!(paused.paused_at.is_some());
    assert!(SubscriptionRepo::pause(&pool, TENANT, sub.id).await.unwrap().is_none());

    let due = SubscriptionRepo::list_due(&pool, TENANT, date(2026, 12, 31)).await.unwrap();
    assert!(due.is_empty(), "paused subscriptions are never due");

    let cancelled = SubscriptionRepo::cancel(&pool, TENANT, sub.id, Some("moving"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, "cancelled");
    assert!(SubscriptionRepo::resume(&pool, TENANT, sub.id, date(2026, 7, 31), date(2026, 8, 1))
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn sequential_signing_completes_document(pool: PgPool) {
    let admin = seed(&pool).await;
    let created = EsignRepo::create(
        &pool,
        TENANT,
        admin.id,
        &CreateEsignDocument {
            title: "Agreement".to_string(),
            document_url: "https://files.example.com/a.pdf".to_string(),
            message: None,
            signers: vec![
                CreateSigner {
                    name: "First".to_string(),
                    email: "first@example.com".to_string(),
                    signing_order: Some(1),
                },
                CreateSigner {
                    name: "Second".to_string(),
                    email: "second@example.com".to_string(),
                    signing_order: Some(2),
                },
            ],
        },
        None,
    )
    .await
    .unwrap();
    let first = created.signers[0].access_token;
    let second = created.signers[1].access_token;

    let early = EsignRepo::sign(&pool, second, "Second", None).await.unwrap();
    assert_matches!(early, SignerAction::OutOfOrder(_));

    let after_first = EsignRepo::sign(&pool, first, "First", None).await.unwrap();
    assert_matches!(after_first, SignerAction::Done(s) if s.document.status == "in_progress");

    let again = EsignRepo::sign(&pool, first, "First", None).await.unwrap();
    assert_matches!(again, SignerAction::SignerClosed { .. });

    let done = EsignRepo::sign(&pool, second, "Second", None).await.unwrap();
    assert_matches!(done, SignerAction::Done(s) if s.document.status == "completed");

    let actions: Vec<String> = EsignRepo::list_audit(&pool, TENANT, created.document.id)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.action)
        .collect();
    assert_eq!(actions, vec!["created", "signed", "signed", "completed"]);

    let unknown = EsignRepo::open(&pool, uuid::Uuid::new_v4(), None).await.unwrap();
    assert_matches!(unknown, SignerAction::UnknownToken);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn interactions_upsert_one_relationship(pool: PgPool) {
    seed(&pool).await;
    let agent = AiAgentRepo::create(
        &pool,
        TENANT,
        &CreateAiAgent {
            name: "Ada".to_string(),
            persona: None,
        },
    )
    .await
    .unwrap();
    let interaction = RecordInteraction {
        person_type: "creator".to_string(),
        person_ref: "creator-7".to_string(),
        duration_minutes: 10.0,
        notes: None,
    };

    let first = AgentRelationshipRepo::record_interaction(&pool, TENANT, agent.id, &interaction)
        .await
        .unwrap();
    let second = AgentRelationshipRepo::record_interaction(&pool, TENANT, agent.id, &interaction)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.interaction_count, 2);
    assert!((second.total_conversation_minutes - 20.0).abs() < 1e-9);
    assert!(second.familiarity_score > first.familiarity_score);
    assert!(second.familiarity_score <= 1.0);

    // Scores were just computed, so a decay pass right away changes little
    // or nothing and never fails.
    AgentRelationshipRepo::decay_all(&pool).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn booking_is_refused_when_check_fails(pool: PgPool) {
    let host = seed(&pool).await;
    let starts_at = Utc.with_ymd_and_hms(2030, 6, 3, 9, 0, 0).unwrap();
    let input = CreateBooking {
        host_user_id: host.id,
        creator_id: None,
        attendee_name: "Jo".to_string(),
        attendee_email: "jo@example.com".to_string(),
        starts_at,
        notes: None,
    };
    let ends_at = starts_at + Duration::minutes(30);
    let window = (starts_at - Duration::hours(1), ends_at + Duration::hours(1));

    let booked = BookingRepo::create_if_free(&pool, TENANT, &input, ends_at, window, |existing| {
        existing.is_empty()
    })
    .await
    .unwrap()
    .expect("empty schedule accepts the booking");
    assert_eq!(booked.status, "scheduled");

    let refused = BookingRepo::create_if_free(&pool, TENANT, &input, ends_at, window, |existing| {
        existing.is_empty()
    })
    .await
    .unwrap();
    assert!(refused.is_none());

    assert!(BookingRepo::complete(&pool, TENANT, booked.id).await.unwrap().is_some());
    assert!(BookingRepo::cancel(&pool, TENANT, booked.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn session_rotation_and_cleanup(pool: PgPool) {
    let user = seed(&pool).await;
    let live = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "live-hash".to_string(),
            expires_at: Utc::now() + Duration::days(7),
            user_agent: None,
        },
    )
    .await
    .unwrap();
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "expired-hash".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
            user_agent: None,
        },
    )
    .await
    .unwrap();

    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "expired-hash")
        .await
        .unwrap()
        .is_none());
    assert!(SessionRepo::revoke(&pool, live.id).await.unwrap());
    assert!(!SessionRepo::revoke(&pool, live.id).await.unwrap(), "revoking twice is refused");

    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn resume_loses_to_a_concurrent_reschedule(pool: PgPool) {
    seed(&pool).await;
    let sub = SubscriptionRepo::create(
        &pool,
        TENANT,
        &NewSubscription {
            customer_email: "buyer@example.com".to_string(),
            product_ref: "tea".to_string(),
            quantity: 2,
            frequency: "weekly".to_string(),
            next_billing_date: date(2026, 7, 1),
        },
    )
    .await
    .unwrap();
    SubscriptionRepo::pause(&pool, TENANT, sub.id).await.unwrap().unwrap();

    // Rescheduled after the resume date was computed from 2026-07-01.
    SubscriptionRepo::reschedule(&pool, TENANT, sub.id, date(2026, 9, 1))
        .await
        .unwrap()
        .unwrap();
    assert!(
        SubscriptionRepo::resume(&pool, TENANT, sub.id, date(2026, 7, 1), date(2026, 7, 8))
            .await
            .unwrap()
            .is_none()
    );

    let resumed =
        SubscriptionRepo::resume(&pool, TENANT, sub.id, date(2026, 9, 1), date(2026, 9, 1))
            .await
            .unwrap()
            .expect("resume with the current date succeeds");
    assert_eq!(resumed.status, "active");
    assert_eq!(resumed.next_billing_date, date(2026, 9, 1));
    assert!(resumed.paused_at.is_none());
}
