//! Repository for the `draw_requests` table.

use cgk_core::draw_request::{DRAW_APPROVED, DRAW_CANCELLED, DRAW_PAID, DRAW_PENDING};
use cgk_core::types::{Cents, DbId};
use sqlx::PgPool;

use crate::models::draw_request::DrawRequest;

const COLUMNS: &str = "id, tenant_slug, contractor_id, amount_cents, description, status, \
                        reviewed_by, reviewed_at, review_note, paid_at, created_at, updated_at";

/// Provides creation, listing and review transitions for draw requests.
pub struct DrawRequestRepo;

impl DrawRequestRepo {
    pub async fn create(
        pool: &PgPool,
        tenant_slug: &str,
        contractor_id: DbId,
        amount_cents: Cents,
        description: Option<&str>,
    ) -> Result<DrawRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO draw_requests (tenant_slug, contractor_id, amount_cents, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DrawRequest>(&query)
            .bind(tenant_slug)
            .bind(contractor_id)
            .bind(amount_cents)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<DrawRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM draw_requests WHERE tenant_slug = $1 AND id = $2");
        sqlx::query_as::<_, DrawRequest>(&query)
            .bind(tenant_slug)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List draw requests, newest first. `contractor_id` restricts the
    /// list to one contractor's requests.
    pub async fn list(
        pool: &PgPool,
        tenant_slug: &str,
        contractor_id: Option<DbId>,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DrawRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM draw_requests
             WHERE tenant_slug = $1
               AND ($2::BIGINT IS NULL OR contractor_id = $2)
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, DrawRequest>(&query)
            .bind(tenant_slug)
            .bind(contractor_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Record an approve / reject decision on a pending request.
    pub async fn review(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        to: &str,
        reviewer_id: DbId,
        note: Option<&str>,
    ) -> Result<Option<DrawRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE draw_requests SET
                status = $3, reviewed_by = $4, reviewed_at = NOW(), review_note = $5
             WHERE tenant_slug = $1 AND id = $2 AND status = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DrawRequest>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(to)
            .bind(reviewer_id)
            .bind(note)
            .bind(DRAW_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Mark an approved request as paid.
    pub async fn mark_paid(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<DrawRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE draw_requests SET status = $3, paid_at = NOW()
             WHERE tenant_slug = $1 AND id = $2 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DrawRequest>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(DRAW_PAID)
            .bind(DRAW_APPROVED)
            .fetch_optional(pool)
            .await
    }

    /// Cancel a pending request.
    pub async fn cancel(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<DrawRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE draw_requests SET status = $3
             WHERE tenant_slug = $1 AND id = $2 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DrawRequest>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(DRAW_CANCELLED)
            .bind(DRAW_PENDING)
            .fetch_optional(pool)
            .await
    }
}
