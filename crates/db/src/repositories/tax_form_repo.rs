//! Repository for the `tax_forms` table.

use cgk_core::tax_form::{TAX_FORM_APPROVED, TAX_FORM_REJECTED, TAX_FORM_SUBMITTED};
use cgk_core::types::DbId;
use sqlx::PgPool;

use crate::models::tax_form::{NewTaxForm, TaxForm};

const COLUMNS: &str = "id, tenant_slug, creator_id, form_type, tax_year, legal_name, tin_type, \
                        tin_last4, tin_hash, status, rejection_reason, reviewed_by, reviewed_at, \
                        created_at, updated_at";

/// Provides submission and review operations for creator tax forms.
pub struct TaxFormRepo;

impl TaxFormRepo {
    pub async fn create(
        pool: &PgPool,
        tenant_slug: &str,
        input: &NewTaxForm,
    ) -> Result<TaxForm, sqlx::Error> {
        let query = format!(
            "INSERT INTO tax_forms
                (tenant_slug, creator_id, form_type, tax_year, legal_name, tin_type, tin_last4, tin_hash)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaxForm>(&query)
            .bind(tenant_slug)
            .bind(input.creator_id)
            .bind(&input.form_type)
            .bind(input.tax_year)
            .bind(&input.legal_name)
            .bind(&input.tin_type)
            .bind(&input.tin_last4)
            .bind(&input.tin_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<TaxForm>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tax_forms WHERE tenant_slug = $1 AND id = $2");
        sqlx::query_as::<_, TaxForm>(&query)
            .bind(tenant_slug)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List forms, optionally for one creator and/or status, most recent
    /// tax year first.
    pub async fn list(
        pool: &PgPool,
        tenant_slug: &str,
        creator_id: Option<DbId>,
        status: Option<&str>,
    ) -> Result<Vec<TaxForm>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tax_forms
             WHERE tenant_slug = $1
               AND ($2::BIGINT IS NULL OR creator_id = $2)
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY tax_year DESC, created_at DESC"
        );
        sqlx::query_as::<_, TaxForm>(&query)
            .bind(tenant_slug)
            .bind(creator_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    pub async fn approve(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        reviewer_id: DbId,
    ) -> Result<Option<TaxForm>, sqlx::Error> {
        let query = format!(
            "UPDATE tax_forms SET
                status = $3, reviewed_by = $4, reviewed_at = NOW(), rejection_reason = NULL
             WHERE tenant_slug = $1 AND id = $2 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaxForm>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(TAX_FORM_APPROVED)
            .bind(reviewer_id)
            .bind(TAX_FORM_SUBMITTED)
            .fetch_optional(pool)
            .await
    }

    pub async fn reject(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        reviewer_id: DbId,
        reason: &str,
    ) -> Result<Option<TaxForm>, sqlx::Error> {
        let query = format!(
            "UPDATE tax_forms SET
                status = $3, reviewed_by = $4, reviewed_at = NOW(), rejection_reason = $6
             WHERE tenant_slug = $1 AND id = $2 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaxForm>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(TAX_FORM_REJECTED)
            .bind(reviewer_id)
            .bind(TAX_FORM_SUBMITTED)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// Replace the identity fields of a rejected form and put it back in
    /// the review queue.
    pub async fn resubmit(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        legal_name: Option<&str>,
        tin_type: &str,
        tin_last4: Option<&str>,
        tin_hash: Option<&str>,
    ) -> Result<Option<TaxForm>, sqlx::Error> {
        let query = format!(
            "UPDATE tax_forms SET
                status = $3,
                legal_name = COALESCE($5, legal_name),
                tin_type = $6, tin_last4 = $7, tin_hash = $8,
                rejection_reason = NULL, reviewed_by = NULL, reviewed_at = NULL
             WHERE tenant_slug = $1 AND id = $2 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaxForm>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(TAX_FORM_SUBMITTED)
            .bind(TAX_FORM_REJECTED)
            .bind(legal_name)
            .bind(tin_type)
            .bind(tin_last4)
            .bind(tin_hash)
            .fetch_optional(pool)
            .await
    }
}
