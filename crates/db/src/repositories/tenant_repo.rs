//! Repository for the `tenants` table.

use sqlx::PgPool;

use crate::models::tenant::{CreateTenant, Tenant, UpdateTenant};

const COLUMNS: &str = "id, slug, name, status, created_at, updated_at";

/// Provides CRUD operations for tenants. Tenants are keyed by slug.
pub struct TenantRepo;

impl TenantRepo {
    pub async fn create(pool: &PgPool, input: &CreateTenant) -> Result<Tenant, sqlx::Error> {
        let query = format!(
            "INSERT INTO tenants (slug, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(&input.slug)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE slug = $1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all tenants alphabetically by slug.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants ORDER BY slug ASC");
        sqlx::query_as::<_, Tenant>(&query).fetch_all(pool).await
    }

    /// Update name and/or status. Returns `None` if the slug is unknown.
    pub async fn update(
        pool: &PgPool,
        slug: &str,
        input: &UpdateTenant,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!(
            "UPDATE tenants SET
                name = COALESCE($2, name),
                status = COALESCE($3, status)
             WHERE slug = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(slug)
            .bind(&input.name)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }
}
