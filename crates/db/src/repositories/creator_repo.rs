//! Repository for the `creators` table.

use cgk_core::creator::CREATOR_PENDING;
use cgk_core::types::DbId;
use sqlx::PgPool;

use crate::models::creator::{CreateCreator, Creator, UpdateCreator};

const COLUMNS: &str = "id, tenant_slug, user_id, name, email, status, commission_percent, \
                        created_at, updated_at";

/// Provides CRUD operations for creators. Deletes are soft.
pub struct CreatorRepo;

impl CreatorRepo {
    pub async fn create(
        pool: &PgPool,
        tenant_slug: &str,
        input: &CreateCreator,
    ) -> Result<Creator, sqlx::Error> {
        let query = format!(
            "INSERT INTO creators (tenant_slug, user_id, name, email, status, commission_percent)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Creator>(&query)
            .bind(tenant_slug)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.status.as_deref().unwrap_or(CREATOR_PENDING))
            .bind(input.commission_percent.unwrap_or(0))
            .fetch_one(pool)
            .await
    }

    /// Find a live creator by id. Soft-deleted rows are excluded.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<Creator>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM creators
             WHERE tenant_slug = $1 AND id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Creator>(&query)
            .bind(tenant_slug)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List live creators, optionally filtered by status, newest first.
    pub async fn list(
        pool: &PgPool,
        tenant_slug: &str,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Creator>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM creators
             WHERE tenant_slug = $1 AND deleted_at IS NULL
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Creator>(&query)
            .bind(tenant_slug)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a creator. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        input: &UpdateCreator,
    ) -> Result<Option<Creator>, sqlx::Error> {
        let query = format!(
            "UPDATE creators SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                status = COALESCE($5, status),
                commission_percent = COALESCE($6, commission_percent)
             WHERE tenant_slug = $1 AND id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Creator>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.status)
            .bind(input.commission_percent)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a creator. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, tenant_slug: &str, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE creators SET deleted_at = NOW()
             WHERE tenant_slug = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_slug)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
