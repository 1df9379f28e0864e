//! Repository for the `users` table.

use cgk_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tenant_slug, email, display_name, password_hash, role, is_active, \
                        failed_login_count, locked_until, last_login_at, created_at, updated_at";

/// Provides CRUD and login bookkeeping for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (tenant_slug, email, display_name, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.tenant_slug)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user of `tenant_slug` by id. Platform operators never match.
    pub async fn find_in_tenant(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE tenant_slug = $1 AND id = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(tenant_slug)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a login candidate by email (case-insensitive).
    ///
    /// `tenant_slug = None` looks up a platform operator.
    pub async fn find_for_login(
        pool: &PgPool,
        tenant_slug: Option<&str>,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE tenant_slug IS NOT DISTINCT FROM $1 AND lower(email) = lower($2)"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(tenant_slug)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List the users of a tenant, newest first.
    pub async fn list_for_tenant(pool: &PgPool, tenant_slug: &str) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE tenant_slug = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(tenant_slug)
            .fetch_all(pool)
            .await
    }

    /// Increment the failed-login counter.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET failed_login_count = failed_login_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Lock the account until the given instant.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset the failure counter and lock, and stamp `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET failed_login_count = 0, locked_until = NULL, last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
