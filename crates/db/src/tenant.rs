//! Tenant-scoped database context.
//!
//! Every tenant-owned table carries a `tenant_slug` column and every
//! repository query filters on it. Multi-statement writes additionally run
//! inside [`begin`], which opens a transaction and publishes the tenant as
//! the transaction-local setting `app.tenant_slug` so triggers, policies and
//! ad-hoc audit queries can see which tenant the statements belong to.

use sqlx::{PgPool, Postgres, Transaction};

/// Name of the transaction-local setting that carries the tenant slug.
pub const TENANT_SETTING: &str = "app.tenant_slug";

/// Open a transaction bound to `tenant_slug`.
///
/// The setting is cleared automatically when the transaction commits or
/// rolls back.
pub async fn begin(
    pool: &PgPool,
    tenant_slug: &str,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT set_config($1, $2, true)")
        .bind(TENANT_SETTING)
        .bind(tenant_slug)
        .execute(&mut *tx)
        .await?;
    tracing::trace!(tenant = tenant_slug, "Opened tenant-scoped transaction");
    Ok(tx)
}

/// Read back the tenant bound to the current transaction, if any.
pub async fn current(tx: &mut Transaction<'_, Postgres>) -> Result<Option<String>, sqlx::Error> {
    let value: Option<String> = sqlx::query_scalar("SELECT NULLIF(current_setting($1, true), '')")
        .bind(TENANT_SETTING)
        .fetch_one(&mut **tx)
        .await?;
    Ok(value)
}
