//! Periodic purge of expired and revoked login sessions.

use std::time::Duration;

use cgk_core::backoff::BackoffConfig;
use cgk_db::repositories::SessionRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use super::run_with_backoff;

/// Run the cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Session cleanup job started"
    );

    let backoff = BackoffConfig::default();
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                let deleted = run_with_backoff("session_cleanup", &backoff, &cancel, || {
                    SessionRepo::cleanup_expired(&pool)
                })
                .await;
                match deleted {
                    Some(0) => tracing::debug!("Session cleanup: nothing to purge"),
                    Some(deleted) => tracing::info!(deleted, "Session cleanup: purged sessions"),
                    None => {}
                }
            }
        }
    }
}
