//! Periodic decay of AI agent familiarity scores.
//!
//! The recency term of the score shrinks as time passes without contact,
//! so every relationship is recomputed on a fixed interval with a single
//! `UPDATE` across all tenants.

use std::time::Duration;

use cgk_core::backoff::BackoffConfig;
use cgk_db::repositories::AgentRelationshipRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use super::run_with_backoff;

/// Run the decay loop until `cancel` is triggered.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Familiarity decay job started"
    );

    let backoff = BackoffConfig::default();
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Familiarity decay job stopping");
                break;
            }
            _ = ticker.tick() => {
                let updated = run_with_backoff("familiarity_decay", &backoff, &cancel, || {
                    AgentRelationshipRepo::decay_all(&pool)
                })
                .await;
                match updated {
                    Some(0) => tracing::debug!("Familiarity decay: no scores changed"),
                    Some(updated) => tracing::info!(updated, "Familiarity decay: scores updated"),
                    None => {}
                }
            }
        }
    }
}
