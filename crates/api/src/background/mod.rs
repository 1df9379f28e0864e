//! Background tasks and scheduled jobs.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn`. All tasks accept a [`CancellationToken`]
//! for graceful shutdown. Each tick goes through [`run_with_backoff`], so a
//! transient database failure is retried before the job gives up until the
//! next tick.

pub mod familiarity_decay;
pub mod session_cleanup;

use std::fmt::Display;
use std::future::Future;

use cgk_core::backoff::{self, BackoffConfig};
use tokio_util::sync::CancellationToken;

/// Run `op` until it succeeds, sleeping between attempts per `config`.
///
/// Returns `None` when every attempt failed or `cancel` fired first.
pub async fn run_with_backoff<T, E, F, Fut>(
    job: &'static str,
    config: &BackoffConfig,
    cancel: &CancellationToken,
    mut op: F,
) -> Option<T>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delays = backoff::schedule(config).into_iter();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let result = tokio::select! {
            _ = cancel.cancelled() => return None,
            result = op() => result,
        };
        let error = match result {
            Ok(value) => return Some(value),
            Err(e) => e,
        };

        let Some(delay) = delays.next() else {
            tracing::error!(job, attempt, error = %error, "Giving up until the next tick");
            return None;
        };
        tracing::warn!(
            job,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Attempt failed, retrying"
        );

        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;

    fn fast() -> BackoffConfig {
        BackoffConfig {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            multiplier: 2.0,
            max_attempts: 3,
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = run_with_backoff("test", &fast(), &CancellationToken::new(), || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err("transient")
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result, Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Option<()> =
            run_with_backoff("test", &fast(), &CancellationToken::new(), || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("down")
            })
            .await;
        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cancelled_token_stops_immediately() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Option<()> = run_with_backoff("test", &fast(), &cancel, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err("down")
        })
        .await;
        assert_eq!(result, None);
        assert!(calls.load(Ordering::SeqCst) <= 1);
    }
}
