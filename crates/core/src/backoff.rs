//! Exponential backoff schedule for retried background work.

use std::time::Duration;

/// Tunable parameters for the exponential-backoff strategy.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
    /// Total attempts, including the first.
    pub max_attempts: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            max_attempts: 5,
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`BackoffConfig::max_delay`].
pub fn next_delay(current: Duration, config: &BackoffConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// The delays slept between attempts: one fewer than `max_attempts`.
pub fn schedule(config: &BackoffConfig) -> Vec<Duration> {
    let retries = config.max_attempts.saturating_sub(1) as usize;
    std::iter::successors(Some(config.initial_delay.min(config.max_delay)), |d| {
        Some(next_delay(*d, config))
    })
    .take(retries)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_delay_doubles() {
        let config = BackoffConfig::default();
        assert_eq!(
            next_delay(Duration::from_secs(1), &config),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn next_delay_clamps_at_max() {
        let config = BackoffConfig {
            max_delay: Duration::from_secs(10),
            ..Default::default()
        };
        assert_eq!(
            next_delay(Duration::from_secs(8), &config),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn default_schedule() {
        let secs: Vec<u64> = schedule(&BackoffConfig::default())
            .iter()
            .map(Duration::as_secs)
            .collect();
        assert_eq!(secs, vec![1, 2, 4, 8]);
    }

    #[test]
    fn schedule_respects_cap() {
        let config = BackoffConfig {
            max_delay: Duration::from_secs(3),
            max_attempts: 6,
            ..Default::default()
        };
        let secs: Vec<u64> = schedule(&config).iter().map(Duration::as_secs).collect();
        assert_eq!(secs, vec![1, 2, 3, 3, 3]);
    }

    #[test]
    fn single_attempt_never_sleeps() {
        let config = BackoffConfig {
            max_attempts: 1,
            ..Default::default()
        };
        assert!(schedule(&config).is_empty());
    }
}
