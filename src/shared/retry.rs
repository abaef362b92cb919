//! Optimistic-update retry
//!
//! Generic compare-and-retry helper for conditional writes against shared
//! records (location capacity, extension merge). The operation reads the
//! current value, attempts a conditional write and reports whether it won;
//! a lost race is retried with backoff, a real error bails immediately.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// Configuration for optimistic retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Maximum delay between retries (cap).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(50),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(1),
        }
    }
}

/// Outcome of a single optimistic attempt.
pub enum Attempt<T> {
    /// The conditional write was applied.
    Won(T),
    /// A concurrent writer got there first; re-read and try again.
    Lost,
}

/// Run `operation` until it wins, errors, or exhausts `config.max_attempts`.
///
/// Returns `Ok(None)` when every attempt lost the race; the caller decides
/// how to surface that (the committer maps it to `CapacityRaceLost`).
pub async fn retry_optimistic<F, Fut, T, E>(
    config: &RetryConfig,
    mut operation: F,
    operation_name: &str,
) -> Result<Option<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Attempt<T>, E>>,
    E: std::fmt::Display,
{
    let mut delay = config.initial_delay;

    for attempt in 1..=config.max_attempts {
        match operation().await {
            Ok(Attempt::Won(value)) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "Won after retry");
                }
                return Ok(Some(value));
            }
            Ok(Attempt::Lost) => {
                if attempt == config.max_attempts {
                    warn!(
                        operation = operation_name,
                        attempts = config.max_attempts,
                        "Optimistic update exhausted retries"
                    );
                    return Ok(None);
                }
                debug!(
                    operation = operation_name,
                    attempt,
                    retry_in_ms = delay.as_millis() as u64,
                    "Lost conditional update, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * config.backoff_multiplier)
                        .min(config.max_delay.as_secs_f64()),
                );
            }
            Err(err) => {
                warn!(
                    operation = operation_name,
                    attempt,
                    error = %err,
                    "Optimistic update failed"
                );
                return Err(err);
            }
        }
    }

    unreachable!("Loop exits via return")
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            backoff_multiplier: 1.0,
            max_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn wins_first_try() {
        let result: Result<Option<i32>, std::convert::Infallible> =
            retry_optimistic(&fast_config(3), || async { Ok(Attempt::Won(42)) }, "test").await;
        assert_eq!(result.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn retries_until_won() {
        let calls = AtomicU32::new(0);
        let result: Result<Option<u32>, std::convert::Infallible> = retry_optimistic(
            &fast_config(5),
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Ok(Attempt::Lost)
                    } else {
                        Ok(Attempt::Won(n))
                    }
                }
            },
            "test",
        )
        .await;
        assert_eq!(result.unwrap(), Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_returns_none() {
        let result: Result<Option<()>, std::convert::Infallible> =
            retry_optimistic(&fast_config(3), || async { Ok(Attempt::Lost) }, "test").await;
        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn error_bails_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<Option<()>, String> = retry_optimistic(
            &fast_config(5),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("boom".to_string()) }
            },
            "test",
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
