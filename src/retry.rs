//! Bounded retry with randomized backoff
//!
//! The first attempt runs immediately. Every later attempt waits a delay drawn
//! uniformly from `0..=max_backoff`, which spreads retries from concurrent workers
//! apart instead of letting them hit the target in lockstep.
//!
//! # Example
//!
//! ```no_run
//! use page_harvester::retry::{IsRetryable, fetch_with_retry};
//! use page_harvester::config::RetryConfig;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     Transient,
//!     Permanent,
//! }
//!
//! impl std::fmt::Display for MyError {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "{self:?}")
//!     }
//! }
//!
//! impl IsRetryable for MyError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, MyError::Transient)
//!     }
//! }
//!
//! # async fn example() -> Result<(), MyError> {
//! let config = RetryConfig::default();
//! let result = fetch_with_retry(&config, |_attempt| async {
//!     Ok::<_, MyError>(())
//! }).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::RetryConfig;
use crate::error::Error;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
///
/// Transport failures (connection refused, reset, timeout) should return `true`.
/// Storage failures, bad input and a halted run should return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Any transport-level failure consumes one attempt and is tried again
            Error::Transport { .. } => true,
            Error::Config { .. }
            | Error::InvalidUrl { .. }
            | Error::Storage { .. }
            | Error::Selector { .. }
            | Error::Pattern(_)
            | Error::Serialization(_)
            | Error::Halted
            | Error::Worker(_) => false,
        }
    }
}

/// Run `operation` until it succeeds, fails permanently, or `max_retries` attempts are used
///
/// `operation` receives the 1-based attempt number. On exhaustion the last error is
/// returned.
pub async fn fetch_with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let max_attempts = config.max_retries.max(1);
    let mut attempt = 1;

    loop {
        if attempt > 1 {
            tokio::time::sleep(random_backoff(config.max_backoff)).await;
        }

        match operation(attempt).await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::debug!(attempts = attempt, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                tracing::debug!(
                    error = %e,
                    attempt,
                    max_attempts,
                    "attempt failed, retrying"
                );
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::debug!(
                        error = %e,
                        attempts = attempt,
                        "operation failed after all attempts exhausted"
                    );
                }
                return Err(e);
            }
        }
    }
}

/// Pick a delay uniformly from `0..=max`, at millisecond granularity
fn random_backoff(max: Duration) -> Duration {
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return Duration::ZERO;
    }
    let mut rng = rand::thread_rng();
    Duration::from_millis(rng.gen_range(0..=max_ms))
}
