//! Bounded retries with exponential backoff
//!
//! Browser and network operations against live sites fail transiently all
//! the time: a click lands mid-animation, a page is still hydrating, a
//! server is briefly slow. [`with_retry`] re-runs such an operation from the
//! top, sleeping `2^attempt` backoff units between attempts.

use crate::CrawlError;
use std::future::Future;
use std::time::Duration;

/// Retry budget for one kind of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total invocations allowed, including the first
    pub max_attempts: u32,

    /// Duration of one backoff unit
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    /// Delay after failed attempt number `attempt` (1-based): `2^attempt` units
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Every delay a fully exhausted run sleeps, in order
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..self.max_attempts).map(|attempt| self.backoff_after(attempt))
    }
}

/// Runs `operation` until it succeeds or the policy is exhausted
///
/// Errors that are not retryable (see [`CrawlError::is_retryable`]) are
/// returned as-is after the attempt that produced them. When every attempt
/// fails, the result is [`CrawlError::OperationExhausted`] carrying the last
/// error. No delay follows the final attempt.
///
/// # Arguments
///
/// * `policy` - Attempt budget and backoff unit
/// * `label` - Operation name used in logs
/// * `operation` - Produces a fresh attempt each time it is called
///
/// # Example
///
/// ```no_run
/// use sitegrove::crawler::{with_retry, RetryPolicy};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), sitegrove::CrawlError> {
/// let policy = RetryPolicy::new(3, Duration::from_secs(1));
/// let value = with_retry(&policy, "fetch", || async { Ok::<_, sitegrove::CrawlError>(42) }).await?;
/// assert_eq!(value, 42);
/// # Ok(())
/// # }
/// ```
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, CrawlError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CrawlError>>,
{
    let mut attempt = 1;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_retryable() {
            tracing::debug!("{} failed without retry: {}", label, err);
            return Err(err);
        }

        if attempt >= policy.max_attempts {
            tracing::debug!("{} exhausted after {} attempts", label, attempt);
            return Err(CrawlError::OperationExhausted {
                attempts: attempt,
                last: Box::new(err),
            });
        }

        let delay = policy.backoff_after(attempt);
        tracing::debug!(
            "{} attempt {}/{} failed: {}; retrying in {:?}",
            label,
            attempt,
            policy.max_attempts,
            err,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
