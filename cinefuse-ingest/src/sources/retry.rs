//! Retry policy for source fetches
//!
//! **Algorithm:**
//! 1. Attempt the fetch
//! 2. `NotFound`: drop the record immediately
//! 3. `Transient`: if attempts remain, sleep `base_delay * n^2` (capped) and retry;
//!    otherwise drop with `RetriesExhausted`
//! 4. `RateLimited`: sleep the catalog's `Retry-After`, or an escalating penalty,
//!    and retry without spending an attempt
//! 5. `Fatal`: abort the run

use super::{FetchError, SourceAdapter};
use crate::config::RetryConfig;
use crate::error::{DropReason, PipelineError, Result, Verdict};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Rate-limit responses tolerated for a single id before giving up on it
const MAX_RATE_LIMITED: u32 = 20;

/// Delay before retrying after `attempt` failed attempts
pub fn backoff_delay(policy: &RetryConfig, attempt: u32) -> Duration {
    let n = u64::from(attempt);
    let ms = policy
        .base_delay_ms
        .saturating_mul(n.saturating_mul(n))
        .min(policy.max_delay_ms);
    Duration::from_millis(ms)
}

/// Delay after the `hits`-th consecutive rate-limit response
pub fn rate_limit_delay(policy: &RetryConfig, hits: u32, retry_after: Option<Duration>) -> Duration {
    let escalated = policy
        .rate_limit_penalty_ms
        .saturating_mul(u64::from(hits))
        .min(policy.max_delay_ms);
    retry_after
        .unwrap_or_default()
        .max(Duration::from_millis(escalated))
}

/// Fetch `id` from `adapter` under `policy`.
///
/// # Returns
/// * `Ok(Ok(record))` on success
/// * `Ok(Err(reason))` when the record should be dropped
///
/// # Errors
/// Returns `PipelineError::Source` when the adapter reports a fatal failure.
pub async fn fetch_with_retry<A>(
    adapter: &A,
    id: &str,
    policy: &RetryConfig,
) -> Result<Verdict<A::Record>>
where
    A: SourceAdapter + ?Sized,
{
    let start_time = Instant::now();
    let mut attempt = 0u32;
    let mut rate_limited = 0u32;

    loop {
        attempt += 1;

        let err = match adapter.fetch_by_id(id).await {
            Ok(record) => {
                if attempt > 1 || rate_limited > 0 {
                    debug!(
                        source = adapter.name(),
                        id,
                        attempt,
                        elapsed_ms = start_time.elapsed().as_millis() as u64,
                        "Fetch succeeded after retry"
                    );
                }
                return Ok(Ok(record));
            }
            Err(err) => err,
        };

        let delay = match err {
            FetchError::NotFound => {
                debug!(source = adapter.name(), id, "Not found");
                return Ok(Err(DropReason::NotFound));
            }
            FetchError::Rejected(message) => {
                debug!(source = adapter.name(), id, %message, "Rejected by catalog");
                return Ok(Err(DropReason::Rejected));
            }
            FetchError::Fatal(message) => {
                tracing::error!(source = adapter.name(), id, %message, "Fatal source failure");
                return Err(PipelineError::Source {
                    source_name: adapter.name(),
                    message,
                });
            }
            FetchError::RateLimited { retry_after } => {
                // Throttling is the catalog's problem, not this record's
                attempt -= 1;
                rate_limited += 1;
                if rate_limited > MAX_RATE_LIMITED {
                    warn!(source = adapter.name(), id, rate_limited, "Still rate limited, dropping");
                    return Ok(Err(DropReason::RetriesExhausted));
                }
                rate_limit_delay(policy, rate_limited, retry_after)
            }
            FetchError::Transient(message) => {
                if attempt >= policy.max_attempts {
                    warn!(
                        source = adapter.name(),
                        id,
                        attempt,
                        %message,
                        "Fetch failed: retries exhausted"
                    );
                    return Ok(Err(DropReason::RetriesExhausted));
                }
                warn!(source = adapter.name(), id, attempt, %message, "Transient fetch failure");
                backoff_delay(policy, attempt)
            }
        };

        debug!(
            source = adapter.name(),
            id,
            attempt,
            backoff_ms = delay.as_millis() as u64,
            "Backing off"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_quadratic_and_capped() {
        let policy = RetryConfig {
            max_attempts: 10,
            base_delay_ms: 1000,
            max_delay_ms: 60_000,
            rate_limit_penalty_ms: 10_000,
        };
        assert_eq!(backoff_delay(&policy, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(&policy, 2), Duration::from_millis(4000));
        assert_eq!(backoff_delay(&policy, 3), Duration::from_millis(9000));
        assert_eq!(backoff_delay(&policy, 100), Duration::from_millis(60_000));
    }

    #[test]
    fn test_rate_limit_delay_prefers_longer() {
        let policy = RetryConfig::default();
        assert_eq!(rate_limit_delay(&policy, 1, None), Duration::from_secs(10));
        assert_eq!(rate_limit_delay(&policy, 2, None), Duration::from_secs(20));
        assert_eq!(
            rate_limit_delay(&policy, 1, Some(Duration::from_secs(30))),
            Duration::from_secs(30)
        );
        assert_eq!(rate_limit_delay(&policy, 100, None), Duration::from_secs(60));
    }
}
