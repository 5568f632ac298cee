//! Token-bucket limiter per catalog
//!
//! `limit` requests per `interval`: one token is replenished every
//! `interval / limit`, and up to `limit` tokens may be spent in a burst.

use crate::config::RateLimit;
use crate::error::{PipelineError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;

pub type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Build a limiter for `limit`.
///
/// # Errors
/// Returns `PipelineError::Config` for a zero limit or zero interval.
pub fn build_limiter(limit: RateLimit) -> Result<DirectLimiter> {
    let burst = NonZeroU32::new(limit.limit).ok_or_else(|| {
        PipelineError::Config("rate limit must allow at least one request".to_string())
    })?;

    let period = limit.interval() / limit.limit;
    let quota = Quota::with_period(period)
        .ok_or_else(|| {
            PipelineError::Config(format!(
                "rate limit interval too small: {} requests per {} ms",
                limit.limit, limit.interval_ms
            ))
        })?
        .allow_burst(burst);

    Ok(RateLimiter::direct(quota))
}
