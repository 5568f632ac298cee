//! External catalog adapters
//!
//! # Architecture
//! Every remote catalog sits behind [`SourceAdapter`]. An adapter owns its
//! HTTP client, its request timeout and its token-bucket limiter
//! ([`rate_limiter`]); the worker pool size never changes the request rate.
//! The retry policy lives outside the adapters in [`retry`], so an adapter
//! only has to classify each failure as a [`FetchError`].
//!
//! Bulk dumps (the IMDB ratings TSV) are read by plain loaders instead.

pub mod imdb_ratings;
pub mod omdb_client;
pub mod rate_limiter;
pub mod retry;
pub mod tmdb_client;

pub use omdb_client::OmdbClient;
pub use retry::fetch_with_retry;
pub use tmdb_client::TmdbClient;

use async_trait::async_trait;
use reqwest::{header, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// User agent sent to every catalog
pub const USER_AGENT: &str = concat!("cinefuse/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout used by the HTTP adapters
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of a single fetch, as classified by the adapter
#[derive(Debug, Error)]
pub enum FetchError {
    /// The catalog has no record for this id (never retried)
    #[error("not found")]
    NotFound,

    /// Network failure, 5xx or unparseable body (retried)
    #[error("transient failure: {0}")]
    Transient(String),

    /// The catalog asked us to slow down (retried with a longer backoff)
    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },

    /// The catalog refused this id (malformed, removed). Dropped, not retried
    #[error("rejected: {0}")]
    Rejected(String),

    /// Bad credentials; every further request would fail the same way
    #[error("fatal failure: {0}")]
    Fatal(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transient(err.to_string())
    }
}

/// A remote catalog that can be queried by id
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Record shape returned by the catalog
    type Record: Send;

    /// Catalog name for logs and errors
    fn name(&self) -> &'static str;

    /// Fetch one record.
    ///
    /// Implementations must wait on their limiter before each request.
    async fn fetch_by_id(&self, id: &str) -> Result<Self::Record, FetchError>;
}

/// Map a non-success HTTP status to a [`FetchError`].
///
/// Returns the response untouched when the status is a success.
pub(crate) fn check_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(status_error(status, retry_after(&response)))
}

/// Classify a non-success status.
///
/// Only credential failures abort the run; anything else the catalog
/// refuses is a per-record drop.
pub(crate) fn status_error(status: StatusCode, retry_after: Option<Duration>) -> FetchError {
    match status {
        StatusCode::NOT_FOUND => FetchError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited { retry_after },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FetchError::Fatal(format!("HTTP {}", status))
        }
        s if s.is_server_error() => FetchError::Transient(format!("HTTP {}", s)),
        s => FetchError::Rejected(format!("HTTP {}", s)),
    }
}

/// `Retry-After` in seconds, when present
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
