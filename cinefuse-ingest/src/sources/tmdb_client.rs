//! TMDB client
//!
//! Fetches movie details with videos, images, credits, external ids and
//! keywords appended in one request.
//!
//! # API Reference
//! - Endpoint: `https://api.themoviedb.org/3/movie/{id}`
//! - Auth: API read access token as a bearer token

use super::rate_limiter::{build_limiter, DirectLimiter};
use super::{check_status, FetchError, SourceAdapter, DEFAULT_TIMEOUT, USER_AGENT};
use crate::config::RateLimit;
use crate::error::{PipelineError, Result};
use crate::models::MovieDetails;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

const TMDB_API_URL: &str = "https://api.themoviedb.org/3";

const APPEND_TO_RESPONSE: &str = "videos,images,credits,external_ids,keywords";

pub struct TmdbClient {
    http_client: Client,
    rate_limiter: DirectLimiter,
    bearer_token: String,
    base_url: String,
}

impl TmdbClient {
    /// Create a TMDB client.
    ///
    /// # Errors
    /// Returns `PipelineError::Config` for a bad rate limit or when the HTTP
    /// client cannot be built.
    pub fn new(bearer_token: impl Into<String>, rate_limit: RateLimit) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            rate_limiter: build_limiter(rate_limit)?,
            bearer_token: bearer_token.into(),
            base_url: TMDB_API_URL.to_string(),
        })
    }

    /// Point the client at another API root (a local mirror or proxy)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SourceAdapter for TmdbClient {
    type Record = MovieDetails;

    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn fetch_by_id(&self, id: &str) -> std::result::Result<MovieDetails, FetchError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/movie/{}", self.base_url, id);
        debug!(tmdb_id = id, "Fetching TMDB details");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&[("append_to_response", APPEND_TO_RESPONSE)])
            .send()
            .await?;

        let details = check_status(response)?
            .json::<MovieDetails>()
            .await
            .map_err(|e| FetchError::Transient(format!("Failed to parse TMDB response: {}", e)))?;

        Ok(details)
    }
}
