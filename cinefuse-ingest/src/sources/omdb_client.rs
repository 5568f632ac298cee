//! OMDB client
//!
//! Looks titles up by imdb id with Rotten Tomatoes fields included.
//! OMDB answers a missing title with HTTP 200 and `"Response": "False"`, and
//! a bad key with 401; the first drops the record, the second ends the run.

use super::rate_limiter::{build_limiter, DirectLimiter};
use super::{check_status, FetchError, SourceAdapter, DEFAULT_TIMEOUT, USER_AGENT};
use crate::config::RateLimit;
use crate::error::{PipelineError, Result};
use crate::models::OmdbMovie;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

const OMDB_API_URL: &str = "https://www.omdbapi.com/";

pub struct OmdbClient {
    http_client: Client,
    rate_limiter: DirectLimiter,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    /// Create an OMDB client.
    ///
    /// # Errors
    /// Returns `PipelineError::Config` for a bad rate limit or when the HTTP
    /// client cannot be built.
    pub fn new(api_key: impl Into<String>, rate_limit: RateLimit) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            rate_limiter: build_limiter(rate_limit)?,
            api_key: api_key.into(),
            base_url: OMDB_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SourceAdapter for OmdbClient {
    type Record = OmdbMovie;

    fn name(&self) -> &'static str {
        "omdb"
    }

    async fn fetch_by_id(&self, id: &str) -> std::result::Result<OmdbMovie, FetchError> {
        self.rate_limiter.until_ready().await;
        debug!(imdb_id = id, "Fetching OMDB record");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("i", id),
                ("plot", "full"),
                ("tomatoes", "true"),
            ])
            .send()
            .await?;

        let movie = check_status(response)?
            .json::<OmdbMovie>()
            .await
            .map_err(|e| FetchError::Transient(format!("Failed to parse OMDB response: {}", e)))?;

        if !movie.is_found() {
            debug!(imdb_id = id, error = ?movie.error, "OMDB has no record");
            return Err(FetchError::NotFound);
        }

        Ok(movie.without_placeholders())
    }
}
