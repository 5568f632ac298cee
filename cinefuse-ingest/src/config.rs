//! Pipeline configuration
//!
//! Loaded from TOML (`<config_dir>/cinefuse/cinefuse.toml` unless a path is
//! given). Command-line flags and `CINEFUSE_*` environment variables are
//! applied on top by the binary, so the effective priority is:
//!
//! 1. Command-line flag
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled defaults (below)
//!
//! # Example
//! ```toml
//! data_dir = "/srv/cinefuse"
//! batch_size = 32000
//! min_runtime_minutes = 60
//!
//! [concurrency]
//! process = 4
//! fetch = 16
//!
//! [rate_limits.omdb]
//! limit = 4
//! interval_ms = 10
//!
//! [logging]
//! level = "info"
//! ```

use crate::error::{PipelineError, Result};
use cinefuse_common::config::{
    default_config_path, load_toml_file, resolve_data_dir, LoggingConfig, DATA_DIR_ENV,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Directory holding the raw dumps (`title.ratings.tsv`, TMDB id dump)
    pub data_dir: Option<PathBuf>,

    /// Directory for batch files and source caches (default: `<data_dir>/out`)
    pub out_dir: Option<PathBuf>,

    /// Number of source ids per batch
    pub batch_size: usize,

    /// Number of batches; derived from the TMDB id dump when absent
    pub num_batches: Option<usize>,

    /// Records with a shorter runtime are dropped at admission
    pub min_runtime_minutes: u32,

    /// Re-process batches / re-fetch keys that already have output
    pub force: bool,

    /// Worker-pool sizes per stage
    pub concurrency: ConcurrencyConfig,

    /// Token-bucket limits per external catalog
    pub rate_limits: RateLimitsConfig,

    /// Retry policy for source fetches
    pub retry: RetryConfig,

    /// Flush a source store after this many successful downloads
    pub store_flush_every: usize,

    /// TMDB API read access token
    pub tmdb_bearer_token: Option<String>,

    /// OMDB API key
    pub omdb_api_key: Option<String>,

    pub logging: LoggingConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            out_dir: None,
            batch_size: 32_000,
            num_batches: None,
            min_runtime_minutes: 60,
            force: false,
            concurrency: ConcurrencyConfig::default(),
            rate_limits: RateLimitsConfig::default(),
            retry: RetryConfig::default(),
            store_flush_every: 10,
            tmdb_bearer_token: None,
            omdb_api_key: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Worker-pool sizes. CPU-light processing uses a small pool; network-bound
/// stages use a larger one and are throttled by the per-catalog limiter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub process: usize,
    pub fetch: usize,
    pub enrich: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            process: 4,
            fetch: 16,
            enrich: 16,
        }
    }
}

/// `limit` requests per `interval_ms` milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: u32,
    pub interval_ms: u64,
}

impl RateLimit {
    pub const fn new(limit: u32, interval_ms: u64) -> Self {
        Self { limit, interval_ms }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitsConfig {
    pub tmdb: RateLimit,
    pub imdb: RateLimit,
    pub rt: RateLimit,
    pub wikidata: RateLimit,
    pub omdb: RateLimit,
}

impl Default for RateLimitsConfig {
    fn default() -> Self {
        Self {
            tmdb: RateLimit::new(40, 1000),
            imdb: RateLimit::new(3, 1200),
            rt: RateLimit::new(4, 500),
            wikidata: RateLimit::new(100, 1000),
            omdb: RateLimit::new(4, 10),
        }
    }
}

/// Capped exponential backoff.
///
/// Delay before attempt `n + 1` is `base_delay_ms * n^2`, capped at
/// `max_delay_ms`. A rate-limited response adds `rate_limit_penalty_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub rate_limit_penalty_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 60_000,
            rate_limit_penalty_ms: 10_000,
        }
    }
}

impl IngestConfig {
    /// Load configuration from `path`, or from the platform default location.
    ///
    /// A missing file yields compiled defaults; a malformed file is an error.
    ///
    /// # Errors
    /// Returns `PipelineError::Common` for unreadable/malformed TOML and
    /// `PipelineError::Config` when validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let config = match path {
            Some(p) => load_toml_file::<IngestConfig>(&p)?.unwrap_or_default(),
            None => IngestConfig::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(PipelineError::Config("batch_size must be >= 1".to_string()));
        }
        if self.num_batches == Some(0) {
            return Err(PipelineError::Config("num_batches must be >= 1".to_string()));
        }

        let pools = [
            ("concurrency.process", self.concurrency.process),
            ("concurrency.fetch", self.concurrency.fetch),
            ("concurrency.enrich", self.concurrency.enrich),
            ("store_flush_every", self.store_flush_every),
        ];
        for (name, value) in pools {
            if value == 0 {
                return Err(PipelineError::Config(format!("{} must be >= 1", name)));
            }
        }

        let limits = [
            ("tmdb", self.rate_limits.tmdb),
            ("imdb", self.rate_limits.imdb),
            ("rt", self.rate_limits.rt),
            ("wikidata", self.rate_limits.wikidata),
            ("omdb", self.rate_limits.omdb),
        ];
        for (name, limit) in limits {
            if limit.limit == 0 || limit.interval_ms == 0 {
                return Err(PipelineError::Config(format!(
                    "rate_limits.{} needs limit >= 1 and interval_ms >= 1",
                    name
                )));
            }
        }

        if self.retry.max_attempts == 0 {
            return Err(PipelineError::Config(
                "retry.max_attempts must be >= 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Effective data directory (CLI > env > TOML > platform default)
    pub fn resolve_data_dir(&self, cli_arg: Option<&Path>) -> PathBuf {
        resolve_data_dir(cli_arg, DATA_DIR_ENV, self.data_dir.as_deref())
    }

    /// Effective output directory
    pub fn resolve_out_dir(&self, data_dir: &Path) -> PathBuf {
        self.out_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("out"))
    }
}
