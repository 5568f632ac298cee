//! Error types for cinefuse-ingest
//!
//! Two kinds of failure exist in the pipeline:
//! - **Per-record**: expressed as [`DropReason`]. The record is skipped,
//!   logged and counted. The run continues.
//! - **Run-level**: expressed as [`PipelineError`]. The run aborts.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for run-level operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Outcome of a per-record stage: `Err` means "drop this record"
pub type Verdict<T = ()> = std::result::Result<T, DropReason>;

/// Run-level (fatal) errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Batch input file missing, unreadable or not a JSON array of records
    #[error("Batch {batch} input unreadable ({path}): {message}")]
    BatchInput {
        batch: usize,
        path: PathBuf,
        message: String,
    },

    /// A non-empty batch produced no surviving records
    #[error("Batch {batch} produced zero records from {input} inputs")]
    EmptyBatch { batch: usize, input: usize },

    /// Checkpoint write failed
    #[error("Checkpoint write failed for batch {batch}: {source}")]
    Checkpoint {
        batch: usize,
        #[source]
        source: cinefuse_common::Error,
    },

    /// Secondary-source store load/flush failed
    #[error("Store error ({name}): {message}")]
    Store { name: String, message: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unrecoverable source failure (bad credentials, etc.)
    #[error("Source error ({source_name}): {message}")]
    Source {
        source_name: &'static str,
        message: String,
    },

    /// Database operation error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// cinefuse-common error
    #[error("Common error: {0}")]
    Common(#[from] cinefuse_common::Error),
}

/// Why a single record was excluded from the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Raw record lacks identity (id or any title)
    #[error("unconvertible source record")]
    Unconvertible,
    #[error("adult title")]
    Adult,
    #[error("not released")]
    NotReleased,
    #[error("missing imdb id")]
    MissingImdbId,
    #[error("no usable trailer")]
    MissingTrailer,
    #[error("runtime below minimum")]
    RuntimeTooShort,
    /// IMDB type is neither movie nor video
    #[error("non-movie title type")]
    NonMovieType,
    #[error("short film")]
    ShortFilm,
    #[error("blacklisted keyword")]
    BlacklistedKeyword,
    #[error("blacklisted title prefix")]
    BlacklistedTitle,
    /// Music video or band documentary
    #[error("music-only genres")]
    MusicOnly,
    #[error("source reports not found")]
    NotFound,
    /// Source refused the id outright (4xx other than not-found)
    #[error("rejected by source")]
    Rejected,
    /// Transient failures exhausted the retry budget
    #[error("fetch retries exhausted")]
    RetriesExhausted,
}

impl DropReason {
    /// Stable snake_case label used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Unconvertible => "unconvertible",
            DropReason::Adult => "adult",
            DropReason::NotReleased => "not_released",
            DropReason::MissingImdbId => "missing_imdb_id",
            DropReason::MissingTrailer => "missing_trailer",
            DropReason::RuntimeTooShort => "runtime_too_short",
            DropReason::NonMovieType => "non_movie_type",
            DropReason::ShortFilm => "short_film",
            DropReason::BlacklistedKeyword => "blacklisted_keyword",
            DropReason::BlacklistedTitle => "blacklisted_title",
            DropReason::MusicOnly => "music_only",
            DropReason::NotFound => "not_found",
            DropReason::Rejected => "rejected",
            DropReason::RetriesExhausted => "retries_exhausted",
        }
    }
}
