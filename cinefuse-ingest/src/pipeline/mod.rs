//! Batch pipeline driver
//!
//! # Architecture
//! Batches run strictly one after another. Within a batch every record is
//! independent and goes through [`record::process_record`] on a bounded
//! worker pool (`futures::stream::buffer_unordered`).
//!
//! ```text
//! Load ──> Process ──> Checkpoint ──> next batch | Done
//!   │         │            │
//!   └─────────┴────────────┴──> Fatal (run aborts)
//! ```
//!
//! - **Load**: `tmdb-{n}.json`; unreadable input is fatal.
//! - **Process**: survivors kept, drops counted by reason.
//! - **Checkpoint**: survivors sorted by `tmdb_id`, written atomically to
//!   `movies-{n}.json`. A non-empty batch with no survivors is fatal.
//! - **Resume**: any start index; batches with a checkpoint are skipped
//!   unless `force` is set.

pub mod checkpoint;
pub mod enrich;
pub mod fetch;
pub mod layout;
pub mod record;
pub mod statistics;

pub use layout::Layout;
pub use statistics::{BatchStats, RunSummary};

use crate::config::IngestConfig;
use crate::error::{PipelineError, Result};
use crate::merge::SourceSet;
use crate::models::{FlickMetrixMovie, ImdbTitle, OmdbMovie, RtMovie, WikidataMovie};
use crate::sources::imdb_ratings::load_ratings;
use crate::store::load_cache;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Log progress every this many records
const PROGRESS_EVERY: usize = 1000;

/// Driver settings taken from [`IngestConfig`]
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub concurrency: usize,
    pub min_runtime_minutes: u32,
    pub force: bool,
}

impl From<&IngestConfig> for DriverOptions {
    fn from(config: &IngestConfig) -> Self {
        Self {
            concurrency: config.concurrency.process,
            min_runtime_minutes: config.min_runtime_minutes,
            force: config.force,
        }
    }
}

/// Runs the per-record pipeline over a range of batches.
///
/// # Example
/// ```rust,ignore
/// let sources = load_sources(&layout)?;
/// let driver = BatchDriver::new(layout, sources, DriverOptions::from(&config), Utc::now());
/// let summary = driver.run(0, num_batches).await?;
/// ```
pub struct BatchDriver {
    layout: Layout,
    sources: SourceSet,
    options: DriverOptions,
    /// Captured once per run so every batch scores against the same instant
    now: DateTime<Utc>,
}

impl BatchDriver {
    pub fn new(layout: Layout, sources: SourceSet, options: DriverOptions, now: DateTime<Utc>) -> Self {
        Self {
            layout,
            sources,
            options,
            now,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Process batches `start_batch..num_batches`.
    ///
    /// # Errors
    /// Stops at the first fatal batch error.
    pub async fn run(&self, start_batch: usize, num_batches: usize) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        info!(
            start_batch,
            num_batches,
            force = self.options.force,
            concurrency = self.options.concurrency,
            "Starting batch run"
        );

        for batch in start_batch..num_batches {
            let checkpoint = self.layout.checkpoint(batch);
            if checkpoint.exists() && !self.options.force {
                info!(batch, path = %checkpoint.display(), "Checkpoint exists, skipping batch");
                summary.record_skipped();
                continue;
            }

            let stats = self.process_batch(batch).await.map_err(|e| {
                tracing::error!(batch, error = %e, "Batch failed");
                e
            })?;
            summary.add(&stats);
        }

        summary.log_summary();
        Ok(summary)
    }

    /// Load, process and checkpoint one batch.
    ///
    /// # Errors
    /// * `BatchInput` - input missing or unparseable
    /// * `EmptyBatch` - non-empty input, zero survivors
    /// * `Checkpoint` - output write failed
    pub async fn process_batch(&self, batch: usize) -> Result<BatchStats> {
        let input_path = self.layout.batch_input(batch);
        let details = checkpoint::load_batch_input(batch, &input_path)?;
        let total = details.len();

        info!(batch, records = total, "Processing batch");

        let processed = AtomicUsize::new(0);
        let sources = &self.sources;
        let now = self.now;
        let min_runtime = self.options.min_runtime_minutes;

        let mut results: Vec<_> = stream::iter(details.iter().enumerate())
            .map(|(index, details)| {
                let processed = &processed;
                async move {
                    let verdict = record::process_record(details, sources, now, min_runtime);

                    let current = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if current % PROGRESS_EVERY == 0 || current == total {
                        debug!(
                            batch,
                            progress = format!("{}/{}", current, total),
                            "Batch progress"
                        );
                    }

                    (index, details.id, verdict)
                }
            })
            .buffer_unordered(self.options.concurrency.max(1))
            .collect()
            .await;

        // Completion order varies with the pool; restore input order
        results.sort_by_key(|(index, _, _)| *index);

        let mut stats = BatchStats::new(batch, total);
        let mut movies = Vec::with_capacity(total);
        for (_, tmdb_id, verdict) in results {
            match verdict {
                Ok(movie) => {
                    stats.record_kept();
                    movies.push(movie);
                }
                Err(reason) => {
                    debug!(batch, tmdb_id, reason = reason.as_str(), "Dropped record");
                    stats.record_drop(reason);
                }
            }
        }

        if total > 0 && movies.is_empty() {
            return Err(PipelineError::EmptyBatch { batch, input: total });
        }

        movies.sort_by_key(|m| m.tmdb_id);
        let before = movies.len();
        movies.dedup_by_key(|m| m.tmdb_id);
        if movies.len() < before {
            warn!(batch, duplicates = before - movies.len(), "Duplicate tmdb ids in batch input");
        }

        checkpoint::write_checkpoint(batch, &self.layout.checkpoint(batch), &mut movies)?;
        stats.log_summary();
        Ok(stats)
    }
}

/// Number of batches to process: configured, else derived from the TMDB
/// id dump, else the count of batch input files on disk.
pub fn resolve_num_batches(config: &IngestConfig, layout: &Layout) -> Result<usize> {
    if let Some(n) = config.num_batches {
        return Ok(n);
    }

    let dump = layout.tmdb_dump();
    if dump.exists() {
        let entries = fetch::load_dump(&dump)?;
        return Ok(layout::num_batches(entries.len(), config.batch_size));
    }

    Ok(layout.count_batch_inputs())
}

/// Load every secondary-source cache into memory.
///
/// Missing caches are empty; a missing ratings dump is a warning.
///
/// # Errors
/// Returns `PipelineError::Store` for a cache file that does not parse.
pub fn load_sources(layout: &Layout) -> Result<SourceSet> {
    let ratings_path = layout.imdb_ratings();
    let imdb_ratings = if ratings_path.exists() {
        load_ratings(&ratings_path)?
    } else {
        warn!(path = %ratings_path.display(), "IMDB ratings dump not found");
        Default::default()
    };

    let sources = SourceSet {
        imdb_titles: load_cache::<ImdbTitle>("imdb", &layout.cache(layout::IMDB_CACHE_FILE))?,
        imdb_ratings,
        rt: load_cache::<RtMovie>("rt", &layout.cache(layout::RT_CACHE_FILE))?,
        wikidata: load_cache::<WikidataMovie>(
            "wikidata",
            &layout.cache(layout::WIKIDATA_CACHE_FILE),
        )?,
        flick_metrix: load_cache::<FlickMetrixMovie>(
            "flick_metrix",
            &layout.cache(layout::FLICK_METRIX_CACHE_FILE),
        )?,
        omdb: load_cache::<OmdbMovie>("omdb", &layout.cache(layout::OMDB_CACHE_FILE))?,
    };

    info!(
        imdb_titles = sources.imdb_titles.len(),
        imdb_ratings = sources.imdb_ratings.len(),
        rt = sources.rt.len(),
        wikidata = sources.wikidata.len(),
        flick_metrix = sources.flick_metrix.len(),
        omdb = sources.omdb.len(),
        "Secondary sources loaded"
    );

    Ok(sources)
}
