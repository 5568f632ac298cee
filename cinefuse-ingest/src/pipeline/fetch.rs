//! TMDB fetch stage
//!
//! Turns the TMDB id dump into per-batch `tmdb-{n}.json` files. The dump is
//! sorted by popularity (highest first) so the earliest batches hold the
//! titles most worth having; adult entries are skipped before fetching.

use super::layout::{num_batches, Layout};
use crate::config::IngestConfig;
use crate::error::{PipelineError, Result};
use crate::models::tmdb::DumpEntry;
use crate::models::MovieDetails;
use crate::sources::{fetch_with_retry, SourceAdapter};
use cinefuse_common::config::{read_json, write_json_atomic};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Read the TMDB id dump (a JSON array of [`DumpEntry`]).
///
/// # Errors
/// Returns `PipelineError::BatchInput` when the dump cannot be read.
pub fn load_dump(path: &Path) -> Result<Vec<DumpEntry>> {
    read_json::<Vec<DumpEntry>>(path).map_err(|e| PipelineError::BatchInput {
        batch: 0,
        path: path.to_path_buf(),
        message: format!("TMDB id dump unreadable: {}", e),
    })
}

/// Sort by popularity (descending, ties by id) and split into batches.
pub fn plan_batches(mut entries: Vec<DumpEntry>, batch_size: usize) -> Vec<Vec<DumpEntry>> {
    entries.sort_by(|a, b| {
        b.popularity
            .total_cmp(&a.popularity)
            .then_with(|| a.id.cmp(&b.id))
    });
    entries
        .chunks(batch_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Fetch TMDB details for every planned batch from `start_batch` on.
///
/// # Returns
/// Number of batch files written.
///
/// # Errors
/// * `Source` - the adapter reported a fatal failure (bad token)
/// * `EmptyBatch` - a batch with fetchable ids produced nothing
pub async fn fetch_batches<A>(
    adapter: &A,
    layout: &Layout,
    config: &IngestConfig,
    start_batch: usize,
) -> Result<usize>
where
    A: SourceAdapter<Record = MovieDetails>,
{
    let entries = load_dump(&layout.tmdb_dump())?;
    let planned = num_batches(entries.len(), config.batch_size);
    let limit = config.num_batches.unwrap_or(planned).min(planned);
    let batches = plan_batches(entries, config.batch_size);

    info!(batches = limit, start_batch, "Fetching TMDB details");

    let mut written = 0;
    for (batch, entries) in batches.into_iter().enumerate().take(limit).skip(start_batch) {
        let path = layout.batch_input(batch);
        if path.exists() && !config.force {
            info!(batch, path = %path.display(), "Batch input exists, skipping fetch");
            continue;
        }

        let details = fetch_batch(adapter, batch, &entries, config).await?;
        write_json_atomic(&path, &details)?;
        info!(batch, fetched = details.len(), path = %path.display(), "Batch input written");
        written += 1;
    }

    Ok(written)
}

async fn fetch_batch<A>(
    adapter: &A,
    batch: usize,
    entries: &[DumpEntry],
    config: &IngestConfig,
) -> Result<Vec<MovieDetails>>
where
    A: SourceAdapter<Record = MovieDetails>,
{
    let wanted: Vec<&DumpEntry> = entries.iter().filter(|e| !e.adult).collect();
    let total = wanted.len();
    let fetched = AtomicUsize::new(0);

    let results: Vec<_> = stream::iter(wanted.into_iter().enumerate())
        .map(|(index, entry)| {
            let fetched = &fetched;
            async move {
                let id = entry.id.to_string();
                let outcome = fetch_with_retry(adapter, &id, &config.retry).await;

                let current = fetched.fetch_add(1, Ordering::Relaxed) + 1;
                if current % 10 == 0 || current == total {
                    debug!(batch, progress = format!("{}/{}", current, total), "Fetch progress");
                }
                (index, entry.id, outcome)
            }
        })
        .buffer_unordered(config.concurrency.fetch.max(1))
        .collect()
        .await;

    let mut ordered = Vec::with_capacity(results.len());
    for (index, tmdb_id, outcome) in results {
        match outcome? {
            Ok(details) => ordered.push((index, details)),
            Err(reason) => debug!(batch, tmdb_id, reason = reason.as_str(), "Fetch dropped"),
        }
    }

    if total > 0 && ordered.is_empty() {
        return Err(PipelineError::EmptyBatch { batch, input: total });
    }

    ordered.sort_by_key(|(index, _)| *index);
    Ok(ordered.into_iter().map(|(_, details)| details).collect())
}
