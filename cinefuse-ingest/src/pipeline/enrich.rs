//! Secondary-source enrichment stage
//!
//! Walks the batch checkpoints, derives a lookup key per movie and fills a
//! [`Store`] from a [`SourceAdapter`]. The next `process` run merges the
//! store's contents.

use super::checkpoint::load_checkpoint;
use super::layout::Layout;
use crate::config::IngestConfig;
use crate::error::Result;
use crate::models::Movie;
use crate::sources::{fetch_with_retry, SourceAdapter};
use crate::store::Store;
use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Key for catalogs indexed by imdb id
pub fn imdb_key(movie: &Movie) -> Option<String> {
    movie.imdb_id.clone().filter(|id| !id.is_empty())
}

/// Key for catalogs indexed by tmdb id
pub fn tmdb_key(movie: &Movie) -> Option<String> {
    Some(movie.tmdb_id.to_string())
}

/// Counts over an enrichment run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub batches: usize,
    /// Keys already present in the store
    pub cached: usize,
    pub fetched: usize,
    pub dropped: usize,
}

/// Fill `store` from `adapter` for every movie in batches
/// `start_batch..num_batches`.
///
/// Keys already in the store are skipped unless `config.force` is set.
/// The store is flushed every `store_flush_every` puts and after each batch.
///
/// # Errors
/// Returns on a fatal adapter failure or a failed store flush.
pub async fn enrich_batches<A>(
    adapter: &A,
    store: &Store<A::Record>,
    key_of: fn(&Movie) -> Option<String>,
    layout: &Layout,
    config: &IngestConfig,
    start_batch: usize,
    num_batches: usize,
) -> Result<EnrichSummary>
where
    A: SourceAdapter,
    A::Record: Serialize + DeserializeOwned + Clone,
{
    let mut summary = EnrichSummary::default();

    for batch in start_batch..num_batches {
        let path = layout.checkpoint(batch);
        if !path.exists() {
            warn!(batch, source = adapter.name(), "No checkpoint for batch, skipping enrichment");
            continue;
        }

        let movies = load_checkpoint(&path)?;
        let keys: BTreeSet<String> = movies.iter().filter_map(key_of).collect();

        let mut pending = Vec::with_capacity(keys.len());
        for key in keys {
            if !config.force && store.contains(&key).await {
                summary.cached += 1;
            } else {
                pending.push(key);
            }
        }

        info!(
            batch,
            source = adapter.name(),
            pending = pending.len(),
            cached = summary.cached,
            "Enriching batch"
        );

        let results: Vec<_> = stream::iter(pending)
            .map(|key| enrich_one(adapter, store, key, config))
            .buffer_unordered(config.concurrency.enrich.max(1))
            .collect()
            .await;

        // Keep what was downloaded before surfacing a fatal error
        store.flush().await?;

        for result in results {
            if result? {
                summary.fetched += 1;
            } else {
                summary.dropped += 1;
            }
        }
        summary.batches += 1;
    }

    info!(
        source = adapter.name(),
        store = store.name(),
        batches = summary.batches,
        fetched = summary.fetched,
        dropped = summary.dropped,
        cached = summary.cached,
        "Enrichment complete"
    );
    Ok(summary)
}

/// Fetch and store one key; `Ok(false)` when the record was dropped.
async fn enrich_one<A>(
    adapter: &A,
    store: &Store<A::Record>,
    key: String,
    config: &IngestConfig,
) -> Result<bool>
where
    A: SourceAdapter,
    A::Record: Serialize + DeserializeOwned + Clone,
{
    match fetch_with_retry(adapter, &key, &config.retry).await? {
        Ok(record) => {
            store.put(key, record).await?;
            Ok(true)
        }
        Err(reason) => {
            debug!(source = adapter.name(), key = %key, reason = reason.as_str(), "Enrichment dropped");
            Ok(false)
        }
    }
}
