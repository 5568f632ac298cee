//! Persistent per-source cache
//!
//! A JSON object keyed by tmdb id or imdb id, loaded once at start and
//! written back atomically. Record tasks share one `Store` through `&Store`;
//! the inner lock makes it the single writer of its file for the run.
//!
//! # Example
//! ```rust,ignore
//! let store: Store<OmdbMovie> = Store::open("omdb", &path, 10)?;
//! if !store.contains("tt0111161").await {
//!     store.put("tt0111161", movie).await?;
//! }
//! store.flush().await?;
//! ```

use crate::error::{PipelineError, Result};
use cinefuse_common::config::{read_json, write_atomic};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

struct StoreState<T> {
    records: BTreeMap<String, T>,
    /// Successful puts since the last flush
    unflushed: usize,
}

pub struct Store<T> {
    name: String,
    path: PathBuf,
    flush_every: usize,
    state: Mutex<StoreState<T>>,
}

impl<T> Store<T>
where
    T: Serialize + DeserializeOwned + Clone + Send,
{
    /// Load the store at `path`; a missing file gives an empty store.
    ///
    /// # Errors
    /// Returns `PipelineError::Store` when the file exists but is not a
    /// JSON object of records.
    pub fn open(name: &str, path: &Path, flush_every: usize) -> Result<Self> {
        let records = if path.exists() {
            read_json::<BTreeMap<String, T>>(path).map_err(|e| PipelineError::Store {
                name: name.to_string(),
                message: format!("{}: {}", path.display(), e),
            })?
        } else {
            debug!(store = name, path = %path.display(), "No store file yet");
            BTreeMap::new()
        };

        info!(store = name, records = records.len(), "Store loaded");

        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            flush_every: flush_every.max(1),
            state: Mutex::new(StoreState {
                records,
                unflushed: 0,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        self.state.lock().await.records.get(key).cloned()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.state.lock().await.records.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Insert a record, flushing once `flush_every` puts have accumulated.
    ///
    /// # Errors
    /// Returns `PipelineError::Store` when the flush fails.
    pub async fn put(&self, key: impl Into<String>, value: T) -> Result<()> {
        let mut state = self.state.lock().await;
        state.records.insert(key.into(), value);
        state.unflushed += 1;
        if state.unflushed >= self.flush_every {
            self.write(&mut state).await?;
        }
        Ok(())
    }

    /// Write pending records to disk (no-op when nothing changed).
    pub async fn flush(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.unflushed > 0 {
            self.write(&mut state).await?;
        }
        Ok(())
    }

    /// Serialize under the lock, then write on the blocking pool.
    ///
    /// The lock stays held until the file is renamed into place, so flushes
    /// never interleave.
    async fn write(&self, state: &mut StoreState<T>) -> Result<()> {
        let bytes = serde_json::to_vec(&state.records).map_err(|e| self.flush_error(e))?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| self.flush_error(e))?
            .map_err(|e| self.flush_error(e))?;
        debug!(
            store = %self.name,
            records = state.records.len(),
            written = state.unflushed,
            "Store flushed"
        );
        state.unflushed = 0;
        Ok(())
    }

    fn flush_error(&self, e: impl std::fmt::Display) -> PipelineError {
        PipelineError::Store {
            name: self.name.clone(),
            message: format!("flush to {} failed: {}", self.path.display(), e),
        }
    }

    /// Consume the store into a lookup map for merging
    pub fn into_map(self) -> HashMap<String, T> {
        self.state.into_inner().records.into_iter().collect()
    }
}

/// Load a cache file as a lookup map; a missing file is an empty map.
///
/// # Errors
/// Returns `PipelineError::Store` when the file exists but does not parse.
pub fn load_cache<T>(name: &str, path: &Path) -> Result<HashMap<String, T>>
where
    T: Serialize + DeserializeOwned + Clone + Send,
{
    Ok(Store::<T>::open(name, path, 1)?.into_map())
}
