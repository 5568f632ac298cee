//! On-disk layout of a pipeline run
//!
//! ```text
//! <data_dir>/
//!   tmdb-dump.json           TMDB id dump (JSON array)
//!   title.ratings.tsv        IMDB ratings dump
//! <out_dir>/
//!   tmdb-{n}.json            raw TMDB details per batch
//!   movies-{n}.json          checkpoint per batch
//!   imdb-movies.json         source caches
//!   rt-movies.json
//!   wikidata-movies.json
//!   flick-metrix-movies.json
//!   omdb-movies.json
//! ```

use std::path::{Path, PathBuf};

pub const TMDB_DUMP_FILE: &str = "tmdb-dump.json";
pub const IMDB_RATINGS_FILE: &str = "title.ratings.tsv";

pub const IMDB_CACHE_FILE: &str = "imdb-movies.json";
pub const RT_CACHE_FILE: &str = "rt-movies.json";
pub const WIKIDATA_CACHE_FILE: &str = "wikidata-movies.json";
pub const FLICK_METRIX_CACHE_FILE: &str = "flick-metrix-movies.json";
pub const OMDB_CACHE_FILE: &str = "omdb-movies.json";

/// Resolved input and output locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl Layout {
    pub fn new(data_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            out_dir: out_dir.into(),
        }
    }

    pub fn tmdb_dump(&self) -> PathBuf {
        self.data_dir.join(TMDB_DUMP_FILE)
    }

    pub fn imdb_ratings(&self) -> PathBuf {
        self.data_dir.join(IMDB_RATINGS_FILE)
    }

    /// Raw TMDB details for `batch`
    pub fn batch_input(&self, batch: usize) -> PathBuf {
        self.out_dir.join(format!("tmdb-{}.json", batch))
    }

    /// Processed records for `batch`
    pub fn checkpoint(&self, batch: usize) -> PathBuf {
        self.out_dir.join(format!("movies-{}.json", batch))
    }

    pub fn cache(&self, file_name: &str) -> PathBuf {
        self.out_dir.join(file_name)
    }

    /// Number of consecutive `tmdb-{n}.json` files present, starting at 0
    pub fn count_batch_inputs(&self) -> usize {
        (0..).take_while(|&n| self.batch_input(n).exists()).count()
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

/// `ceil(total / batch_size)`
pub fn num_batches(total: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    total.div_ceil(batch_size)
}
