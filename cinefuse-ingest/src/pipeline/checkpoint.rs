//! Batch input loading and checkpoint persistence

use crate::error::{PipelineError, Result};
use crate::models::{Movie, MovieDetails};
use cinefuse_common::config::{read_json, write_json_atomic};
use std::path::Path;

/// Load the raw TMDB details for `batch`.
///
/// # Errors
/// Returns `PipelineError::BatchInput` when the file is missing, unreadable
/// or not a JSON array of details.
pub fn load_batch_input(batch: usize, path: &Path) -> Result<Vec<MovieDetails>> {
    read_json::<Vec<MovieDetails>>(path).map_err(|e| PipelineError::BatchInput {
        batch,
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Sort `movies` by tmdb id and write them atomically.
///
/// # Errors
/// Returns `PipelineError::Checkpoint` when the write fails.
pub fn write_checkpoint(batch: usize, path: &Path, movies: &mut [Movie]) -> Result<()> {
    movies.sort_by_key(|m| m.tmdb_id);
    write_json_atomic(path, movies).map_err(|source| PipelineError::Checkpoint { batch, source })
}

/// Read a previously written checkpoint
pub fn load_checkpoint(path: &Path) -> Result<Vec<Movie>> {
    Ok(read_json(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_checkpoint_sorted_and_no_temp_left() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies-0.json");
        let mut movies: Vec<Movie> = [30, 10, 20]
            .into_iter()
            .map(|id| Movie {
                tmdb_id: id,
                ..Default::default()
            })
            .collect();

        write_checkpoint(0, &path, &mut movies).unwrap();

        let loaded = load_checkpoint(&path).unwrap();
        let ids: Vec<i64> = loaded.iter().map(|m| m.tmdb_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert!(!dir.path().join("movies-0.json.tmp").exists());
    }

    #[test]
    fn test_bad_input_is_batch_input_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tmdb-4.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();

        match load_batch_input(4, &path) {
            Err(PipelineError::BatchInput { batch, .. }) => assert_eq!(batch, 4),
            other => panic!("expected BatchInput, got {:?}", other.map(|v| v.len())),
        }
    }
}
