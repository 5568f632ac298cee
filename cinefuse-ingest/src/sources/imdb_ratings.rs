//! IMDB ratings dump (`title.ratings.tsv`)
//!
//! Tab separated, one header row: `tconst  averageRating  numVotes`.

use crate::error::{PipelineError, Result};
use crate::models::ImdbRating;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct RatingRow {
    tconst: String,
    #[serde(rename = "averageRating")]
    average_rating: f64,
    #[serde(rename = "numVotes")]
    num_votes: u64,
}

/// Load the ratings dump at `path` into a map keyed by imdb id.
///
/// # Errors
/// Returns `PipelineError::Store` when the file cannot be opened.
pub fn load_ratings(path: &Path) -> Result<HashMap<String, ImdbRating>> {
    let file = std::fs::File::open(path).map_err(|e| PipelineError::Store {
        name: "imdb-ratings".to_string(),
        message: format!("{}: {}", path.display(), e),
    })?;
    let ratings = parse_ratings(file);
    info!(path = %path.display(), count = ratings.len(), "Loaded IMDB ratings");
    Ok(ratings)
}

/// Parse rows from `reader`, skipping malformed ones with a warning.
pub fn parse_ratings<R: Read>(reader: R) -> HashMap<String, ImdbRating> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(true)
        .from_reader(reader);

    let mut ratings = HashMap::new();
    let mut skipped = 0usize;

    for (line, row) in csv_reader.deserialize::<RatingRow>().enumerate() {
        match row {
            Ok(row) => {
                ratings.insert(
                    row.tconst,
                    ImdbRating {
                        rating: row.average_rating,
                        num_votes: row.num_votes,
                    },
                );
            }
            Err(e) => {
                skipped += 1;
                // +2: one for the header, one for 1-based numbering
                warn!(line = line + 2, error = %e, "Skipping malformed ratings row");
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "Ratings rows skipped");
    }
    ratings
}
