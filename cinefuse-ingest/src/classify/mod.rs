//! Classifier/scorer: pure stages over a merged record
//!
//! 1. Exclusion filters
//! 2. Stand-up tagging
//! 3. Recency-adjusted popularity and relevancy score
//! 4. Foreign classification
//! 5. Search key
//!
//! Only stage 3 depends on time, through the `now` argument.

pub mod exclusion;
pub mod foreign;
pub mod scoring;
pub mod search_key;
pub mod standup;

use crate::error::Verdict;
use crate::models::Movie;
use chrono::{DateTime, Utc};

/// Run every classification stage on `movie`.
///
/// # Errors
/// Returns the reason from the first exclusion filter that matches.
pub fn classify(movie: &mut Movie, now: DateTime<Utc>) -> Verdict {
    exclusion::check_exclusions(movie)?;
    standup::tag_standup(movie);
    scoring::score(movie, now);
    movie.foreign = foreign::is_foreign(movie);
    movie.search_key = search_key::build_search_key(movie);
    Ok(())
}
