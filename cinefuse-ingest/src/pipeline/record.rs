//! Per-record pipeline: convert → admit → merge → classify
//!
//! Pure with respect to its inputs: the same details, sources and `now`
//! always give the same output.

use crate::classify::classify;
use crate::converter::admission::admit;
use crate::converter::convert;
use crate::error::Verdict;
use crate::merge::{merge_sources, SourceSet};
use crate::models::{Movie, MovieDetails};
use chrono::{DateTime, Utc};

pub fn process_record(
    details: &MovieDetails,
    sources: &SourceSet,
    now: DateTime<Utc>,
    min_runtime_minutes: u32,
) -> Verdict<Movie> {
    let mut movie = convert(details)?;
    admit(&movie, min_runtime_minutes)?;
    merge_sources(&mut movie, sources)?;
    classify(&mut movie, now)?;
    Ok(movie)
}
