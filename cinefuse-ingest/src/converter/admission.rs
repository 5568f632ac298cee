//! Admission check, applied once right after conversion and before any merge

use crate::error::{DropReason, Verdict};
use crate::models::Movie;

const RELEASED: &str = "released";

/// Reject records that must never reach a checkpoint.
///
/// Order: adult, unreleased, no imdb id, no trailer, runtime below
/// `min_runtime_minutes` (unknown runtime counts as zero).
pub fn admit(movie: &Movie, min_runtime_minutes: u32) -> Verdict {
    if movie.adult {
        return Err(DropReason::Adult);
    }
    if movie.status.as_deref() != Some(RELEASED) {
        return Err(DropReason::NotReleased);
    }
    if movie.imdb_id.as_deref().map(str::is_empty).unwrap_or(true) {
        return Err(DropReason::MissingImdbId);
    }
    if movie.trailer_url.is_none() {
        return Err(DropReason::MissingTrailer);
    }
    if movie.runtime.unwrap_or(0) < min_runtime_minutes {
        return Err(DropReason::RuntimeTooShort);
    }
    Ok(())
}
