//! Recency-adjusted popularity and relevancy score
//!
//! The constants are empirically tuned; keep them exactly as they are.
//!
//! ```text
//! days_old   = max(1, (now - release) / 1 day)
//! recency    = clamp(log10(1 + 0.35 * days_old) * 300 / days_old - 3, 1, 30)
//! popularity = imdb_votes * recency
//! rf         = sigmoid(1.5 * (rating - 6)) ^ 6          (0 without rating)
//! rf2        = max(0.5, 3.8 ^ (rf + 0.5) - 1.85)
//! relevancy  = popularity * rf2
//! ```

use crate::models::Movie;
use chrono::{DateTime, Utc};
use cinefuse_common::time::parse_release_date;

const MS_PER_DAY: f64 = 86_400_000.0;

const RECENCY_LOG_SCALE: f64 = 0.35;
const RECENCY_GAIN: f64 = 300.0;
const RECENCY_OFFSET: f64 = 3.0;
const RECENCY_MIN: f64 = 1.0;
const RECENCY_MAX: f64 = 30.0;

const RATING_MIDPOINT: f64 = 6.0;
const RATING_STEEPNESS: f64 = 1.5;
const RATING_EXPONENT: f64 = 6.0;

const BOOST_BASE: f64 = 3.8;
const BOOST_SHIFT: f64 = 0.5;
const BOOST_OFFSET: f64 = 1.85;
const BOOST_FLOOR: f64 = 0.5;

/// Days since release, at least 1. `None` for a missing or bad date.
pub fn days_old(release_date: Option<&str>, now: DateTime<Utc>) -> Option<f64> {
    let released = parse_release_date(release_date?)?;
    let elapsed_ms = (now - released).num_milliseconds() as f64;
    Some((elapsed_ms / MS_PER_DAY).max(1.0))
}

/// Boost for young titles whose vote counts have not settled yet
pub fn recency_factor(days_old: f64) -> f64 {
    let raw = (1.0 + RECENCY_LOG_SCALE * days_old).log10() * RECENCY_GAIN / days_old - RECENCY_OFFSET;
    raw.clamp(RECENCY_MIN, RECENCY_MAX)
}

/// Rating on a 0-10 scale: IMDB, else RT audience, else RT critics
pub fn relevancy_rating(movie: &Movie) -> Option<f64> {
    movie
        .imdb_rating
        .or_else(|| movie.rt_audience_rating.map(|r| r / 100.0 * 10.0))
        .or_else(|| movie.rt_critic_rating.map(|r| r / 100.0 * 10.0))
}

/// S-curve over the rating, centred on 6
pub fn rating_factor(rating: Option<f64>) -> f64 {
    match rating {
        Some(r) => {
            let sigmoid = 1.0 / (1.0 + (-RATING_STEEPNESS * (r - RATING_MIDPOINT)).exp());
            sigmoid.powf(RATING_EXPONENT)
        }
        None => 0.0,
    }
}

pub fn rating_boost(rating_factor: f64) -> f64 {
    (BOOST_BASE.powf(rating_factor + BOOST_SHIFT) - BOOST_OFFSET).max(BOOST_FLOOR)
}

/// Set `imdb_custom_popularity` and `relevancy_score`.
///
/// `now` is captured once per run by the caller.
pub fn score(movie: &mut Movie, now: DateTime<Utc>) {
    let recency = days_old(movie.release_date.as_deref(), now)
        .map(recency_factor)
        .unwrap_or(RECENCY_MIN);

    movie.imdb_custom_popularity = movie
        .imdb_votes
        .map(|votes| votes as f64 * recency)
        .unwrap_or(0.0);

    let boost = rating_boost(rating_factor(relevancy_rating(movie)));
    movie.relevancy_score = movie.imdb_custom_popularity * boost;
}
