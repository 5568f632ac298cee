//! Field merge resolver
//!
//! Reconciles secondary-source observations into a canonical [`Movie`].
//!
//! # Architecture
//! Each secondary source declares a static table of
//! `(MovieField, MergePolicy)` pairs (see [`tables`]). A source record is
//! first projected into a [`PartialMovie`], then every field in the table
//! is merged with its policy:
//!
//! - **Override**: written whenever the source value is present
//!   (non-blank strings, non-empty lists, any number including `0`).
//! - **Fill**: written only when the canonical field is unset.
//!
//! Sources are merged in a fixed sequence by [`merge_sources`]:
//! IMDB → Rotten Tomatoes → Wikidata → FlickMetrix → OMDB.
//!
//! IMDB data (title page + ratings dump) is merged by [`imdb::merge_imdb`],
//! which also performs type-driven rejection.

pub mod imdb;
pub mod tables;

use crate::error::Verdict;
use crate::models::{
    FlickMetrixMovie, ImdbRating, ImdbTitle, Movie, OmdbMovie, PartialMovie, RtMovie,
    WikidataMovie,
};
use std::collections::HashMap;
use tracing::trace;

/// How a secondary value is combined with the canonical value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    Override,
    Fill,
}

/// Canonical fields a secondary source may write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieField {
    Title,
    MpaaRating,
    Plot,
    Runtime,
    Budget,
    Revenue,
    Homepage,
    Cast,
    Director,
    Production,
    AwardsSummary,
    MetacriticRating,
    MetacriticVotes,
    RtCriticRating,
    RtCriticVotes,
    RtAudienceRating,
    RtAudienceVotes,
    RtCriticsConsensus,
    RtUrl,
    RtId,
    EmsId,
    LetterboxdScore,
    LetterboxdVotes,
    FlickMetrixId,
    FlickMetrixScore,
    WikidataId,
    FacebookId,
    InstagramId,
    TwitterId,
    TwitterUsername,
    NetflixId,
    HuluId,
    AmazonId,
    AppleTvId,
    GoogleKgId,
    TraktTvId,
    RedditTopicId,
    LetterboxdId,
    MetacriticId,
    AllMovieId,
    DisneyPlusId,
    HboMaxId,
}

/// Whether a value counts as "present" for merging
pub trait Present {
    fn is_present(&self) -> bool;
}

impl Present for String {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Present for Vec<String> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

macro_rules! always_present {
    ($($t:ty),*) => {
        $(impl Present for $t {
            fn is_present(&self) -> bool {
                true
            }
        })*
    };
}

always_present!(f64, u64, i64, u32);

/// Merge an optional canonical value. Returns whether it was written.
fn merge_option<T: Present + Clone>(dst: &mut Option<T>, src: &Option<T>, policy: MergePolicy) -> bool {
    let Some(value) = src.as_ref().filter(|v| v.is_present()) else {
        return false;
    };
    let write = match policy {
        MergePolicy::Override => true,
        MergePolicy::Fill => !dst.as_ref().map(Present::is_present).unwrap_or(false),
    };
    if write {
        *dst = Some(value.clone());
    }
    write
}

/// Merge into a non-optional canonical value (blank / empty means unset).
fn merge_required<T: Present + Clone>(dst: &mut T, src: &Option<T>, policy: MergePolicy) -> bool {
    let Some(value) = src.as_ref().filter(|v| v.is_present()) else {
        return false;
    };
    let write = match policy {
        MergePolicy::Override => true,
        MergePolicy::Fill => !dst.is_present(),
    };
    if write {
        *dst = value.clone();
    }
    write
}

impl MovieField {
    /// Merge this field from `src` into `movie`. Returns whether it was written.
    pub fn merge(self, movie: &mut Movie, src: &PartialMovie, policy: MergePolicy) -> bool {
        let ids = &mut movie.external_ids;
        let src_ids = &src.external_ids;

        match self {
            MovieField::Title => merge_required(&mut movie.title, &src.title, policy),
            MovieField::MpaaRating => merge_option(&mut movie.mpaa_rating, &src.mpaa_rating, policy),
            MovieField::Plot => merge_option(&mut movie.plot, &src.plot, policy),
            MovieField::Runtime => merge_option(&mut movie.runtime, &src.runtime, policy),
            MovieField::Budget => merge_option(&mut movie.budget, &src.budget, policy),
            MovieField::Revenue => merge_option(&mut movie.revenue, &src.revenue, policy),
            MovieField::Homepage => merge_option(&mut movie.homepage, &src.homepage, policy),
            MovieField::Cast => merge_required(&mut movie.cast, &src.cast, policy),
            MovieField::Director => merge_option(&mut movie.director, &src.director, policy),
            MovieField::Production => merge_option(&mut movie.production, &src.production, policy),
            MovieField::AwardsSummary => {
                merge_option(&mut movie.awards_summary, &src.awards_summary, policy)
            }
            MovieField::MetacriticRating => {
                merge_option(&mut movie.metacritic_rating, &src.metacritic_rating, policy)
            }
            MovieField::MetacriticVotes => {
                merge_option(&mut movie.metacritic_votes, &src.metacritic_votes, policy)
            }
            MovieField::RtCriticRating => {
                merge_option(&mut movie.rt_critic_rating, &src.rt_critic_rating, policy)
            }
            MovieField::RtCriticVotes => {
                merge_option(&mut movie.rt_critic_votes, &src.rt_critic_votes, policy)
            }
            MovieField::RtAudienceRating => {
                merge_option(&mut movie.rt_audience_rating, &src.rt_audience_rating, policy)
            }
            MovieField::RtAudienceVotes => {
                merge_option(&mut movie.rt_audience_votes, &src.rt_audience_votes, policy)
            }
            MovieField::RtCriticsConsensus => {
                merge_option(&mut movie.rt_critics_consensus, &src.rt_critics_consensus, policy)
            }
            MovieField::RtUrl => merge_option(&mut movie.rt_url, &src.rt_url, policy),
            MovieField::RtId => merge_option(&mut movie.rt_id, &src.rt_id, policy),
            MovieField::EmsId => merge_option(&mut movie.ems_id, &src.ems_id, policy),
            MovieField::LetterboxdScore => {
                merge_option(&mut movie.letterboxd_score, &src.letterboxd_score, policy)
            }
            MovieField::LetterboxdVotes => {
                merge_option(&mut movie.letterboxd_votes, &src.letterboxd_votes, policy)
            }
            MovieField::FlickMetrixId => {
                merge_option(&mut movie.flick_metrix_id, &src.flick_metrix_id, policy)
            }
            MovieField::FlickMetrixScore => {
                merge_option(&mut movie.flick_metrix_score, &src.flick_metrix_score, policy)
            }
            MovieField::WikidataId => merge_option(&mut ids.wikidata_id, &src_ids.wikidata_id, policy),
            MovieField::FacebookId => merge_option(&mut ids.facebook_id, &src_ids.facebook_id, policy),
            MovieField::InstagramId => {
                merge_option(&mut ids.instagram_id, &src_ids.instagram_id, policy)
            }
            MovieField::TwitterId => merge_option(&mut ids.twitter_id, &src_ids.twitter_id, policy),
            MovieField::TwitterUsername => {
                merge_option(&mut ids.twitter_username, &src_ids.twitter_username, policy)
            }
            MovieField::NetflixId => merge_option(&mut ids.netflix_id, &src_ids.netflix_id, policy),
            MovieField::HuluId => merge_option(&mut ids.hulu_id, &src_ids.hulu_id, policy),
            MovieField::AmazonId => merge_option(&mut ids.amazon_id, &src_ids.amazon_id, policy),
            MovieField::AppleTvId => merge_option(&mut ids.apple_tv_id, &src_ids.apple_tv_id, policy),
            MovieField::GoogleKgId => {
                merge_option(&mut ids.google_kg_id, &src_ids.google_kg_id, policy)
            }
            MovieField::TraktTvId => merge_option(&mut ids.trakt_tv_id, &src_ids.trakt_tv_id, policy),
            MovieField::RedditTopicId => {
                merge_option(&mut ids.reddit_topic_id, &src_ids.reddit_topic_id, policy)
            }
            MovieField::LetterboxdId => {
                merge_option(&mut ids.letterboxd_id, &src_ids.letterboxd_id, policy)
            }
            MovieField::MetacriticId => {
                merge_option(&mut ids.metacritic_id, &src_ids.metacritic_id, policy)
            }
            MovieField::AllMovieId => {
                merge_option(&mut ids.all_movie_id, &src_ids.all_movie_id, policy)
            }
            MovieField::DisneyPlusId => {
                merge_option(&mut ids.disney_plus_id, &src_ids.disney_plus_id, policy)
            }
            MovieField::HboMaxId => merge_option(&mut ids.hbo_max_id, &src_ids.hbo_max_id, policy),
        }
    }
}

/// Apply a source's policy table. Returns the number of fields written.
pub fn apply_partial(
    movie: &mut Movie,
    src: &PartialMovie,
    table: &[(MovieField, MergePolicy)],
) -> usize {
    table
        .iter()
        .filter(|(field, policy)| field.merge(movie, src, *policy))
        .count()
}

/// Keep the IMDB rating/votes pair with the strictly larger vote count.
///
/// A candidate pair is only considered when both halves are present. Ties
/// keep the existing pair. Returns whether the pair was replaced.
pub fn reconcile_imdb_rating(movie: &mut Movie, rating: Option<f64>, votes: Option<u64>) -> bool {
    let (Some(rating), Some(votes)) = (rating, votes) else {
        return false;
    };
    let replace = match (movie.imdb_rating, movie.imdb_votes) {
        (Some(_), Some(existing)) => votes > existing,
        _ => true,
    };
    if replace {
        movie.imdb_rating = Some(rating);
        movie.imdb_votes = Some(votes);
    }
    replace
}

/// In-memory view of every secondary-source cache, loaded once per run.
///
/// Keys: tmdb id (as a decimal string) for Rotten Tomatoes and Wikidata,
/// imdb id for everything else.
#[derive(Debug, Default, Clone)]
pub struct SourceSet {
    pub imdb_titles: HashMap<String, ImdbTitle>,
    pub imdb_ratings: HashMap<String, ImdbRating>,
    pub rt: HashMap<String, RtMovie>,
    pub wikidata: HashMap<String, WikidataMovie>,
    pub flick_metrix: HashMap<String, FlickMetrixMovie>,
    pub omdb: HashMap<String, OmdbMovie>,
}

/// Merge every secondary source into `movie`, in the fixed order.
///
/// # Errors
/// Returns the drop reason from the IMDB merge (non-movie type, short film).
pub fn merge_sources(movie: &mut Movie, sources: &SourceSet) -> Verdict {
    let tmdb_key = movie.tmdb_id.to_string();
    let imdb_key = movie.imdb_id.clone().unwrap_or_default();

    imdb::merge_imdb(
        movie,
        sources.imdb_titles.get(&imdb_key),
        sources.imdb_ratings.get(&imdb_key),
    )?;

    if let Some(rt) = sources.rt.get(&tmdb_key) {
        let written = apply_partial(movie, rt, tables::RT_FIELDS);
        trace!(tmdb_id = movie.tmdb_id, source = "rt", written, "Merged source");
    }

    if let Some(wikidata) = sources.wikidata.get(&tmdb_key) {
        let written = apply_partial(movie, wikidata, tables::WIKIDATA_FIELDS);
        trace!(tmdb_id = movie.tmdb_id, source = "wikidata", written, "Merged source");
    }

    if let Some(row) = sources.flick_metrix.get(&imdb_key) {
        let partial = row.to_partial();
        let written = apply_partial(movie, &partial, tables::FLICK_METRIX_FIELDS);
        reconcile_imdb_rating(movie, partial.imdb_rating, partial.imdb_votes);
        trace!(tmdb_id = movie.tmdb_id, source = "flick_metrix", written, "Merged source");
    }

    if let Some(omdb) = sources.omdb.get(&imdb_key) {
        let written = apply_partial(movie, &omdb.to_partial(), tables::OMDB_FIELDS);
        trace!(tmdb_id = movie.tmdb_id, source = "omdb", written, "Merged source");
    }

    Ok(())
}
