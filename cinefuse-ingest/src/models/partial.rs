//! Partial movie records supplied by secondary sources
//!
//! The Rotten Tomatoes and Wikidata caches store records in the canonical
//! vocabulary directly. FlickMetrix and OMDB rows are projected into the
//! same shape before merging.

use super::movie::ExternalIds;
use serde::{Deserialize, Serialize};

/// A secondary-source observation. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialMovie {
    pub tmdb_id: Option<i64>,
    pub imdb_id: Option<String>,
    #[serde(flatten)]
    pub external_ids: ExternalIds,

    pub title: Option<String>,
    pub mpaa_rating: Option<String>,
    pub plot: Option<String>,
    pub runtime: Option<u32>,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub homepage: Option<String>,
    pub cast: Option<Vec<String>>,
    pub director: Option<String>,
    pub production: Option<String>,
    pub awards_summary: Option<String>,

    pub imdb_rating: Option<f64>,
    pub imdb_votes: Option<u64>,

    pub metacritic_rating: Option<f64>,
    pub metacritic_votes: Option<u64>,

    pub rt_critic_rating: Option<f64>,
    pub rt_critic_votes: Option<u64>,
    pub rt_audience_rating: Option<f64>,
    pub rt_audience_votes: Option<u64>,
    pub rt_critics_consensus: Option<String>,
    pub rt_url: Option<String>,
    pub rt_id: Option<String>,
    pub ems_id: Option<String>,

    pub letterboxd_score: Option<f64>,
    pub letterboxd_votes: Option<u64>,

    pub flick_metrix_id: Option<i64>,
    pub flick_metrix_score: Option<f64>,
}

/// Rotten Tomatoes scrape result, keyed by tmdb id in its cache
pub type RtMovie = PartialMovie;

/// Wikidata entity resolved into canonical fields, keyed by tmdb id
pub type WikidataMovie = PartialMovie;
