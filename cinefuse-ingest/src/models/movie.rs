//! Canonical movie record
//!
//! Every source is merged into [`Movie`]. Serialized field names are
//! camelCase so checkpoint files and the secondary-source caches share one
//! vocabulary.

use serde::{Deserialize, Serialize};

/// Canonical movie record
///
/// Rating observations are `Option`: `None` means unknown, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Movie {
    // ========================================================================
    // Identity
    // ========================================================================
    pub tmdb_id: i64,
    pub imdb_id: Option<String>,
    #[serde(flatten)]
    pub external_ids: ExternalIds,

    // ========================================================================
    // General metadata
    // ========================================================================
    pub title: String,
    pub original_title: Option<String>,
    pub language: Option<String>,
    /// `YYYY-MM-DD`
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    /// Lower-cased, de-duplicated, insertion ordered
    pub genres: Vec<String>,
    pub plot: Option<String>,
    /// Minutes
    pub runtime: Option<u32>,
    pub adult: bool,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub homepage: Option<String>,
    /// Lower-cased TMDB status (`released`, `post production`, ...)
    pub status: Option<String>,
    /// Content rating (e.g. `PG-13`)
    pub mpaa_rating: Option<String>,
    pub keywords: Vec<String>,
    pub countries_of_origin: Vec<String>,
    pub languages: Vec<String>,
    pub cast: Vec<String>,
    /// Comma separated when there are several
    pub director: Option<String>,
    pub production: Option<String>,
    pub awards_summary: Option<String>,

    // ========================================================================
    // Media
    // ========================================================================
    pub poster_url: Option<String>,
    pub poster_placeholder_url: Option<String>,
    pub poster_width: Option<u32>,
    pub poster_height: Option<u32>,
    pub backdrop_url: Option<String>,
    pub backdrop_placeholder_url: Option<String>,
    pub backdrop_width: Option<u32>,
    pub backdrop_height: Option<u32>,
    pub trailer_url: Option<String>,
    #[serde(rename = "trailerYouTubeId")]
    pub trailer_youtube_id: Option<String>,

    // ========================================================================
    // Ratings
    // ========================================================================
    pub imdb_rating: Option<f64>,
    pub imdb_votes: Option<u64>,
    /// IMDB title type (`movie`, `video`, `tvSpecial`, `short`, ...)
    pub imdb_type: Option<String>,

    pub tmdb_popularity: Option<f64>,
    pub tmdb_rating: Option<f64>,
    pub tmdb_votes: Option<u64>,

    pub metacritic_rating: Option<f64>,
    pub metacritic_votes: Option<u64>,

    /// Rotten Tomatoes ratings are on a 0-100 scale
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

    // ========================================================================
    // Derived
    // ========================================================================
    pub foreign: bool,
    pub imdb_custom_popularity: f64,
    pub relevancy_score: f64,
    pub search_key: String,
}

impl Movie {
    /// Append genres, keeping the set lower-cased and free of duplicates.
    pub fn add_genres<I, S>(&mut self, genres: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for genre in genres {
            let genre = genre.as_ref().trim().to_lowercase();
            if !genre.is_empty() && !self.genres.contains(&genre) {
                self.genres.push(genre);
            }
        }
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// IMDB id as `&str`, or `""` when unknown
    pub fn imdb_id_str(&self) -> &str {
        self.imdb_id.as_deref().unwrap_or("")
    }
}

/// Wikidata, social and streaming-platform identifiers. Not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalIds {
    pub wikidata_id: Option<String>,
    pub facebook_id: Option<String>,
    pub instagram_id: Option<String>,
    pub twitter_id: Option<String>,
    pub twitter_username: Option<String>,
    pub netflix_id: Option<String>,
    pub hulu_id: Option<String>,
    pub amazon_id: Option<String>,
    #[serde(rename = "appleTVId")]
    pub apple_tv_id: Option<String>,
    #[serde(rename = "googleKGId")]
    pub google_kg_id: Option<String>,
    #[serde(rename = "traktTVId")]
    pub trakt_tv_id: Option<String>,
    pub reddit_topic_id: Option<String>,
    pub letterboxd_id: Option<String>,
    pub metacritic_id: Option<String>,
    pub all_movie_id: Option<String>,
    pub disney_plus_id: Option<String>,
    pub hbo_max_id: Option<String>,
}
