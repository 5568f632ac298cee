//! FlickMetrix listing rows, keyed by imdb id in their cache

use super::partial::PartialMovie;
use serde::{Deserialize, Serialize};

/// FlickMetrix listing row (subset). Field names follow the upstream JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickMetrixMovie {
    #[serde(rename = "ID")]
    pub id: Option<i64>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Cast")]
    pub cast: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Production")]
    pub production: Option<String>,
    #[serde(rename = "Awards")]
    pub awards: Option<String>,
    #[serde(rename = "CriticRating")]
    pub critic_rating: Option<f64>,
    #[serde(rename = "CriticReviews")]
    pub critic_reviews: Option<u64>,
    #[serde(rename = "AudienceRating")]
    pub audience_rating: Option<f64>,
    #[serde(rename = "AudienceReviews")]
    pub audience_reviews: Option<u64>,
    #[serde(rename = "RTUrl")]
    pub rt_url: Option<String>,
    #[serde(rename = "LetterboxdScore")]
    pub letterboxd_score: Option<f64>,
    /// Lower-case `l` upstream
    #[serde(rename = "letterboxdVotes")]
    pub letterboxd_votes: Option<u64>,
    #[serde(rename = "ComboScore")]
    pub combo_score: Option<f64>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<f64>,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: Option<u64>,
}

impl FlickMetrixMovie {
    /// Project into canonical field names.
    pub fn to_partial(&self) -> PartialMovie {
        let cast = self.cast.as_deref().map(|cast| {
            cast.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        let rt_url = self
            .rt_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/').to_string());

        PartialMovie {
            imdb_id: self.imdb_id.clone(),
            cast,
            director: self.director.clone(),
            plot: self.plot.clone(),
            production: self.production.clone(),
            awards_summary: self.awards.clone(),
            rt_critic_rating: self.critic_rating,
            rt_critic_votes: self.critic_reviews,
            rt_audience_rating: self.audience_rating,
            rt_audience_votes: self.audience_reviews,
            rt_url,
            letterboxd_score: self.letterboxd_score,
            letterboxd_votes: self.letterboxd_votes,
            // upstream uses 0 for "no id"
            flick_metrix_id: self.id.filter(|id| *id != 0),
            flick_metrix_score: self.combo_score,
            imdb_rating: self.imdb_rating,
            imdb_votes: self.imdb_votes,
            ..Default::default()
        }
    }
}
