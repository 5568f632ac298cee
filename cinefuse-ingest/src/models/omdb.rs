//! OMDB API records, keyed by imdb id in their cache
//!
//! OMDB reports every value as a string and uses `"N/A"` for missing data.

use super::partial::PartialMovie;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OmdbMovie {
    pub title: Option<String>,
    pub year: Option<String>,
    pub rated: Option<String>,
    pub runtime: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub awards: Option<String>,
    pub metascore: Option<String>,
    pub production: Option<String>,
    pub website: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
    #[serde(rename = "tomatoURL")]
    pub tomato_url: Option<String>,
    /// `"True"` or `"False"`
    pub response: Option<String>,
    pub error: Option<String>,
}

/// `None` for absent, blank or `"N/A"` values
fn available(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("n/a"))
        .map(str::to_string)
}

impl OmdbMovie {
    /// Whether OMDB answered with a title (as opposed to an error body)
    pub fn is_found(&self) -> bool {
        !matches!(self.response.as_deref(), Some(r) if r.eq_ignore_ascii_case("false"))
    }

    /// Drop every `"N/A"` field, keeping the record otherwise unchanged.
    pub fn without_placeholders(self) -> Self {
        Self {
            title: available(&self.title),
            year: available(&self.year),
            rated: available(&self.rated),
            runtime: available(&self.runtime),
            director: available(&self.director),
            actors: available(&self.actors),
            plot: available(&self.plot),
            awards: available(&self.awards),
            metascore: available(&self.metascore),
            production: available(&self.production),
            website: available(&self.website),
            imdb_id: available(&self.imdb_id),
            imdb_rating: available(&self.imdb_rating),
            imdb_votes: available(&self.imdb_votes),
            tomato_url: available(&self.tomato_url),
            response: self.response,
            error: self.error,
        }
    }

    /// Project into canonical field names.
    pub fn to_partial(&self) -> PartialMovie {
        PartialMovie {
            imdb_id: available(&self.imdb_id),
            director: available(&self.director),
            plot: available(&self.plot),
            mpaa_rating: available(&self.rated),
            production: available(&self.production),
            awards_summary: available(&self.awards),
            rt_url: available(&self.tomato_url).map(|u| u.trim_end_matches('/').to_string()),
            metacritic_rating: available(&self.metascore).and_then(|m| m.parse::<f64>().ok()),
            ..Default::default()
        }
    }
}
