//! IMDB source records
//!
//! [`ImdbTitle`] is a scraped title page held in the IMDB title cache.
//! [`ImdbRating`] is one row of the official `title.ratings.tsv` dump.

use serde::{Deserialize, Serialize};

/// Scraped IMDB title page (subset)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImdbTitle {
    pub genres: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub countries_of_origin: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    /// Content rating, e.g. `R`
    pub age_category_title: Option<String>,
    pub plot: Option<String>,
    pub box_office: Option<BoxOffice>,
    pub main_rate: Option<Rate>,
    pub all_rates: Vec<Rate>,
    /// `movie`, `video`, `tvSpecial`, `tvMovie`, `series`, ...
    pub main_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxOffice {
    pub budget: Option<i64>,
    pub worldwide: Option<i64>,
}

/// A rating observation attached to a title page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rate {
    /// `IMDb`, `Metacritics`, ...
    pub rate_source: Option<String>,
    pub rate: Option<f64>,
    pub votes_count: Option<u64>,
}

impl Rate {
    pub fn is_from(&self, source: &str) -> bool {
        self.rate_source
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case(source))
            .unwrap_or(false)
    }
}

/// Row of the IMDB ratings dump
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImdbRating {
    pub rating: f64,
    pub num_votes: u64,
}
