//! Stand-up special detection
//!
//! An ordered rule table evaluated top to bottom; the first rule that
//! returns `Some(decision)` decides. No rule deciding means "not stand-up".

use crate::models::Movie;
use once_cell::sync::Lazy;
use regex::Regex;

/// Genre appended to accepted records
pub const STANDUP_GENRE: &str = "stand-up";

/// Titles accepted without inspection
pub const STANDUP_EXCEPTION_IDS: &[&str] = &["tt1794821"];

/// Keywords that make a title a stand-up candidate
const STRONG_KEYWORDS: &[&str] = &["stand up", "stand-up", "stand up special", "stand-up special"];

/// Accepted without a strong signal only for non-`movie` title types
const LOOSE_KEYWORDS: &[&str] = &["stand up comedy", "stand-up comedy"];

/// Any of these confirms a candidate
const STANDUP_KEYWORDS: &[&str] = &[
    "tv special",
    "live performance",
    "stand up special",
    "stand-up special",
    "stand up comedy",
    "stand-up comedy",
    "stand up act",
    "stand-up act",
    "stand up routine",
    "stand-up routine",
    "stand up comedy performance",
    "stand-up comedy performance",
];

static PLOT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bstand[ -]up comedy special\b",
        r"\bstand[ -]up special\b",
        r"\bstand[ -]up comedy\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("stand-up plot regex should compile"))
    .collect()
});

fn has_any_keyword(movie: &Movie, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| movie.has_keyword(k))
}

fn plot_mentions_standup(movie: &Movie) -> bool {
    movie
        .plot
        .as_deref()
        .map(|plot| PLOT_PATTERNS.iter().any(|re| re.is_match(plot)))
        .unwrap_or(false)
}

fn has_strong_signal(movie: &Movie) -> bool {
    has_any_keyword(movie, STRONG_KEYWORDS) || plot_mentions_standup(movie)
}

// ============================================================================
// Rules
// ============================================================================

fn exception_id(movie: &Movie) -> Option<bool> {
    STANDUP_EXCEPTION_IDS
        .contains(&movie.imdb_id_str())
        .then_some(true)
}

/// Without a strong signal, only a loose keyword on a non-`movie` title
/// (likely a recorded set or Q&A video) is accepted.
fn weak_signal_only(movie: &Movie) -> Option<bool> {
    if has_strong_signal(movie) {
        return None;
    }
    let is_movie_type = movie.imdb_type.as_deref() == Some("movie");
    Some(has_any_keyword(movie, LOOSE_KEYWORDS) && !is_movie_type)
}

fn confirming_keyword(movie: &Movie) -> Option<bool> {
    has_any_keyword(movie, STANDUP_KEYWORDS).then_some(true)
}

/// Exactly {comedy} or {comedy, documentary}
fn comedy_only_genres(movie: &Movie) -> Option<bool> {
    let comedy = movie.has_genre("comedy");
    let accepted = match movie.genres.len() {
        1 => comedy,
        2 => comedy && movie.has_genre("documentary"),
        _ => false,
    };
    Some(accepted)
}

pub struct StandupRule {
    pub name: &'static str,
    pub decide: fn(&Movie) -> Option<bool>,
}

pub const STANDUP_RULES: &[StandupRule] = &[
    StandupRule {
        name: "exception_id",
        decide: exception_id,
    },
    StandupRule {
        name: "weak_signal_only",
        decide: weak_signal_only,
    },
    StandupRule {
        name: "confirming_keyword",
        decide: confirming_keyword,
    },
    StandupRule {
        name: "comedy_only_genres",
        decide: comedy_only_genres,
    },
];

/// Whether the record is likely a stand-up comedy special
pub fn is_standup_special(movie: &Movie) -> bool {
    STANDUP_RULES
        .iter()
        .find_map(|rule| (rule.decide)(movie))
        .unwrap_or(false)
}

/// Append [`STANDUP_GENRE`] when the record is a stand-up special.
pub fn tag_standup(movie: &mut Movie) -> bool {
    let accepted = is_standup_special(movie);
    if accepted {
        movie.add_genres([STANDUP_GENRE]);
    }
    accepted
}
