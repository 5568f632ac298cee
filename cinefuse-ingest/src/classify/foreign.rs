//! Foreign-film classification
//!
//! Ordered rule table; the first rule returning `Some(decision)` decides.
//! Vote and popularity thresholds are empirically tuned and kept as data.
//! Unknown IMDB votes count as zero.

use crate::models::Movie;

/// Languages most US audiences would call foreign regardless of popularity
pub const VERY_FOREIGN_LANGUAGES: &[&str] = &[
    "hi", "kn", "te", "fa", "id", "ta", "ml", "bn", "uk", "ar", "sr", "he", "hu", "th", "ur", "pa",
];

/// A non-English title from any of these countries is foreign
pub const FOREIGN_COUNTRIES: &[&str] = &["Iran", "India"];

/// An English title whose only country is one of these is foreign
pub const ENGLISH_FOREIGN_SOLE_COUNTRIES: &[&str] = &["United Arab Emirates", "India"];

/// `(language, imdb id)` pairs exempt from the per-language thresholds.
///
/// Checked after the very-foreign language and country rules, so an entry
/// whose language is in [`VERY_FOREIGN_LANGUAGES`] never takes effect.
pub const FOREIGN_EXCEPTIONS: &[(&str, &str)] = &[
    // The Act of Killing (shadowed by the "id" very-foreign rule)
    ("id", "tt2375605"),
    // Come and See
    ("ru", "tt0091251"),
];

/// Japanese animation with at least this many votes is not foreign
pub const ANIMATION_EXEMPT_VOTES: u64 = 70_000;

/// Foreign when votes < `max_votes` and (if set) popularity < `max_popularity`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub max_votes: u64,
    pub max_popularity: Option<f64>,
}

impl Threshold {
    const fn new(max_votes: u64, max_popularity: Option<f64>) -> Self {
        Self {
            max_votes,
            max_popularity,
        }
    }

    fn is_below(&self, votes: u64, popularity: f64) -> bool {
        votes < self.max_votes && self.max_popularity.map(|p| popularity < p).unwrap_or(true)
    }
}

pub const LANGUAGE_THRESHOLDS: &[(&str, Threshold)] = &[
    ("ko", Threshold::new(100_000, Some(150_000.0))),
    ("ja", Threshold::new(140_000, Some(150_000.0))),
    ("id", Threshold::new(200_000, None)),
    ("it", Threshold::new(300_000, Some(500_000.0))),
    ("de", Threshold::new(100_000, Some(150_000.0))),
    ("da", Threshold::new(100_000, Some(150_000.0))),
    ("zh", Threshold::new(150_000, Some(150_000.0))),
    ("ru", Threshold::new(200_000, None)),
];

pub const DEFAULT_THRESHOLD: Threshold = Threshold::new(200_000, Some(200_000.0));

fn language(movie: &Movie) -> &str {
    movie.language.as_deref().unwrap_or("")
}

fn votes(movie: &Movie) -> u64 {
    movie.imdb_votes.unwrap_or(0)
}

/// Number of distinct countries of origin
fn country_count(movie: &Movie) -> usize {
    let mut countries: Vec<&str> = movie.countries_of_origin.iter().map(String::as_str).collect();
    countries.sort_unstable();
    countries.dedup();
    countries.len()
}

// ============================================================================
// Rules
// ============================================================================

fn english(movie: &Movie) -> Option<bool> {
    if language(movie) != "en" {
        return None;
    }
    let sole_foreign_country = country_count(movie) == 1
        && movie
            .countries_of_origin
            .iter()
            .any(|c| ENGLISH_FOREIGN_SOLE_COUNTRIES.contains(&c.as_str()));
    Some(sole_foreign_country)
}

fn very_foreign_language(movie: &Movie) -> Option<bool> {
    VERY_FOREIGN_LANGUAGES.contains(&language(movie)).then_some(true)
}

fn foreign_country(movie: &Movie) -> Option<bool> {
    movie
        .countries_of_origin
        .iter()
        .any(|c| FOREIGN_COUNTRIES.contains(&c.as_str()))
        .then_some(true)
}

fn exception_id(movie: &Movie) -> Option<bool> {
    let key = (language(movie), movie.imdb_id_str());
    FOREIGN_EXCEPTIONS.contains(&key).then_some(false)
}

fn animation_exemption(movie: &Movie) -> Option<bool> {
    let exempt = language(movie) == "ja"
        && movie.has_genre("animation")
        && votes(movie) >= ANIMATION_EXEMPT_VOTES;
    exempt.then_some(false)
}

fn language_threshold(movie: &Movie) -> Option<bool> {
    let lang = language(movie);
    let threshold = LANGUAGE_THRESHOLDS
        .iter()
        .find(|(l, _)| *l == lang)
        .map(|(_, t)| *t)
        .unwrap_or(DEFAULT_THRESHOLD);
    Some(threshold.is_below(votes(movie), movie.imdb_custom_popularity))
}

pub struct ForeignRule {
    pub name: &'static str,
    pub decide: fn(&Movie) -> Option<bool>,
}

pub const FOREIGN_RULES: &[ForeignRule] = &[
    ForeignRule {
        name: "english",
        decide: english,
    },
    ForeignRule {
        name: "very_foreign_language",
        decide: very_foreign_language,
    },
    ForeignRule {
        name: "foreign_country",
        decide: foreign_country,
    },
    ForeignRule {
        name: "exception_id",
        decide: exception_id,
    },
    ForeignRule {
        name: "animation_exemption",
        decide: animation_exemption,
    },
    ForeignRule {
        name: "language_threshold",
        decide: language_threshold,
    },
];

/// Whether a US-centric audience would likely see the title as foreign.
///
/// Reads `imdb_custom_popularity`, so scoring must run first.
pub fn is_foreign(movie: &Movie) -> bool {
    FOREIGN_RULES
        .iter()
        .find_map(|rule| (rule.decide)(movie))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(language: &str, countries: &[&str], votes: u64, popularity: f64) -> Movie {
        Movie {
            imdb_id: Some("tt1234567".to_string()),
            language: Some(language.to_string()),
            countries_of_origin: countries.iter().map(|c| c.to_string()).collect(),
            imdb_votes: Some(votes),
            imdb_custom_popularity: popularity,
            ..Default::default()
        }
    }

    #[test]
    fn test_korean_boundary() {
        assert!(is_foreign(&movie("ko", &["South Korea"], 99_999, 149_999.0)));
        assert!(!is_foreign(&movie("ko", &["South Korea"], 100_000, 149_999.0)));
        assert!(!is_foreign(&movie("ko", &["South Korea"], 99_999, 150_000.0)));
    }

    #[test]
    fn test_english_sole_country() {
        assert!(is_foreign(&movie("en", &["India"], 1_000_000, 1e7)));
        assert!(!is_foreign(&movie("en", &["India", "United Kingdom"], 10, 10.0)));
        assert!(!is_foreign(&movie("en", &["United States"], 10, 10.0)));
    }

    #[test]
    fn test_very_foreign_language_and_country() {
        assert!(is_foreign(&movie("hi", &["United States"], 5_000_000, 1e8)));
        assert!(is_foreign(&movie("fr", &["Iran"], 5_000_000, 1e8)));
    }

    #[test]
    fn test_exceptions() {
        let mut come_and_see = movie("ru", &["Soviet Union"], 10_000, 10_000.0);
        come_and_see.imdb_id = Some("tt0091251".to_string());
        assert!(!is_foreign(&come_and_see));

        assert!(is_foreign(&movie("ru", &["Russia"], 199_999, 9e9)));
    }

    #[test]
    fn test_very_foreign_language_beats_exception() {
        let mut act_of_killing = movie("id", &["Denmark"], 10_000, 10_000.0);
        act_of_killing.imdb_id = Some("tt2375605".to_string());
        assert!(is_foreign(&act_of_killing));

        let decided_by = FOREIGN_RULES
            .iter()
            .find(|rule| (rule.decide)(&act_of_killing).is_some())
            .map(|rule| rule.name);
        assert_eq!(decided_by, Some("very_foreign_language"));
    }

    #[test]
    fn test_japanese_animation_exemption() {
        let mut anime = movie("ja", &["Japan"], 80_000, 80_000.0);
        anime.genres = vec!["animation".to_string()];
        assert!(!is_foreign(&anime));

        anime.imdb_votes = Some(60_000);
        assert!(is_foreign(&anime));

        assert!(is_foreign(&movie("ja", &["Japan"], 80_000, 80_000.0)));
    }

    #[test]
    fn test_default_threshold() {
        assert!(is_foreign(&movie("fr", &["France"], 199_999, 199_999.0)));
        assert!(!is_foreign(&movie("fr", &["France"], 250_000, 100_000.0)));
    }

    #[test]
    fn test_unknown_votes_count_as_zero() {
        let mut m = movie("es", &["Spain"], 0, 0.0);
        m.imdb_votes = None;
        assert!(is_foreign(&m));
    }
}
