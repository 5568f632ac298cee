//! Exclusion filters over a merged record

use crate::error::{DropReason, Verdict};
use crate::models::Movie;

/// Merged keywords that mark a title as not a standalone film
pub const KEYWORD_BLACKLIST: &[&str] = &[
    "edited from tv series",
    "compilation movie",
    "live performance",
];

/// Lower-case title prefixes of stage-recording distribution labels
pub const TITLE_PREFIX_BLACKLIST: &[&str] = &["national theatre live"];

struct ExclusionRule {
    reason: DropReason,
    matches: fn(&Movie) -> bool,
}

fn has_blacklisted_keyword(movie: &Movie) -> bool {
    KEYWORD_BLACKLIST.iter().any(|k| movie.has_keyword(k))
}

fn has_blacklisted_title(movie: &Movie) -> bool {
    let title = movie.title.to_lowercase();
    TITLE_PREFIX_BLACKLIST.iter().any(|p| title.starts_with(p))
}

/// `music` alone is usually a music video; `music` + `documentary` a band
/// documentary.
fn is_music_only(movie: &Movie) -> bool {
    if !movie.has_genre("music") {
        return false;
    }
    match movie.genres.len() {
        1 => true,
        2 => movie.has_genre("documentary"),
        _ => false,
    }
}

const EXCLUSION_RULES: &[ExclusionRule] = &[
    ExclusionRule {
        reason: DropReason::BlacklistedKeyword,
        matches: has_blacklisted_keyword,
    },
    ExclusionRule {
        reason: DropReason::BlacklistedTitle,
        matches: has_blacklisted_title,
    },
    ExclusionRule {
        reason: DropReason::MusicOnly,
        matches: is_music_only,
    },
];

/// First matching exclusion rule, if any
pub fn check_exclusions(movie: &Movie) -> Verdict {
    match EXCLUSION_RULES.iter().find(|rule| (rule.matches)(movie)) {
        Some(rule) => Err(rule.reason),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, genres: &[&str], keywords: &[&str]) -> Movie {
        Movie {
            title: title.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_keyword_blacklist() {
        let m = movie("Concert", &["drama"], &["live performance"]);
        assert_eq!(check_exclusions(&m), Err(DropReason::BlacklistedKeyword));
    }

    #[test]
    fn test_title_prefix_case_insensitive() {
        let m = movie("National Theatre Live: Hamlet", &["drama"], &[]);
        assert_eq!(check_exclusions(&m), Err(DropReason::BlacklistedTitle));
    }

    #[test]
    fn test_music_rules() {
        assert_eq!(
            check_exclusions(&movie("Clip", &["music"], &[])),
            Err(DropReason::MusicOnly)
        );
        assert_eq!(
            check_exclusions(&movie("Tour", &["music", "documentary"], &[])),
            Err(DropReason::MusicOnly)
        );
        assert_eq!(check_exclusions(&movie("Musical", &["music", "drama"], &[])), Ok(()));
        assert_eq!(
            check_exclusions(&movie("Biopic", &["music", "documentary", "history"], &[])),
            Ok(())
        );
    }

    #[test]
    fn test_plain_feature_passes() {
        assert_eq!(check_exclusions(&movie("Heat", &["crime", "drama"], &["heist"])), Ok(()));
    }
}
