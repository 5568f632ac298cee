//! Best-trailer selection
//!
//! Deterministic: the same video list always yields the same choice.
//!
//! 1. Keep YouTube videos with a non-empty name and key.
//! 2. Take the first non-empty partition: `Trailer`, `Teaser`, `Clip`,
//!    English videos, everything.
//! 3. Return the first video matching the earliest name rule.
//! 4. Fall back to the first English video, then the first video.

use crate::models::tmdb::Video;
use once_cell::sync::Lazy;
use regex::Regex;

enum NameRule {
    Pattern(Regex),
    /// Case-sensitive full-name equality
    Exact(&'static str),
}

impl NameRule {
    fn matches(&self, name: &str) -> bool {
        match self {
            NameRule::Pattern(re) => re.is_match(name),
            NameRule::Exact(expected) => name == *expected,
        }
    }
}

fn pattern(re: &str) -> NameRule {
    NameRule::Pattern(Regex::new(re).expect("trailer name regex should compile"))
}

/// Most specific first
static NAME_RULES: Lazy<Vec<NameRule>> = Lazy::new(|| {
    vec![
        pattern(r"(?i)^official trailer$"),
        pattern(r"(?i)\bofficial\s*us\s*trailer\b"),
        pattern(r"(?i)\bofficial\s*final\s*trailer\b"),
        pattern(r"(?i)\bofficial\s*trailer\b"),
        pattern(r"(?i)official.+trailer"),
        pattern(r"(?i)\btrailer\b"),
        pattern(r"(?i)trailer"),
        NameRule::Exact("Official Teaser"),
        pattern(r"(?i)official.+teaser"),
        pattern(r"(?i)\bteaser\b"),
        pattern(r"(?i)\bpreview\b"),
        pattern(r"(?i)\bsneak peek\b"),
        pattern(r"(?i)teaser"),
        pattern(r"(?i)preview"),
        pattern(r"(?i)sneak peek"),
    ]
});

const TYPE_PRIORITY: [&str; 3] = ["Trailer", "Teaser", "Clip"];

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.is_empty()).unwrap_or(false)
}

fn is_english(video: &Video) -> bool {
    video.iso_639_1.as_deref() == Some("en")
}

fn is_candidate(video: &Video) -> bool {
    let on_youtube = video
        .site
        .as_deref()
        .map(|s| s.eq_ignore_ascii_case("youtube"))
        .unwrap_or(false);
    on_youtube && non_empty(&video.name) && non_empty(&video.key)
}

/// Pick the video most likely to be the film's main trailer.
///
/// Returns `None` when no YouTube video with a name and key exists.
pub fn best_trailer(videos: &[Video]) -> Option<&Video> {
    let usable: Vec<&Video> = videos.iter().filter(|v| is_candidate(v)).collect();

    let by_type = TYPE_PRIORITY.iter().map(|wanted| {
        usable
            .iter()
            .copied()
            .filter(|v| v.video_type.as_deref() == Some(*wanted))
            .collect::<Vec<_>>()
    });
    let english = std::iter::once(
        usable
            .iter()
            .copied()
            .filter(|v| is_english(v))
            .collect::<Vec<_>>(),
    );
    let everything = std::iter::once(usable.clone());

    let partition: Vec<&Video> = by_type
        .chain(english)
        .chain(everything)
        .find(|p: &Vec<&Video>| !p.is_empty())?;

    for rule in NAME_RULES.iter() {
        if let Some(video) = partition
            .iter()
            .find(|v| rule.matches(v.name.as_deref().unwrap_or("")))
        {
            return Some(*video);
        }
    }

    partition
        .iter()
        .find(|v| is_english(v))
        .or_else(|| partition.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(name: &str, key: &str, video_type: &str) -> Video {
        Video {
            iso_639_1: Some("en".to_string()),
            name: Some(name.to_string()),
            key: Some(key.to_string()),
            site: Some("YouTube".to_string()),
            video_type: Some(video_type.to_string()),
            official: Some(true),
        }
    }

    fn chosen_key(videos: &[Video]) -> Option<&str> {
        best_trailer(videos).and_then(|v| v.key.as_deref())
    }

    #[test]
    fn test_trailer_type_beats_teaser_type() {
        let videos = vec![
            video("Official Teaser", "teaser", "Teaser"),
            video("Main Trailer", "trailer", "Trailer"),
        ];
        assert_eq!(chosen_key(&videos), Some("trailer"));
    }

    #[test]
    fn test_official_us_trailer_beats_generic_trailer() {
        let videos = vec![
            video("trailer", "generic", "Trailer"),
            video("Official US Trailer", "us", "Trailer"),
        ];
        assert_eq!(chosen_key(&videos), Some("us"));
    }

    #[test]
    fn test_exact_official_trailer_wins() {
        let videos = vec![
            video("Official Trailer #2", "second", "Trailer"),
            video("official trailer", "exact", "Trailer"),
        ];
        assert_eq!(chosen_key(&videos), Some("exact"));
    }

    #[test]
    fn test_non_youtube_and_incomplete_videos_ignored() {
        let mut vimeo = video("Official Trailer", "vimeo", "Trailer");
        vimeo.site = Some("Vimeo".to_string());
        let mut no_key = video("Official Trailer", "", "Trailer");
        no_key.key = None;

        assert_eq!(chosen_key(&[vimeo, no_key]), None);
    }

    #[test]
    fn test_falls_back_to_clip_partition() {
        let videos = vec![
            video("Behind the scenes", "bts", "Featurette"),
            video("Opening scene", "clip", "Clip"),
        ];
        assert_eq!(chosen_key(&videos), Some("clip"));
    }

    #[test]
    fn test_unmatched_names_prefer_english() {
        let mut french = video("Extrait", "fr", "Featurette");
        french.iso_639_1 = Some("fr".to_string());
        let english = video("Interview", "en", "Featurette");

        assert_eq!(chosen_key(&[french.clone(), english]), Some("en"));
        assert_eq!(chosen_key(&[french]), Some("fr"));
    }

    #[test]
    fn test_exact_official_teaser_is_case_sensitive() {
        let videos = vec![
            video("official teaser", "lower", "Teaser"),
            video("Official Teaser", "exact", "Teaser"),
        ];
        // lower-case name only matches a later rule
        assert_eq!(chosen_key(&videos), Some("exact"));
    }

    #[test]
    fn test_empty_list() {
        assert!(best_trailer(&[]).is_none());
    }
}
