//! Normalized search key
//!
//! Title, original title and the first few directors, each lower-cased
//! plus a punctuation-normalized, diacritic-free variant. De-duplicated in
//! order, joined with `". "`, at most [`MAX_SEARCH_KEY_CHARS`] characters.

use crate::models::Movie;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const MAX_SEARCH_KEY_CHARS: usize = 1024;
const MAX_DIRECTORS: usize = 3;
const SEPARATOR: &str = ". ";

static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-:.]").expect("punctuation regex should compile"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should compile"));

/// Decompose and drop combining marks (`é` → `e`)
fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn normalized_variant(s: &str) -> String {
    let spaced = PUNCTUATION.replace_all(s, " ");
    let collapsed = WHITESPACE.replace_all(&spaced, " ");
    strip_diacritics(collapsed.trim())
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn build_search_key(movie: &Movie) -> String {
    let directors = movie
        .director
        .as_deref()
        .into_iter()
        .flat_map(|d| d.split(','))
        .take(MAX_DIRECTORS);

    let sources = std::iter::once(movie.title.as_str())
        .chain(movie.original_title.as_deref())
        .chain(directors);

    let mut parts: Vec<String> = Vec::new();
    for source in sources {
        let lowered = source.trim().to_lowercase();
        if lowered.is_empty() {
            continue;
        }
        let variant = normalized_variant(&lowered);
        for part in [lowered, variant] {
            if !part.is_empty() && !parts.contains(&part) {
                parts.push(part);
            }
        }
    }

    let key = parts.join(SEPARATOR);
    truncate_chars(key.trim(), MAX_SEARCH_KEY_CHARS).to_string()
}
