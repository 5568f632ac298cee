//! Genre vocabulary normalization

/// Source genre name → canonical genre name (both lower-case)
const GENRE_SYNONYMS: &[(&str, &str)] = &[
    ("science fiction", "scifi"),
    ("sci-fi", "scifi"),
    ("tv movie", "tv-movie"),
];

/// Lower-case, trim and map through the synonym table.
///
/// Returns `None` for blank names.
pub fn normalize_genre(name: &str) -> Option<String> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }

    let canonical = GENRE_SYNONYMS
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or(name);
    Some(canonical)
}

/// Normalize a list of genre names into a de-duplicated ordered set.
pub fn normalize_genres<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut genres: Vec<String> = Vec::new();
    for genre in names.into_iter().filter_map(|n| normalize_genre(n.as_ref())) {
        if !genres.contains(&genre) {
            genres.push(genre);
        }
    }
    genres
}
