//! IMDB merge: title-page metadata, ratings dump and type-driven rejection
//!
//! IMDB is merged first and is preferred over TMDB for most fields it
//! carries. Its title type decides whether the record is a film at all.

use super::reconcile_imdb_rating;
use crate::classify::standup::is_standup_special;
use crate::converter::genres::normalize_genres;
use crate::error::{DropReason, Verdict};
use crate::models::{ImdbRating, ImdbTitle, Movie};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static READ_ALL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.\.\. read all$").expect("read-all regex should compile"));

const TRUNCATED_PLOT_MARKER: &str = "Read all";

/// Title types that are kept without further checks
const FILM_TYPES: [&str; 2] = ["movie", "video"];

/// Title type that is kept only when it is a stand-up special
const TV_SPECIAL: &str = "tvSpecial";

fn non_empty_list(list: &Option<Vec<String>>) -> Option<&Vec<String>> {
    list.as_ref().filter(|l| !l.is_empty())
}

/// Copy title-page fields onto the record.
fn apply_title(movie: &mut Movie, title: &ImdbTitle) {
    if let Some(genres) = &title.genres {
        movie.add_genres(normalize_genres(genres));
    }
    if let Some(keywords) = non_empty_list(&title.keywords) {
        movie.keywords = keywords.clone();
    }
    if let Some(countries) = non_empty_list(&title.countries_of_origin) {
        movie.countries_of_origin = countries.clone();
    }
    if let Some(languages) = non_empty_list(&title.languages) {
        movie.languages = languages.clone();
    }
    if let Some(rating) = title.age_category_title.as_deref().filter(|r| !r.trim().is_empty()) {
        movie.mpaa_rating = Some(rating.to_string());
    }

    if let Some(plot) = title.plot.as_deref().filter(|p| !p.trim().is_empty()) {
        let has_plot = movie.plot.as_deref().map(|p| !p.is_empty()).unwrap_or(false);
        let truncated = plot.trim().ends_with(TRUNCATED_PLOT_MARKER);
        if !(has_plot && truncated) {
            movie.plot = Some(READ_ALL_SUFFIX.replace(plot, "...").into_owned());
        }
    }

    if let Some(box_office) = &title.box_office {
        if let Some(budget) = box_office.budget.filter(|b| *b > 0) {
            movie.budget = Some(budget);
        }
        if let Some(worldwide) = box_office.worldwide.filter(|w| *w > 0) {
            movie.revenue = Some(worldwide);
        }
    }

    if let Some(main_rate) = title.main_rate.as_ref().filter(|r| r.is_from("imdb")) {
        if let (Some(rate), Some(votes)) = (main_rate.rate, main_rate.votes_count) {
            movie.imdb_rating = Some(rate);
            movie.imdb_votes = Some(votes);
        }
    }

    if let Some(metacritic) = title.all_rates.iter().find(|r| r.is_from("metacritics")) {
        movie.metacritic_rating = metacritic.rate;
        movie.metacritic_votes = metacritic.votes_count;
    }

    if let Some(main_type) = title.main_type.as_deref().filter(|t| !t.is_empty()) {
        movie.imdb_type = Some(main_type.to_string());
    }
}

/// Decide from the merged type/genres whether the record is a film.
///
/// Stand-up classification runs before the type filter, so a `tvSpecial`
/// that is a stand-up special survives.
fn check_title_type(movie: &mut Movie) -> Verdict {
    if movie.has_genre("short") {
        if movie.imdb_type.as_deref() == Some("movie") {
            movie.imdb_type = Some("short".to_string());
            debug!(
                tmdb_id = movie.tmdb_id,
                imdb_id = movie.imdb_id_str(),
                "Reclassified movie as short"
            );
        }
        return Err(DropReason::ShortFilm);
    }

    let Some(title_type) = movie.imdb_type.as_deref() else {
        return Ok(());
    };
    if FILM_TYPES.contains(&title_type) {
        return Ok(());
    }
    if title_type == TV_SPECIAL && is_standup_special(movie) {
        debug!(tmdb_id = movie.tmdb_id, "Keeping stand-up tv special");
        return Ok(());
    }
    Err(DropReason::NonMovieType)
}

/// Merge IMDB title-page data and the ratings-dump row into `movie`.
///
/// # Errors
/// - `DropReason::ShortFilm` when the merged genres contain `short`
/// - `DropReason::NonMovieType` when the title type is not a film
pub fn merge_imdb(
    movie: &mut Movie,
    title: Option<&ImdbTitle>,
    rating: Option<&ImdbRating>,
) -> Verdict {
    if let Some(title) = title {
        apply_title(movie, title);
        check_title_type(movie)?;
    }

    if let Some(rating) = rating {
        reconcile_imdb_rating(movie, Some(rating.rating), Some(rating.num_votes));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::imdb::{BoxOffice, Rate};

    fn movie() -> Movie {
        Movie {
            tmdb_id: 10,
            imdb_id: Some("tt0000010".to_string()),
            title: "Feature".to_string(),
            plot: Some("TMDB overview".to_string()),
            genres: vec!["drama".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_imdb_genres_share_tmdb_vocabulary() {
        let mut movie = Movie {
            genres: vec!["scifi".to_string()],
            ..movie()
        };
        let title = ImdbTitle {
            genres: Some(vec!["Sci-Fi".to_string(), "Action".to_string()]),
            main_type: Some("movie".to_string()),
            ..Default::default()
        };

        assert_eq!(merge_imdb(&mut movie, Some(&title), None), Ok(()));
        assert_eq!(movie.genres, vec!["scifi", "action"]);
    }

    fn title(main_type: &str) -> ImdbTitle {
        ImdbTitle {
            genres: Some(vec!["Drama".to_string(), "Thriller".to_string()]),
            keywords: Some(vec!["heist".to_string()]),
            countries_of_origin: Some(vec!["United States".to_string()]),
            age_category_title: Some("R".to_string()),
            plot: Some("A crew plans one last job.".to_string()),
            box_office: Some(BoxOffice {
                budget: Some(60_000_000),
                worldwide: Some(0),
            }),
            main_rate: Some(Rate {
                rate_source: Some("IMDb".to_string()),
                rate: Some(8.3),
                votes_count: Some(700_000),
            }),
            all_rates: vec![Rate {
                rate_source: Some("Metacritics".to_string()),
                rate: Some(76.0),
                votes_count: Some(22),
            }],
            main_type: Some(main_type.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_title_fields_applied() {
        let mut m = movie();
        assert_eq!(merge_imdb(&mut m, Some(&title("movie")), None), Ok(()));

        assert_eq!(m.genres, vec!["drama", "thriller"]);
        assert_eq!(m.keywords, vec!["heist"]);
        assert_eq!(m.mpaa_rating.as_deref(), Some("R"));
        assert_eq!(m.plot.as_deref(), Some("A crew plans one last job."));
        assert_eq!(m.budget, Some(60_000_000));
        assert_eq!(m.revenue, None);
        assert_eq!(m.imdb_rating, Some(8.3));
        assert_eq!(m.imdb_votes, Some(700_000));
        assert_eq!(m.metacritic_rating, Some(76.0));
        assert_eq!(m.imdb_type.as_deref(), Some("movie"));
    }

    #[test]
    fn test_truncated_plot_ignored_when_plot_exists() {
        let mut m = movie();
        let mut t = title("movie");
        t.plot = Some("A crew plans... Read all".to_string());
        merge_imdb(&mut m, Some(&t), None).unwrap();
        assert_eq!(m.plot.as_deref(), Some("TMDB overview"));
    }

    #[test]
    fn test_read_all_suffix_rewritten() {
        let mut m = movie();
        m.plot = None;
        let mut t = title("movie");
        t.plot = Some("A crew plans... read all".to_string());
        merge_imdb(&mut m, Some(&t), None).unwrap();
        assert_eq!(m.plot.as_deref(), Some("A crew plans..."));
    }

    #[test]
    fn test_ratings_dump_wins_with_more_votes() {
        let mut m = movie();
        let dump = ImdbRating {
            rating: 8.4,
            num_votes: 710_000,
        };
        merge_imdb(&mut m, Some(&title("movie")), Some(&dump)).unwrap();
        assert_eq!(m.imdb_rating, Some(8.4));
        assert_eq!(m.imdb_votes, Some(710_000));

        let stale = ImdbRating {
            rating: 5.0,
            num_votes: 710_000,
        };
        merge_imdb(&mut m, None, Some(&stale)).unwrap();
        assert_eq!(m.imdb_rating, Some(8.4));
    }

    #[test]
    fn test_ratings_dump_alone() {
        let mut m = movie();
        let dump = ImdbRating {
            rating: 6.1,
            num_votes: 1_500,
        };
        merge_imdb(&mut m, None, Some(&dump)).unwrap();
        assert_eq!(m.imdb_rating, Some(6.1));
        assert_eq!(m.imdb_type, None);
    }

    #[test]
    fn test_series_rejected() {
        let mut m = movie();
        assert_eq!(
            merge_imdb(&mut m, Some(&title("tvSeries")), None),
            Err(DropReason::NonMovieType)
        );
    }

    #[test]
    fn test_video_kept() {
        let mut m = movie();
        assert_eq!(merge_imdb(&mut m, Some(&title("video")), None), Ok(()));
    }

    #[test]
    fn test_short_reclassified_then_dropped() {
        let mut m = movie();
        let mut t = title("movie");
        t.genres = Some(vec!["Short".to_string()]);
        assert_eq!(merge_imdb(&mut m, Some(&t), None), Err(DropReason::ShortFilm));
        assert_eq!(m.imdb_type.as_deref(), Some("short"));
    }

    #[test]
    fn test_standup_tv_special_kept() {
        let mut m = movie();
        m.genres = vec!["comedy".to_string()];
        let mut t = title("tvSpecial");
        t.genres = Some(vec!["Comedy".to_string()]);
        t.keywords = Some(vec!["stand-up special".to_string()]);
        assert_eq!(merge_imdb(&mut m, Some(&t), None), Ok(()));
        assert_eq!(m.imdb_type.as_deref(), Some("tvSpecial"));
    }

    #[test]
    fn test_other_tv_special_rejected() {
        let mut m = movie();
        assert_eq!(
            merge_imdb(&mut m, Some(&title("tvSpecial")), None),
            Err(DropReason::NonMovieType)
        );
    }
}
