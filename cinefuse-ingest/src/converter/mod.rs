//! Record converter: TMDB movie details → canonical [`Movie`]
//!
//! Pure transform. A record without an id or any title is reported as
//! [`DropReason::Unconvertible`] and filtered by the caller; nothing here is
//! fatal.

pub mod admission;
pub mod genres;
pub mod trailer;

pub use admission::admit;
pub use trailer::best_trailer;

use crate::error::{DropReason, Verdict};
use crate::models::tmdb::{Image, MovieDetails};
use crate::models::Movie;
use chrono::Datelike;
use cinefuse_common::time::parse_release_date;

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const POSTER_SIZE: &str = "w780";
const BACKDROP_SIZE: &str = "w1280";
const TRAILER_BASE_URL: &str = "https://youtube.com/watch?v=";
const MAX_CAST: usize = 10;

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn image_url(size: &str, path: &Option<String>) -> Option<String> {
    non_blank(path).map(|p| format!("{}/{}{}", IMAGE_BASE_URL, size, p))
}

/// Width and height of the image entry whose `file_path` matches `path`
fn image_dimensions(images: &[Image], path: &Option<String>) -> (Option<u32>, Option<u32>) {
    let Some(path) = path.as_deref() else {
        return (None, None);
    };
    images
        .iter()
        .find(|img| img.file_path.as_deref() == Some(path))
        .map(|img| (img.width, img.height))
        .unwrap_or((None, None))
}

/// Convert one primary-source record.
///
/// # Errors
/// `DropReason::Unconvertible` when the id is not positive or neither a
/// title nor an original title is present.
pub fn convert(details: &MovieDetails) -> Verdict<Movie> {
    if details.id <= 0 {
        return Err(DropReason::Unconvertible);
    }

    let original_title = non_blank(&details.original_title);
    let title = non_blank(&details.title)
        .or_else(|| original_title.clone())
        .ok_or(DropReason::Unconvertible)?;

    let imdb_id = non_blank(&details.imdb_id).or_else(|| {
        details
            .external_ids
            .as_ref()
            .and_then(|ids| non_blank(&ids.imdb_id))
    });

    let release_date = non_blank(&details.release_date);
    let release_year = release_date
        .as_deref()
        .and_then(parse_release_date)
        .map(|dt| dt.year());

    let genres = genres::normalize_genres(details.genres.iter().filter_map(|g| g.name.as_deref()));

    let no_images: &[Image] = &[];
    let (posters, backdrops) = details
        .images
        .as_ref()
        .map(|i| (i.posters.as_slice(), i.backdrops.as_slice()))
        .unwrap_or((no_images, no_images));
    let (poster_width, poster_height) = image_dimensions(posters, &details.poster_path);
    let (backdrop_width, backdrop_height) = image_dimensions(backdrops, &details.backdrop_path);

    let trailer_key = details
        .videos
        .as_ref()
        .and_then(|v| best_trailer(&v.results))
        .and_then(|v| non_blank(&v.key));

    let keywords = details
        .keywords
        .as_ref()
        .map(|k| {
            k.keywords
                .iter()
                .filter_map(|kw| non_blank(&kw.name))
                .map(|kw| kw.to_lowercase())
                .collect()
        })
        .unwrap_or_default();

    let countries_of_origin = details
        .production_countries
        .iter()
        .filter_map(|c| non_blank(&c.name))
        .collect();

    let languages = details
        .spoken_languages
        .iter()
        .filter_map(|l| non_blank(&l.english_name).or_else(|| non_blank(&l.name)))
        .collect();

    let (cast, director) = match &details.credits {
        Some(credits) => {
            let mut billed: Vec<_> = credits.cast.iter().collect();
            billed.sort_by_key(|c| c.order.unwrap_or(u32::MAX));
            let cast = billed
                .into_iter()
                .filter_map(|c| non_blank(&c.name))
                .take(MAX_CAST)
                .collect();

            let directors: Vec<String> = credits
                .crew
                .iter()
                .filter(|c| c.job.as_deref() == Some("Director"))
                .filter_map(|c| non_blank(&c.name))
                .collect();
            let director = (!directors.is_empty()).then(|| directors.join(", "));
            (cast, director)
        }
        None => (Vec::new(), None),
    };

    let mut movie = Movie {
        tmdb_id: details.id,
        imdb_id,
        title,
        original_title,
        language: non_blank(&details.original_language),
        release_date,
        release_year,
        genres,
        plot: non_blank(&details.overview),
        runtime: details.runtime,
        adult: details.adult,
        budget: details.budget.filter(|b| *b > 0),
        revenue: details.revenue.filter(|r| *r > 0),
        homepage: non_blank(&details.homepage),
        status: non_blank(&details.status).map(|s| s.to_lowercase()),
        keywords,
        countries_of_origin,
        languages,
        cast,
        director,
        poster_url: image_url(POSTER_SIZE, &details.poster_path),
        poster_width,
        poster_height,
        backdrop_url: image_url(BACKDROP_SIZE, &details.backdrop_path),
        backdrop_width,
        backdrop_height,
        trailer_url: trailer_key
            .as_ref()
            .map(|key| format!("{}{}", TRAILER_BASE_URL, key)),
        trailer_youtube_id: trailer_key,
        tmdb_popularity: details.popularity,
        tmdb_rating: details.vote_average,
        tmdb_votes: details.vote_count,
        ..Default::default()
    };

    if let Some(ids) = &details.external_ids {
        movie.external_ids.wikidata_id = non_blank(&ids.wikidata_id);
        movie.external_ids.facebook_id = non_blank(&ids.facebook_id);
        movie.external_ids.instagram_id = non_blank(&ids.instagram_id);
        movie.external_ids.twitter_id = non_blank(&ids.twitter_id);
    }

    Ok(movie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tmdb::{
        Credits, CastMember, CrewMember, Genre, Images, Video, VideoList,
    };

    fn details() -> MovieDetails {
        MovieDetails {
            id: 603,
            imdb_id: Some("tt0133093".to_string()),
            title: Some("The Matrix".to_string()),
            original_title: Some("The Matrix".to_string()),
            original_language: Some("en".to_string()),
            release_date: Some("1999-03-31".to_string()),
            runtime: Some(136),
            budget: Some(63_000_000),
            revenue: Some(0),
            status: Some("Released".to_string()),
            genres: vec![
                Genre { id: 28, name: Some("Action".to_string()) },
                Genre { id: 878, name: Some("Science Fiction".to_string()) },
            ],
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: None,
            images: Some(Images {
                posters: vec![Image {
                    file_path: Some("/poster.jpg".to_string()),
                    width: Some(2000),
                    height: Some(3000),
                    iso_639_1: None,
                }],
                backdrops: vec![],
            }),
            videos: Some(VideoList {
                results: vec![Video {
                    iso_639_1: Some("en".to_string()),
                    name: Some("Official Trailer".to_string()),
                    key: Some("vKQi3bBA1y8".to_string()),
                    site: Some("YouTube".to_string()),
                    video_type: Some("Trailer".to_string()),
                    official: Some(true),
                }],
            }),
            credits: Some(Credits {
                cast: vec![
                    CastMember { name: Some("Laurence Fishburne".to_string()), order: Some(1) },
                    CastMember { name: Some("Keanu Reeves".to_string()), order: Some(0) },
                ],
                crew: vec![
                    CrewMember { name: Some("Lana Wachowski".to_string()), job: Some("Director".to_string()) },
                    CrewMember { name: Some("Joel Silver".to_string()), job: Some("Producer".to_string()) },
                    CrewMember { name: Some("Lilly Wachowski".to_string()), job: Some("Director".to_string()) },
                ],
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_convert_full_record() {
        let movie = convert(&details()).unwrap();

        assert_eq!(movie.tmdb_id, 603);
        assert_eq!(movie.imdb_id.as_deref(), Some("tt0133093"));
        assert_eq!(movie.release_year, Some(1999));
        assert_eq!(movie.genres, vec!["action", "scifi"]);
        assert_eq!(movie.status.as_deref(), Some("released"));
        assert_eq!(movie.budget, Some(63_000_000));
        assert_eq!(movie.revenue, None);
        assert_eq!(
            movie.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w780/poster.jpg")
        );
        assert_eq!(movie.poster_width, Some(2000));
        assert_eq!(movie.poster_height, Some(3000));
        assert_eq!(movie.backdrop_url, None);
        assert_eq!(
            movie.trailer_url.as_deref(),
            Some("https://youtube.com/watch?v=vKQi3bBA1y8")
        );
        assert_eq!(movie.trailer_youtube_id.as_deref(), Some("vKQi3bBA1y8"));
        assert_eq!(movie.cast, vec!["Keanu Reeves", "Laurence Fishburne"]);
        assert_eq!(
            movie.director.as_deref(),
            Some("Lana Wachowski, Lilly Wachowski")
        );
    }

    #[test]
    fn test_title_falls_back_to_original_title() {
        let mut raw = details();
        raw.title = Some("".to_string());
        raw.original_title = Some("Matrix".to_string());
        assert_eq!(convert(&raw).unwrap().title, "Matrix");
    }

    #[test]
    fn test_unconvertible_records() {
        let mut no_title = details();
        no_title.title = None;
        no_title.original_title = None;
        assert_eq!(convert(&no_title), Err(DropReason::Unconvertible));

        let mut no_id = details();
        no_id.id = 0;
        assert_eq!(convert(&no_id), Err(DropReason::Unconvertible));
    }

    #[test]
    fn test_bad_release_date_gives_no_year() {
        let mut raw = details();
        raw.release_date = Some("sometime".to_string());
        let movie = convert(&raw).unwrap();
        assert_eq!(movie.release_year, None);
        assert_eq!(movie.release_date.as_deref(), Some("sometime"));
    }
}
