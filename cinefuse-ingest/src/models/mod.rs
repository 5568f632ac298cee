//! Data models: the canonical record and one wire shape per source

pub mod flick_metrix;
pub mod imdb;
pub mod movie;
pub mod omdb;
pub mod partial;
pub mod tmdb;

pub use flick_metrix::FlickMetrixMovie;
pub use imdb::{ImdbRating, ImdbTitle};
pub use movie::{ExternalIds, Movie};
pub use omdb::OmdbMovie;
pub use partial::{PartialMovie, RtMovie, WikidataMovie};
pub use tmdb::MovieDetails;
