//! TMDB wire types (primary source)
//!
//! Only the fields the converter reads are modelled; unknown fields are
//! ignored. Details are fetched with
//! `append_to_response=videos,images,credits,external_ids,keywords`.

use serde::{Deserialize, Serialize};

/// One line of the TMDB daily id export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpEntry {
    pub id: i64,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub video: bool,
}

/// `GET /3/movie/{id}` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieDetails {
    pub id: i64,
    pub imdb_id: Option<String>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub adult: bool,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub homepage: Option<String>,
    pub status: Option<String>,
    pub genres: Vec<Genre>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub production_countries: Vec<ProductionCountry>,
    pub spoken_languages: Vec<SpokenLanguage>,

    // appended responses
    pub videos: Option<VideoList>,
    pub images: Option<Images>,
    pub credits: Option<Credits>,
    pub external_ids: Option<ExternalIds>,
    pub keywords: Option<KeywordList>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Genre {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionCountry {
    pub iso_3166_1: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpokenLanguage {
    pub iso_639_1: Option<String>,
    pub english_name: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoList {
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub iso_639_1: Option<String>,
    pub name: Option<String>,
    pub key: Option<String>,
    pub site: Option<String>,
    #[serde(rename = "type")]
    pub video_type: Option<String>,
    pub official: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Images {
    pub posters: Vec<Image>,
    pub backdrops: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub file_path: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub iso_639_1: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastMember {
    pub name: Option<String>,
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewMember {
    pub name: Option<String>,
    pub job: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalIds {
    pub imdb_id: Option<String>,
    pub wikidata_id: Option<String>,
    pub facebook_id: Option<String>,
    pub instagram_id: Option<String>,
    pub twitter_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordList {
    pub keywords: Vec<Keyword>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keyword {
    pub id: i64,
    pub name: Option<String>,
}
