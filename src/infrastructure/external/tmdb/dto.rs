//! TMDB API Data Transfer Objects (§4.6).
//!
//! Wire-format structures; `mapper` converts these to the interfaces-layer
//! types the rest of the crate depends on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponseDto {
    #[serde(default)]
    pub results: Vec<ResultDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDto {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonDetailDto {
    pub season_number: i32,
    #[serde(default)]
    pub episodes: Vec<EpisodeDetailDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeDetailDto {
    pub episode_number: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
}
