//! TMDB API interfaces (§4.6). Split into `TmdbSearcher` and `TmdbFetcher`
//! so infrastructure adapters and test doubles only implement what they use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::services::Candidate;
use crate::shared::error::TmdbError;

/// Search filters accepted alongside a query string (§4.6).
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub year: Option<i32>,
    pub runtime_minutes: Option<u32>,
    pub studio: Option<String>,
}

impl SearchOptions {
    /// `y=<year>|r=<runtime>|s=<lowercased-studio>` (§4.6).
    pub fn cache_key(&self) -> String {
        format!(
            "y={}|r={}|s={}",
            self.year.map(|y| y.to_string()).unwrap_or_default(),
            self.runtime_minutes.map(|r| r.to_string()).unwrap_or_default(),
            self.studio.as_deref().unwrap_or("").to_lowercase(),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<TmdbResult>,
}

/// A single search/detail result, reduced to the fields the domain needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbResult {
    pub id: i64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub vote_average: f64,
    pub vote_count: i64,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    /// Stamped by the client for `/movie/{id}` and `/tv/{id}` lookups (§4.6).
    pub media_type: Option<String>,
}

impl TmdbResult {
    pub fn to_candidate(&self) -> Candidate {
        Candidate {
            tmdb_id: self.id,
            title: self.title.clone(),
            name: self.name.clone(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonDetail {
    pub season_number: i32,
    pub episodes: Vec<EpisodeDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeDetail {
    pub episode_number: i32,
    pub name: String,
    pub air_date: Option<String>,
    pub runtime: Option<u32>,
}

/// `GET /search/movie|tv|multi` (§4.6).
#[async_trait]
pub trait TmdbSearcher: Send + Sync {
    async fn search_movie(&self, query: &str, opts: &SearchOptions) -> Result<SearchResponse, TmdbError>;
    async fn search_tv(&self, query: &str, opts: &SearchOptions) -> Result<SearchResponse, TmdbError>;
    async fn search_multi(&self, query: &str, opts: &SearchOptions) -> Result<SearchResponse, TmdbError>;
}

/// `GET /tv/{id}/season/{n}`, `/movie/{id}`, `/tv/{id}` (§4.6).
#[async_trait]
pub trait TmdbFetcher: Send + Sync {
    async fn fetch_season(&self, tv_id: i64, season_number: i32) -> Result<Option<SeasonDetail>, TmdbError>;
    async fn fetch_movie(&self, id: i64) -> Result<Option<TmdbResult>, TmdbError>;
    async fn fetch_tv(&self, id: i64) -> Result<Option<TmdbResult>, TmdbError>;
}
