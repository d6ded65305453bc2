//! Interfaces for external services (§4.6).

pub mod tmdb_service;

pub use tmdb_service::{
    EpisodeDetail, SearchOptions, SearchResponse, SeasonDetail, TmdbFetcher, TmdbResult, TmdbSearcher,
};
