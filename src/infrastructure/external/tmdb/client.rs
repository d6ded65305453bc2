//! TMDB HTTP client (§4.6): GET-only, 10-second per-request timeout,
//! API key carried as a query parameter.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::infrastructure::external::tmdb::dto::{ResultDto, SearchResponseDto, SeasonDetailDto};
use crate::infrastructure::external::tmdb::mapper::{map_result, map_search_response, map_season_detail};
use crate::interfaces::external_services::{
    SearchOptions, SearchResponse, SeasonDetail, TmdbFetcher, TmdbResult, TmdbSearcher,
};
use crate::shared::error::TmdbError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RUNTIME_WINDOW_MINUTES: u32 = 10;

pub struct TmdbClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("reqwest client builds with static config"),
            base_url: base_url.into(),
            api_key: api_key.into(),
            language: language.into(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, TmdbError> {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();

        let mut request = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())]);
        for (key, value) in query {
            request = request.query(&[(key, value)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let latency = started.elapsed();

        if !status.is_success() {
            return Err(TmdbError::Status {
                status: status.as_u16(),
                latency,
            });
        }

        debug!(url = %url, latency_ms = latency.as_millis(), "tmdb request completed");
        response.json().await.map_err(|e| TmdbError::Decode(e.to_string()))
    }

    fn search_query(query: &str, opts: &SearchOptions) -> Result<Vec<(&'static str, String)>, TmdbError> {
        if query.trim().is_empty() {
            return Err(TmdbError::EmptyQuery);
        }
        let mut params = vec![("query", query.to_string())];
        if let Some(year) = opts.year {
            params.push(("primary_release_year", year.to_string()));
            params.push(("first_air_date_year", year.to_string()));
        }
        if let Some(runtime) = opts.runtime_minutes {
            if runtime > 0 {
                params.push(("runtime.gte", (runtime.saturating_sub(RUNTIME_WINDOW_MINUTES)).to_string()));
                params.push(("runtime.lte", (runtime + RUNTIME_WINDOW_MINUTES).to_string()));
            }
        }
        Ok(params)
    }
}

#[async_trait]
impl TmdbSearcher for TmdbClient {
    async fn search_movie(&self, query: &str, opts: &SearchOptions) -> Result<SearchResponse, TmdbError> {
        let params = Self::search_query(query, opts)?;
        let dto: SearchResponseDto = self.get("/search/movie", &params).await?;
        Ok(map_search_response(dto))
    }

    async fn search_tv(&self, query: &str, opts: &SearchOptions) -> Result<SearchResponse, TmdbError> {
        let params = Self::search_query(query, opts)?;
        let dto: SearchResponseDto = self.get("/search/tv", &params).await?;
        Ok(map_search_response(dto))
    }

    async fn search_multi(&self, query: &str, opts: &SearchOptions) -> Result<SearchResponse, TmdbError> {
        let params = Self::search_query(query, opts)?;
        let dto: SearchResponseDto = self.get("/search/multi", &params).await?;
        Ok(map_search_response(dto))
    }
}

#[async_trait]
impl TmdbFetcher for TmdbClient {
    async fn fetch_season(&self, tv_id: i64, season_number: i32) -> Result<Option<SeasonDetail>, TmdbError> {
        let path = format!("/tv/{tv_id}/season/{season_number}");
        match self.get::<SeasonDetailDto>(&path, &[]).await {
            Ok(dto) => Ok(Some(map_season_detail(dto))),
            Err(TmdbError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn fetch_movie(&self, id: i64) -> Result<Option<TmdbResult>, TmdbError> {
        let path = format!("/movie/{id}");
        match self.get::<ResultDto>(&path, &[]).await {
            Ok(mut dto) => {
                dto.media_type = Some("movie".to_string());
                Ok(Some(map_result(dto)))
            }
            Err(TmdbError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn fetch_tv(&self, id: i64) -> Result<Option<TmdbResult>, TmdbError> {
        let path = format!("/tv/{id}");
        match self.get::<ResultDto>(&path, &[]).await {
            Ok(mut dto) => {
                dto.media_type = Some("tv".to_string());
                Ok(Some(map_result(dto)))
            }
            Err(TmdbError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
