//! Search Gateway (§4.7): wraps a TMDB searcher with a response cache and a
//! minimum inter-request interval.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::domain::value_objects::MediaKind;
use crate::interfaces::external_services::{SearchOptions, SearchResponse, TmdbSearcher};
use crate::shared::error::{Cancelled, TmdbError};

struct CacheSlot {
    response: SearchResponse,
    expires_at: Instant,
}

struct GatewayState {
    cache: HashMap<String, CacheSlot>,
    last_lookup: Instant,
}

pub struct SearchGateway {
    searcher: Arc<dyn TmdbSearcher>,
    state: Mutex<GatewayState>,
    min_interval: Duration,
    ttl: Duration,
}

impl SearchGateway {
    pub fn new(searcher: Arc<dyn TmdbSearcher>, min_interval: Duration, ttl: Duration) -> Self {
        Self {
            searcher,
            state: Mutex::new(GatewayState {
                cache: HashMap::new(),
                last_lookup: Instant::now() - min_interval,
            }),
            min_interval,
            ttl,
        }
    }

    fn cache_key(mode: crate::domain::value_objects::SearchMode, title: &str, opts: &SearchOptions) -> String {
        format!("{}|{}|{}", mode.as_str(), title.to_lowercase(), opts.cache_key())
    }

    /// Cache lookup and rate-limit slot reservation happen under one mutex;
    /// the HTTP call itself runs outside it (§4.7).
    pub async fn search(
        &self,
        mode: crate::domain::value_objects::SearchMode,
        title: &str,
        opts: &SearchOptions,
        cancel: &AtomicBool,
    ) -> Result<SearchResponse, TmdbError> {
        use crate::domain::value_objects::SearchMode;

        let key = Self::cache_key(mode, title, opts);
        let wait = {
            let mut state = self.state.lock().await;
            if let Some(slot) = state.cache.get(&key) {
                if slot.expires_at > Instant::now() {
                    return Ok(slot.response.clone());
                }
            }

            let elapsed = state.last_lookup.elapsed();
            let wait = self.min_interval.saturating_sub(elapsed);
            state.last_lookup = Instant::now() + wait;
            wait
        };

        if !wait.is_zero() {
            self.cancellable_sleep(wait, cancel).await?;
        }

        let response = match mode {
            SearchMode::Movie => self.searcher.search_movie(title, opts).await?,
            SearchMode::Tv => self.searcher.search_tv(title, opts).await?,
            SearchMode::Multi => self.searcher.search_multi(title, opts).await?,
        };

        let mut state = self.state.lock().await;
        state.cache.insert(
            key,
            CacheSlot {
                response: response.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );

        Ok(response)
    }

    async fn cancellable_sleep(&self, duration: Duration, cancel: &AtomicBool) -> Result<(), TmdbError> {
        const TICK: Duration = Duration::from_millis(25);
        let mut remaining = duration;
        while !remaining.is_zero() {
            if cancel.load(Ordering::Relaxed) {
                return Err(TmdbError::Network(Cancelled.to_string()));
            }
            let step = remaining.min(TICK);
            tokio::time::sleep(step).await;
            remaining -= step;
        }
        Ok(())
    }

    /// Tries search modes in the hint-driven order, returning on the first
    /// mode that yields a non-empty result set; otherwise the last non-empty
    /// attempt's response and error (§4.7).
    pub async fn search_with_hint(
        &self,
        title: &str,
        opts: &SearchOptions,
        hint: MediaKind,
        cancel: &AtomicBool,
    ) -> (Option<SearchResponse>, Option<TmdbError>) {
        let mut last_response = None;
        let mut last_error = None;

        for mode in hint.search_mode_order() {
            match self.search(mode, title, opts, cancel).await {
                Ok(response) => {
                    if !response.results.is_empty() {
                        return (Some(response), None);
                    }
                    last_response = Some(response);
                }
                Err(e) => last_error = Some(e),
            }
        }

        (last_response, last_error)
    }
}
