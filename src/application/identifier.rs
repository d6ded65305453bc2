//! Drives one queue item through the identification stage end-to-end (§4.13).

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::entities::Title;
use crate::domain::services::{
    Candidate, ConfidenceScorer, EpisodeMapper, LabelClassifier, MappedEpisode, TitleHints, TmdbEpisode,
};
use crate::domain::value_objects::{CacheEntry, ContentKey, DiscFingerprint, EpisodeRow, MediaKind, RipSpec, TitleRow};
use crate::infrastructure::drive::DriveController;
use crate::infrastructure::fingerprint::Fingerprinter;
use crate::infrastructure::scanner::{device_path, DiscScanner};
use crate::infrastructure::search_gateway::SearchGateway;
use crate::interfaces::command_executor::CommandExecutor;
use crate::interfaces::external_services::{SearchOptions, TmdbFetcher, TmdbResult};
use crate::interfaces::notifications::{NotificationEvent, NotificationPublisher};
use crate::interfaces::primary_title_selector::PrimaryTitleSelector;
use crate::interfaces::queue::{QueueItem, QueueRepository, QueueStatus};
use crate::shared::error::{CacheError, IdentifyError, ScanError, ValidationError};

/// Serializing our own well-formed structures to JSON cannot fail in
/// practice; route through `CacheError::Serialize` rather than unwrap so a
/// future non-serializable field still surfaces as a typed error.
fn to_json_value(value: &impl serde::Serialize) -> Result<serde_json::Value, IdentifyError> {
    serde_json::to_value(value).map_err(|e| CacheError::Serialize(e).into())
}

fn to_json_string(value: &impl serde::Serialize) -> Result<String, IdentifyError> {
    serde_json::to_string(value).map_err(|e| CacheError::Serialize(e).into())
}

pub struct Identifier {
    pub executor: Arc<dyn CommandExecutor>,
    pub makemkv_binary: String,
    pub makemkv_info_timeout: Option<Duration>,
    pub optical_drive: Option<String>,
    pub drive_poll_interval: Duration,
    pub drive_max_attempts: u32,
    pub fingerprinter: Fingerprinter,
    pub disc_id_cache: Arc<crate::infrastructure::cache::DiscIdCache>,
    pub keydb: Option<Arc<crate::infrastructure::external::keydb::KeydbCatalog>>,
    pub overrides: Option<Arc<crate::infrastructure::overrides::OverrideCatalog>>,
    pub search_gateway: Arc<SearchGateway>,
    pub fetcher: Arc<dyn TmdbFetcher>,
    pub confidence_scorer: ConfidenceScorer,
    pub queue: Arc<dyn QueueRepository>,
    pub notifier: Arc<dyn NotificationPublisher>,
    pub title_selector: Arc<dyn PrimaryTitleSelector>,
    pub staging_dir: Option<PathBuf>,
}

/// The query attempted and the mode it matched under, carried alongside an
/// accepted candidate so the resolution step can determine media type.
struct Attempt {
    query: String,
    mode_hint: MediaKind,
    candidate: Candidate,
    result: TmdbResult,
}

impl Identifier {
    /// Assembles an `Identifier` from configuration plus the collaborators a
    /// caller must supply: the command executor, the TMDB searcher/fetcher,
    /// the queue repository, and the notification publisher. The Keydb
    /// Catalog and identification overrides are optional, mirroring their
    /// optional config paths (§6).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &crate::config::Config,
        executor: Arc<dyn CommandExecutor>,
        searcher: Arc<dyn crate::interfaces::external_services::TmdbSearcher>,
        fetcher: Arc<dyn TmdbFetcher>,
        queue: Arc<dyn QueueRepository>,
        notifier: Arc<dyn NotificationPublisher>,
        keydb: Option<Arc<crate::infrastructure::external::keydb::KeydbCatalog>>,
    ) -> Result<Self, IdentifyError> {
        let overrides = config
            .identification_overrides_path
            .as_deref()
            .map(crate::infrastructure::overrides::OverrideCatalog::load)
            .transpose()?
            .map(Arc::new);

        Ok(Self {
            executor,
            makemkv_binary: config.makemkv_binary.clone(),
            makemkv_info_timeout: config.makemkv_info_timeout(),
            optical_drive: config.optical_drive.clone(),
            drive_poll_interval: crate::config::Config::DRIVE_WAIT_POLL_INTERVAL,
            drive_max_attempts: crate::config::Config::DRIVE_WAIT_MAX_ATTEMPTS,
            fingerprinter: Fingerprinter::new(crate::config::Config::FINGERPRINT_FALLBACK_PREFIX_BYTES),
            disc_id_cache: Arc::new(crate::infrastructure::cache::DiscIdCache::new(config.disc_id_cache_path.clone())),
            keydb,
            overrides,
            search_gateway: Arc::new(SearchGateway::new(
                searcher,
                crate::config::Config::SEARCH_GATEWAY_MIN_INTERVAL,
                crate::config::Config::SEARCH_GATEWAY_CACHE_TTL,
            )),
            fetcher,
            confidence_scorer: ConfidenceScorer::new(config.validation.min_vote_count_exact_match),
            queue,
            notifier,
            title_selector: Arc::new(crate::interfaces::primary_title_selector::LongestTitleSelector),
            staging_dir: config.staging_dir.clone(),
        })
    }

    /// Runs the full §4.13 sequence against `item`, mutating it in place.
    pub async fn identify(&self, item: &mut QueueItem, cancel: &AtomicBool) -> Result<(), IdentifyError> {
        self.prepare(item).await;

        let device = if item.source_path.is_empty() {
            self.optical_drive.clone().unwrap_or_default()
        } else {
            item.source_path.clone()
        };

        let scan = self.scan(&device).await?;

        let fingerprint = match self.capture_fingerprint(&scan, item, &device).await {
            Some(fp) => fp,
            None => return Err(ValidationError::MissingFingerprint.into()),
        };
        item.fingerprint = Some(fingerprint.clone());

        if self.duplicate_check(&fingerprint, item).await? {
            return Ok(());
        }

        if let Some(entry) = self.overrides.as_ref().and_then(|o| o.lookup(&fingerprint).cloned()) {
            self.finalize_from_override(item, &fingerprint, &entry).await?;
            return self.post_validate(item, &fingerprint).await;
        }

        if let Some(entry) = self.disc_id_cache.lookup(&fingerprint).0 {
            self.finalize_from_cache(item, &fingerprint, entry).await?;
            return self.post_validate(item, &fingerprint).await;
        }

        let bd_info = scan.bd_info.clone();
        if let (Some(keydb), Some(bd)) = (&self.keydb, &bd_info) {
            if !bd.disc_id.is_empty() {
                if let Some(entry) = keydb.lookup(&bd.disc_id) {
                    item.disc_title = entry.title;
                }
            }
        }

        let makemkv_title = scan.first_title_name().map(str::to_string);
        let bd_disc_name = bd_info.as_ref().map(|b| b.disc_name.clone());
        let title = [makemkv_title.as_deref(), bd_disc_name.as_deref(), Some(item.disc_title.as_str())]
            .into_iter()
            .flatten()
            .find(|candidate| !LabelClassifier::is_unusable_label(candidate))
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown Disc".to_string());

        let candidates: Vec<&str> = [
            Some(title.as_str()),
            bd_info.as_ref().map(|b| b.volume_identifier.as_str()),
            Some(item.disc_title.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let (show_hint, season_number) = TitleHints::derive_show_hint(&candidates);
        let disc_number = TitleHints::extract_disc_number(&candidates).unwrap_or(0);
        let year_hint = bd_info
            .as_ref()
            .and_then(|b| b.release_year)
            .or_else(|| TitleHints::split_title_year(&title).1);

        let media_kind_hint = if season_number.is_some()
            || TitleHints::extract_disc_number(&candidates).is_some()
            || scan.episode_runtime_title_count() >= 3
        {
            MediaKind::Tv
        } else {
            MediaKind::Unknown
        };

        if LabelClassifier::is_unusable_label(&title) {
            item.needs_review = true;
            item.review_reason = Some("Disc title placeholder; manual identification required".to_string());
            item.status = QueueStatus::Review;
            item.progress_message = "Disc title placeholder; manual identification required".to_string();
            self.finalize_unknown(item, &fingerprint).await?;
            return self.post_validate(item, &fingerprint).await;
        }

        let mut queries = vec![title.clone()];
        if !show_hint.is_empty() {
            queries.push(show_hint.clone());
        }
        if let Some((canonical, _label)) = TitleHints::extract_canonical_title(&title) {
            queries.push(canonical);
        }
        let queries = TitleHints::build_query_list(&queries.iter().map(String::as_str).collect::<Vec<_>>());

        let opts = SearchOptions {
            year: year_hint.map(|y| y as i32),
            runtime_minutes: None,
            studio: bd_info.as_ref().and_then(|b| b.studio.clone()),
        };

        let mut attempt = None;
        let mut saw_tmdb_error = false;
        for query in &queries {
            let (response, err) = self
                .search_gateway
                .search_with_hint(query, &opts, media_kind_hint, cancel)
                .await;
            if err.is_some() {
                saw_tmdb_error = true;
            }
            let Some(response) = response else { continue };
            if response.results.is_empty() {
                continue;
            }
            let candidates: Vec<Candidate> = response.results.iter().map(TmdbResult::to_candidate).collect();
            if let Some(accepted) = self.confidence_scorer.accept(query, &candidates) {
                let result = response
                    .results
                    .iter()
                    .find(|r| r.id == accepted.tmdb_id)
                    .cloned()
                    .expect("accepted candidate came from this response");
                attempt = Some(Attempt {
                    query: query.clone(),
                    mode_hint: media_kind_hint,
                    candidate: accepted.clone(),
                    result,
                });
                break;
            }
        }

        let Some(attempt) = attempt else {
            let reason = if saw_tmdb_error { "TMDB lookup failed" } else { "No confident TMDB match" };
            item.needs_review = true;
            item.review_reason = Some(reason.to_string());
            item.progress_message = reason.to_string();
            error!(
                decision_type = "identification",
                decision_result = "review",
                decision_reason = reason,
                error_hint = saw_tmdb_error,
                impact = "item requires manual identification",
                "identification failed to resolve a TMDB match"
            );
            self.finalize_unknown(item, &fingerprint).await?;
            return self.post_validate(item, &fingerprint).await;
        };

        let media_type = if attempt.result.media_type.as_deref() == Some("tv") || attempt.result.name.is_some() {
            MediaKind::Tv
        } else {
            MediaKind::Movie
        };
        let year = attempt
            .result
            .release_date
            .as_ref()
            .or(attempt.result.first_air_date.as_ref())
            .and_then(|d| d.get(0..4))
            .map(str::to_string);

        let display_title = attempt.candidate.comparison_title().to_string();
        let edition = if media_type == MediaKind::Movie {
            TitleHints::extract_canonical_title(&display_title).map(|(_, label)| label)
        } else {
            None
        };

        let season = season_number.map(|n| n as i32).unwrap_or(1);
        let mut episode_rows = Vec::new();
        if media_type == MediaKind::Tv {
            let episodes = match self.fetcher.fetch_season(attempt.candidate.tmdb_id, season).await {
                Ok(Some(detail)) => detail
                    .episodes
                    .iter()
                    .map(|e| TmdbEpisode {
                        episode_number: e.episode_number,
                        name: e.name.clone(),
                        air_date: e.air_date.clone(),
                        runtime_minutes: e.runtime.unwrap_or(0),
                    })
                    .collect(),
                _ => Vec::<TmdbEpisode>::new(),
            };

            episode_rows = if episodes.is_empty() {
                self.build_placeholder_rows(&scan.titles, season)
            } else {
                let (mapped, _numbers) = EpisodeMapper::map(season, &scan.titles, &episodes, disc_number);
                self.build_episode_rows(&scan.titles, &mapped, season)
            };
        }

        let display_title_full = match (media_type, season_number, year) {
            (MediaKind::Tv, Some(s), Some(ref y)) => format!("{display_title} Season {s:02} ({y})"),
            (_, _, Some(ref y)) => format!("{display_title} ({y})"),
            _ => display_title.clone(),
        };

        let content_key = ContentKey::tmdb(media_type, attempt.candidate.tmdb_id);
        item.disc_title = title.clone();

        let year_str = attempt
            .result
            .release_date
            .as_ref()
            .or(attempt.result.first_air_date.as_ref())
            .and_then(|d| d.get(0..4))
            .unwrap_or("")
            .to_string();

        let primary_title = self.title_selector.select(&scan.titles);

        let metadata = json!({
            "title": display_title,
            "year": year_str,
            "media_type": media_type.as_str(),
            "edition": edition,
            "season_number": season_number,
            "query_used": attempt.query,
            "mode_hint": attempt.mode_hint.as_str(),
            "primary_title_id": primary_title.map(|t| t.id),
        });

        let title_hashes: std::collections::BTreeMap<u32, String> = scan
            .titles
            .iter()
            .map(|t| (t.id, Fingerprinter::title_hash(t).to_string()))
            .collect();

        let title_rows: Vec<TitleRow> = scan
            .titles
            .iter()
            .map(|t| TitleRow {
                title_id: t.id,
                name: t.name.clone(),
                duration_seconds: t.duration_seconds,
                title_hash: title_hashes.get(&t.id).cloned().unwrap_or_default(),
            })
            .collect();

        let rip_spec = RipSpec {
            fingerprint: fingerprint.clone(),
            content_key: content_key.to_string(),
            metadata: metadata.clone(),
            attributes: json!({}),
            titles: title_rows,
            episodes: episode_rows,
        };

        item.metadata = Some(metadata);
        item.rip_spec = Some(to_json_value(&rip_spec)?);
        item.status = QueueStatus::Identified;
        item.progress_stage = "Identified".to_string();
        item.progress_percent = 100;
        item.progress_message = format!("Identified as: {display_title_full}");
        item.error_message = None;

        if !year_str.is_empty() {
            self.notifier
                .publish(NotificationEvent::IdentificationCompleted {
                    title: display_title.clone(),
                    year: year_str.clone(),
                    media_type: media_type.as_str().to_string(),
                    display_title: display_title_full,
                    cached: false,
                })
                .await;
        }

        self.disc_id_cache.store(CacheEntry {
            disc_id: fingerprint.clone(),
            tmdb_id: attempt.candidate.tmdb_id,
            media_type,
            title: display_title,
            edition,
            season_number: season_number.map(|n| n as i32),
            year: year_str.parse().ok(),
            cached_at: chrono::Utc::now(),
        })?;

        self.queue.save(item).await?;

        self.post_validate(item, &fingerprint).await
    }

    async fn prepare(&self, item: &mut QueueItem) {
        item.progress_stage = "Identifying".to_string();
        item.progress_message = "Fetching metadata".to_string();
        item.status = QueueStatus::Identifying;

        if item.source_path.is_empty() {
            self.notifier
                .publish(NotificationEvent::DiscDetected {
                    disc_title: item.disc_title.clone(),
                    disc_type: "optical".to_string(),
                })
                .await;
        }
    }

    async fn scan(&self, device: &str) -> Result<crate::domain::ScanResult, IdentifyError> {
        let path = device_path(device);
        if !path.is_empty() {
            let drive = DriveController::new(self.executor.as_ref(), self.drive_poll_interval, self.drive_max_attempts);
            drive.wait_for_ready(&path).await?;
        }

        let scanner = DiscScanner::new(&self.makemkv_binary, self.executor.as_ref());
        let run = scanner.scan(device);

        let result = match self.makemkv_info_timeout {
            Some(timeout) => tokio::time::timeout(timeout, run).await.map_err(|_| {
                ScanError::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "unreadable sectors"))
            })?,
            None => run.await,
        };

        Ok(result?)
    }

    /// Priority chain per §4.13 step 3. When the scan tool reported nothing
    /// usable, falls back to computing the structural fingerprint directly
    /// from the mounted disc before giving up.
    async fn capture_fingerprint(
        &self,
        scan: &crate::domain::ScanResult,
        item: &QueueItem,
        device: &str,
    ) -> Option<String> {
        if let Some(fp) = scan.fingerprint.clone() {
            return Some(fp);
        }
        if let Some(bd_id) = scan
            .bd_info
            .as_ref()
            .map(|b| b.disc_id.to_uppercase())
            .filter(|s| !s.is_empty())
        {
            return Some(bd_id);
        }
        if let Some(fp) = item.fingerprint.clone() {
            return Some(fp);
        }

        match self.fingerprinter.compute(device, "", self.executor.as_ref()).await {
            Ok(fp) => Some(fp.as_str().to_string()),
            Err(e) => {
                warn!(device, error = %e, "structural fingerprint fallback failed");
                None
            }
        }
    }

    /// Returns `true` when the item was flagged for review and the caller
    /// should stop processing it further.
    async fn duplicate_check(&self, fingerprint: &str, item: &mut QueueItem) -> Result<bool, IdentifyError> {
        if let Some(other) = self.queue.find_by_fingerprint(fingerprint).await? {
            if other.id != item.id {
                item.needs_review = true;
                item.review_reason = Some("Duplicate disc fingerprint".to_string());
                item.status = QueueStatus::Review;
                item.progress_message = "Duplicate disc fingerprint".to_string();
                self.notifier
                    .publish(NotificationEvent::UnidentifiedMedia { label: item.disc_title.clone() })
                    .await;
                self.queue.save(item).await?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// A manual fingerprint/disc-id override always wins: it exists precisely
    /// because the confidence scorer can't be trusted on this disc (§6).
    async fn finalize_from_override(
        &self,
        item: &mut QueueItem,
        fingerprint: &str,
        entry: &crate::infrastructure::overrides::OverrideEntry,
    ) -> Result<(), IdentifyError> {
        let media_type = entry.media_type.clone().unwrap_or_else(|| "movie".to_string());
        let year_str = entry.year.map(|y| y.to_string()).unwrap_or_default();
        let content_key = ContentKey::UnknownFp(DiscFingerprint::from_hex(fingerprint.to_string()).short());

        let metadata = json!({
            "title": entry.title,
            "year": year_str,
            "media_type": media_type,
            "override": true,
        });

        item.disc_title = entry.title.clone();
        item.metadata = Some(metadata.clone());
        item.rip_spec = Some(to_json_value(&RipSpec {
            fingerprint: fingerprint.to_string(),
            content_key: content_key.to_string(),
            metadata,
            attributes: json!({}),
            titles: Vec::new(),
            episodes: Vec::new(),
        })?);
        item.status = QueueStatus::Identified;
        item.progress_stage = "Identified".to_string();
        item.progress_percent = 100;
        item.progress_message = format!("Identified as: {} (override)", entry.title);
        item.error_message = None;

        self.notifier
            .publish(NotificationEvent::IdentificationCompleted {
                title: entry.title.clone(),
                year: year_str.clone(),
                media_type,
                display_title: format!("{} ({year_str})", entry.title),
                cached: false,
            })
            .await;

        self.queue.save(item).await?;
        Ok(())
    }

    async fn finalize_from_cache(
        &self,
        item: &mut QueueItem,
        fingerprint: &str,
        entry: CacheEntry,
    ) -> Result<(), IdentifyError> {
        let fresh = match entry.media_type {
            MediaKind::Movie => self.fetcher.fetch_movie(entry.tmdb_id).await,
            _ => self.fetcher.fetch_tv(entry.tmdb_id).await,
        };

        let (title, year) = match fresh {
            Ok(Some(result)) => {
                let title = result.title.or(result.name).unwrap_or_else(|| entry.title.clone());
                let year = result
                    .release_date
                    .or(result.first_air_date)
                    .and_then(|d| d.get(0..4).map(str::to_string))
                    .or_else(|| entry.year.map(|y| y.to_string()));
                (title, year)
            }
            _ => {
                warn!(disc_id = fingerprint, "tmdb refresh for cached entry failed, using cached fields");
                (entry.title.clone(), entry.year.map(|y| y.to_string()))
            }
        };

        let content_key = ContentKey::tmdb(entry.media_type, entry.tmdb_id);
        let metadata = json!({
            "title": title,
            "year": year.clone().unwrap_or_default(),
            "media_type": entry.media_type.as_str(),
            "edition": entry.edition,
            "season_number": entry.season_number,
            "cached": true,
        });

        item.disc_title = title.clone();
        item.metadata = Some(metadata.clone());
        item.rip_spec = Some(to_json_value(&RipSpec {
            fingerprint: fingerprint.to_string(),
            content_key: content_key.to_string(),
            metadata,
            attributes: json!({}),
            titles: Vec::new(),
            episodes: Vec::new(),
        })?);
        item.status = QueueStatus::Identified;
        item.progress_stage = "Identified".to_string();
        item.progress_percent = 100;
        item.progress_message = format!("Identified as: {title} (cached)");
        item.error_message = None;

        if let Some(year) = &year {
            self.notifier
                .publish(NotificationEvent::IdentificationCompleted {
                    title: title.clone(),
                    year: year.clone(),
                    media_type: entry.media_type.as_str().to_string(),
                    display_title: format!("{title} ({year})"),
                    cached: true,
                })
                .await;
        }

        self.queue.save(item).await?;
        Ok(())
    }

    async fn finalize_unknown(&self, item: &mut QueueItem, fingerprint: &str) -> Result<(), IdentifyError> {
        let fp = DiscFingerprint::from_hex(fingerprint.to_string());
        let content_key = ContentKey::UnknownFp(fp.short());
        let metadata = json!({ "title": item.disc_title });
        item.metadata = Some(metadata.clone());
        item.rip_spec = Some(to_json_value(&RipSpec {
            fingerprint: fingerprint.to_string(),
            content_key: content_key.to_string(),
            metadata,
            attributes: json!({}),
            titles: Vec::new(),
            episodes: Vec::new(),
        })?);
        self.queue.save(item).await?;
        Ok(())
    }

    fn build_episode_rows(
        &self,
        titles: &[Title],
        mapped: &std::collections::BTreeMap<u32, MappedEpisode>,
        season: i32,
    ) -> Vec<EpisodeRow> {
        let title_hashes: std::collections::BTreeMap<u32, String> = titles
            .iter()
            .map(|t| (t.id, Fingerprinter::title_hash(t).to_string()))
            .collect();

        let mut rows = Vec::new();
        for title in titles.iter().filter(|t| t.is_episode_runtime()) {
            if let Some(ep) = mapped.get(&title.id) {
                let key = format!("S{:02}E{:02}", ep.season, ep.episode);
                rows.push(EpisodeRow {
                    key: key.clone(),
                    season: ep.season,
                    episode: ep.episode,
                    runtime_seconds: title.duration_seconds,
                    title_hash: title_hashes.get(&title.id).cloned().unwrap_or_default(),
                    output_basename: key,
                });
            }
        }

        if rows.is_empty() {
            return self.build_placeholder_rows(titles, season);
        }
        rows
    }

    /// Season known, episode list not yet available (TMDB fetch empty or
    /// the title/episode counts never matched). Rows are built over the same
    /// deduplicated set `EpisodeMapper::placeholders` produces, so the row
    /// count always matches what that function would report.
    fn build_placeholder_rows(&self, titles: &[Title], season: i32) -> Vec<EpisodeRow> {
        let title_hashes: std::collections::BTreeMap<u32, String> = titles
            .iter()
            .map(|t| (t.id, Fingerprinter::title_hash(t).to_string()))
            .collect();

        let placeholders = EpisodeMapper::placeholders(season, titles, &title_hashes);

        let mut seen = std::collections::HashSet::new();
        let deduped: Vec<&Title> = titles
            .iter()
            .filter(|t| t.is_episode_runtime())
            .filter(|t| {
                let key = t.segment_map.clone().or_else(|| title_hashes.get(&t.id).cloned()).unwrap_or_default();
                key.is_empty() || seen.insert(key)
            })
            .collect();
        debug_assert_eq!(deduped.len(), placeholders.len());

        deduped
            .into_iter()
            .enumerate()
            .map(|(idx, title)| {
                let key = format!("S{season:02}P1-{}", idx + 1);
                EpisodeRow {
                    key: key.clone(),
                    season,
                    episode: 0,
                    runtime_seconds: title.duration_seconds,
                    title_hash: title_hashes.get(&title.id).cloned().unwrap_or_default(),
                    output_basename: key,
                }
            })
            .collect()
    }

    /// Fingerprint present, rip spec parses and matches, staging skeleton created (§4.13 step 13).
    async fn post_validate(&self, item: &QueueItem, fingerprint: &str) -> Result<(), IdentifyError> {
        if item.fingerprint.is_none() {
            return Err(ValidationError::MissingFingerprint.into());
        }

        if let Some(value) = &item.rip_spec {
            let raw = to_json_string(value)?;
            let spec = RipSpec::from_json(&raw).map_err(|e| ValidationError::RipSpecParse(e.to_string()))?;
            if !spec.fingerprint.eq_ignore_ascii_case(fingerprint) {
                return Err(ValidationError::FingerprintMismatch {
                    rip_spec: spec.fingerprint,
                    item: fingerprint.to_string(),
                }
                .into());
            }
        }

        if let Some(staging_dir) = &self.staging_dir {
            let base = staging_dir.join(fingerprint);
            for sub in ["", "rips", "encoded", "organizing"] {
                std::fs::create_dir_all(base.join(sub))?;
            }
        }

        info!(fingerprint, status = ?item.status, "identification post-validation complete");
        Ok(())
    }
}
