//! End-to-end identification workflow tests (§4.13, §8) driven entirely
//! through `Identifier::identify`, using hand-rolled fakes for every
//! external collaborator.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use discident::application::Identifier;
use discident::infrastructure::cache::DiscIdCache;
use discident::infrastructure::fingerprint::Fingerprinter;
use discident::infrastructure::search_gateway::SearchGateway;
use discident::interfaces::command_executor::{CommandExecutor, CommandOutput};
use discident::interfaces::external_services::{
    SearchOptions, SearchResponse, SeasonDetail, EpisodeDetail, TmdbFetcher, TmdbResult, TmdbSearcher,
};
use discident::interfaces::notifications::{NotificationEvent, NotificationPublisher};
use discident::interfaces::primary_title_selector::LongestTitleSelector;
use discident::interfaces::queue::{QueueItem, QueueRepository, QueueStatus};
use discident::domain::services::ConfidenceScorer;
use discident::shared::error::{ExternalToolError, IdentifyError, TmdbError};

struct FakeExecutor {
    scan_output: String,
}

#[async_trait]
impl CommandExecutor for FakeExecutor {
    async fn run(
        &self,
        _binary: &str,
        _args: &[&str],
        _timeout: Option<Duration>,
    ) -> Result<CommandOutput, ExternalToolError> {
        Ok(CommandOutput {
            stdout: self.scan_output.as_bytes().to_vec(),
            stderr: Vec::new(),
            exit_code: 0,
        })
    }
}

struct FakeSearcher {
    tv_response: SearchResponse,
}

#[async_trait]
impl TmdbSearcher for FakeSearcher {
    async fn search_movie(&self, _query: &str, _opts: &SearchOptions) -> Result<SearchResponse, TmdbError> {
        Ok(SearchResponse::default())
    }
    async fn search_tv(&self, _query: &str, _opts: &SearchOptions) -> Result<SearchResponse, TmdbError> {
        Ok(self.tv_response.clone())
    }
    async fn search_multi(&self, _query: &str, _opts: &SearchOptions) -> Result<SearchResponse, TmdbError> {
        Ok(SearchResponse::default())
    }
}

struct FakeFetcher {
    tv_id: i64,
    season: Vec<EpisodeDetail>,
}

#[async_trait]
impl TmdbFetcher for FakeFetcher {
    async fn fetch_season(&self, tv_id: i64, season_number: i32) -> Result<Option<SeasonDetail>, TmdbError> {
        if tv_id == self.tv_id && season_number == 1 {
            Ok(Some(SeasonDetail { season_number: 1, episodes: self.season.clone() }))
        } else {
            Ok(None)
        }
    }
    async fn fetch_movie(&self, _id: i64) -> Result<Option<TmdbResult>, TmdbError> {
        Ok(None)
    }
    async fn fetch_tv(&self, _id: i64) -> Result<Option<TmdbResult>, TmdbError> {
        Ok(None)
    }
}

#[derive(Default)]
struct FakeQueue;

#[async_trait]
impl QueueRepository for FakeQueue {
    async fn find_by_fingerprint(&self, _fingerprint: &str) -> Result<Option<QueueItem>, IdentifyError> {
        Ok(None)
    }
    async fn save(&self, _item: &QueueItem) -> Result<(), IdentifyError> {
        Ok(())
    }
}

struct NoopNotifier;

#[async_trait]
impl NotificationPublisher for NoopNotifier {
    async fn publish(&self, _event: NotificationEvent) {}
}

fn tv_scan_output() -> String {
    concat!(
        "CINFO:32,0,\"FEDCBA9876543210FEDCBA9876543210\"\n",
        "TINFO:0,2,0,\"Episode One\"\n",
        "TINFO:0,9,0,\"0:22:00\"\n",
        "TINFO:1,2,0,\"Episode Two\"\n",
        "TINFO:1,9,0,\"0:22:00\"\n",
        "TINFO:2,2,0,\"Episode Three\"\n",
        "TINFO:2,9,0,\"0:22:00\"\n",
        "SINFO:0,0,1,0,\"Video\"\n",
    )
    .to_string()
}

#[tokio::test]
async fn identifies_a_tv_season_and_maps_episodes() {
    let searcher = FakeSearcher {
        tv_response: SearchResponse {
            results: vec![TmdbResult {
                id: 42,
                title: None,
                name: Some("Comedy Show".to_string()),
                vote_average: 8.0,
                vote_count: 500,
                release_date: None,
                first_air_date: Some("2010-01-01".to_string()),
                media_type: Some("tv".to_string()),
            }],
        },
    };
    let fetcher = FakeFetcher {
        tv_id: 42,
        season: vec![
            EpisodeDetail { episode_number: 1, name: "Pilot".to_string(), air_date: Some("2010-01-01".to_string()), runtime: Some(22) },
            EpisodeDetail { episode_number: 2, name: "Second".to_string(), air_date: Some("2010-01-08".to_string()), runtime: Some(22) },
            EpisodeDetail { episode_number: 3, name: "Third".to_string(), air_date: Some("2010-01-15".to_string()), runtime: Some(22) },
        ],
    };

    let identifier = Identifier {
        executor: Arc::new(FakeExecutor { scan_output: tv_scan_output() }),
        makemkv_binary: "makemkvcon".to_string(),
        makemkv_info_timeout: None,
        optical_drive: None,
        drive_poll_interval: Duration::from_millis(1),
        drive_max_attempts: 1,
        fingerprinter: Fingerprinter::new(64 * 1024),
        disc_id_cache: Arc::new(DiscIdCache::new(None)),
        keydb: None,
        overrides: None,
        search_gateway: Arc::new(SearchGateway::new(Arc::new(searcher), Duration::from_millis(0), Duration::from_secs(3600))),
        fetcher: Arc::new(fetcher),
        confidence_scorer: ConfidenceScorer::new(0),
        queue: Arc::new(FakeQueue::default()),
        notifier: Arc::new(NoopNotifier),
        title_selector: Arc::new(LongestTitleSelector),
        staging_dir: None,
    };

    let mut item = QueueItem::new("tv-item-1");
    let cancel = AtomicBool::new(false);

    identifier.identify(&mut item, &cancel).await.unwrap();

    assert_eq!(item.status, QueueStatus::Identified);
    assert!(!item.needs_review);

    let rip_spec = item.rip_spec.as_ref().unwrap();
    assert_eq!(rip_spec["content_key"], "tmdb:tv:42");
    let episodes = rip_spec["episodes"].as_array().unwrap();
    assert_eq!(episodes.len(), 3);
}
