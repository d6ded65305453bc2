//! CLI entry point: loads configuration, builds an `Identifier`, and runs
//! one identification pass against the configured optical drive (or a
//! `disc:N`/file path passed as the first argument).

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use discident::application::Identifier;
use discident::config::Config;
use discident::infrastructure::external::tmdb::TmdbClient;
use discident::infrastructure::external::keydb::KeydbCatalog;
use discident::infrastructure::{InMemoryQueueRepository, TracingNotificationPublisher};
use discident::interfaces::command_executor::SystemCommandExecutor;
use discident::interfaces::external_services::{TmdbFetcher, TmdbSearcher};
use discident::interfaces::queue::QueueItem;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config_path =
        std::env::var("DISCIDENT_CONFIG").unwrap_or_else(|_| "discident.toml".to_string());
    let config = Config::load(&PathBuf::from(config_path))?;

    let executor = Arc::new(SystemCommandExecutor);
    let tmdb = Arc::new(TmdbClient::new(
        config.tmdb_base_url.clone(),
        config.tmdb_api_key.clone().unwrap_or_default(),
        config.tmdb_language.clone(),
    ));
    let searcher: Arc<dyn TmdbSearcher> = tmdb.clone();
    let fetcher: Arc<dyn TmdbFetcher> = tmdb;

    let keydb = config.keydb_path.clone().map(|path| {
        Arc::new(KeydbCatalog::new(
            path,
            config.keydb_download_url.clone(),
            Config::KEYDB_MAX_AGE,
            config.keydb_download_timeout(),
        ))
    });
    if let Some(keydb) = &keydb {
        if let Err(e) = keydb.ensure_fresh().await {
            tracing::warn!(error = %e, "keydb freshness check failed, continuing with on-disk copy");
        }
    }

    let queue = Arc::new(InMemoryQueueRepository::new());
    let notifier = Arc::new(TracingNotificationPublisher);

    let identifier = Identifier::new(&config, executor, searcher, fetcher, queue, notifier, keydb)?;

    let device = std::env::args().nth(1).unwrap_or_default();
    let mut item = QueueItem::new("cli-item-1");
    item.source_path = device;

    let cancel = AtomicBool::new(false);
    identifier.identify(&mut item, &cancel).await?;

    println!("{}", item.progress_message);
    if let Some(rip_spec) = &item.rip_spec {
        println!("{}", serde_json::to_string_pretty(rip_spec)?);
    }

    Ok(())
}
