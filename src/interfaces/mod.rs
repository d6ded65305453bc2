//! Interface Abstraction Layer.
//!
//! Contracts between layers, following the Dependency Inversion Principle:
//! infrastructure adapters implement these traits; the application layer
//! depends only on the trait.

pub mod command_executor;
pub mod external_services;
pub mod notifications;
pub mod primary_title_selector;
pub mod queue;

pub use command_executor::{CommandExecutor, CommandOutput, SystemCommandExecutor};
pub use external_services::{SearchOptions, SearchResponse, SeasonDetail, TmdbFetcher, TmdbResult, TmdbSearcher};
pub use notifications::{NotificationEvent, NotificationPublisher};
pub use primary_title_selector::{LongestTitleSelector, PrimaryTitleSelector};
pub use queue::{QueueItem, QueueRepository, QueueStatus};
