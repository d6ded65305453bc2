// Infrastructure Layer
//
// Concrete adapters implementing the interfaces layer's traits: disc
// fingerprinting, MakeMKV/bd_info scanning, drive control, TMDB and Keydb
// external access, the search gateway, the on-disk disc-id cache, and
// notification publishing.

pub mod cache;
pub mod drive;
pub mod external;
pub mod fingerprint;
pub mod notifications;
pub mod overrides;
pub mod queue;
pub mod scanner;
pub mod search_gateway;

pub use cache::DiscIdCache;
pub use drive::{DriveController, DriveStatus};
pub use external::keydb::KeydbCatalog;
pub use external::tmdb::TmdbClient;
pub use fingerprint::Fingerprinter;
pub use notifications::TracingNotificationPublisher;
pub use overrides::OverrideCatalog;
pub use queue::InMemoryQueueRepository;
pub use scanner::{DiscScanner, ScanParser};
pub use search_gateway::SearchGateway;
