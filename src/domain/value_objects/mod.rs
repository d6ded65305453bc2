//! Value Objects - Immutable objects defined by their attributes.

pub mod cache_entry;
pub mod content_key;
pub mod disc_fingerprint;
pub mod keydb_entry;
pub mod media_kind;
pub mod rip_spec;
pub mod title_hash;

pub use cache_entry::CacheEntry;
pub use content_key::ContentKey;
pub use disc_fingerprint::DiscFingerprint;
pub use keydb_entry::KeydbEntry;
pub use media_kind::MediaKind;
pub use rip_spec::{EpisodeRow, RipSpec, TitleRow};
pub use title_hash::TitleHash;
