//! Disc-ID Cache (§4.11).

pub mod disc_id_cache;

pub use disc_id_cache::DiscIdCache;
