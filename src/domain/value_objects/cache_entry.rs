//! Disc-ID Cache record (§3, §4.11).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media_kind::MediaKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub disc_id: String,
    pub tmdb_id: i64,
    pub media_type: MediaKind,
    pub title: String,
    pub edition: Option<String>,
    pub season_number: Option<i32>,
    pub year: Option<i32>,
    pub cached_at: DateTime<Utc>,
}
