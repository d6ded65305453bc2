//! The identifier's output contract to downstream stages (§3).

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RipSpec {
    pub fingerprint: String,
    pub content_key: String,
    pub metadata: Value,
    pub attributes: Value,
    pub titles: Vec<TitleRow>,
    pub episodes: Vec<EpisodeRow>,
}

/// One entry per scanned title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleRow {
    pub title_id: u32,
    pub name: String,
    pub duration_seconds: u64,
    /// Separate from the disc fingerprint: identifies the logical piece of
    /// content independent of the disc it came from (§3).
    pub title_hash: String,
}

/// One row per mapped (or placeholder) episode on a TV disc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRow {
    /// `S<ss>E<ee>` or placeholder `S<ss>P<disc>-<idx>`.
    pub key: String,
    pub season: i32,
    pub episode: i32,
    pub runtime_seconds: u64,
    pub title_hash: String,
    pub output_basename: String,
}

impl RipSpec {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let spec = RipSpec {
            fingerprint: "a".repeat(64),
            content_key: "tmdb:movie:1".to_string(),
            metadata: serde_json::json!({"year": "2001"}),
            attributes: serde_json::json!({}),
            titles: vec![TitleRow {
                title_id: 0,
                name: "Demo Disc".to_string(),
                duration_seconds: 7000,
                title_hash: "b".repeat(64),
            }],
            episodes: vec![],
        };
        let json = spec.to_json().unwrap();
        let parsed = RipSpec::from_json(&json).unwrap();
        assert_eq!(parsed.fingerprint, spec.fingerprint);
        assert_eq!(parsed.titles.len(), 1);
    }
}
