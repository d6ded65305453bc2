//! A logical content unit on the disc (§3).

use super::track::Track;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Title {
    pub id: u32,
    pub name: String,
    /// Duration in whole seconds. 0 means unknown.
    pub duration_seconds: u64,
    pub tracks: Vec<Track>,
    pub chapter_count: Option<u32>,
    pub playlist: Option<String>,
    pub segment_count: Option<u32>,
    pub segment_map: Option<String>,
}

impl Title {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: String::new(),
            duration_seconds: 0,
            tracks: Vec::new(),
            chapter_count: None,
            playlist: None,
            segment_count: None,
            segment_map: None,
        }
    }

    /// Whether this title falls in the "episode runtime" window used by the
    /// episode mapper (§4.10): 18–35 minutes inclusive.
    pub fn is_episode_runtime(&self) -> bool {
        let minutes = self.duration_seconds / 60;
        (18..=35).contains(&minutes)
    }

    pub fn duration_minutes(&self) -> u64 {
        self.duration_seconds / 60
    }
}
