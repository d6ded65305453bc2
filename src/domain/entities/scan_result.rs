//! One pass of the scanner (§3).

use super::bd_info::BdInfo;
use super::title::Title;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ScanResult {
    /// Tool-reported fingerprint, hex, uppercase. Missing fingerprint is not fatal.
    pub fingerprint: Option<String>,
    pub titles: Vec<Title>,
    pub bd_info: Option<BdInfo>,
    /// Raw stdout for diagnostics.
    pub raw_output: String,
}

impl ScanResult {
    pub fn first_title_name(&self) -> Option<&str> {
        self.titles.first().map(|t| t.name.as_str())
    }

    /// Count of titles falling in the episode-runtime window (§4.13 hint rule).
    pub fn episode_runtime_title_count(&self) -> usize {
        self.titles.iter().filter(|t| t.is_episode_runtime()).count()
    }
}
