//! Auxiliary Blu-ray metadata parsed from the `bd_info` tool (§3, §4.3).

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BdInfo {
    pub volume_identifier: String,
    pub disc_name: String,
    pub provider: String,
    pub disc_id: String,
    pub is_bluray: bool,
    pub has_aacs: bool,
    pub release_year: Option<u32>,
    pub studio: Option<String>,
}

impl BdInfo {
    /// Whether every key field is empty, in which case the parser should
    /// return `None` instead of an empty struct (§4.3).
    pub fn is_effectively_empty(&self) -> bool {
        self.volume_identifier.is_empty()
            && self.disc_name.is_empty()
            && self.provider.is_empty()
            && self.disc_id.is_empty()
    }
}
