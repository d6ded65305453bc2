//! A single stream within a [`Title`](super::Title) (§3).

use std::collections::BTreeMap;

/// Kind of a stream, classified from the scan tool's free-text value (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
    Data,
    Unknown,
}

impl TrackKind {
    /// Classifies a track kind from a raw attribute value by case-insensitive substring match.
    pub fn classify(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("video") {
            TrackKind::Video
        } else if lower.contains("audio") {
            TrackKind::Audio
        } else if lower.contains("sub") || lower.contains("text") {
            TrackKind::Subtitle
        } else if lower.contains("data") {
            TrackKind::Data
        } else {
            TrackKind::Unknown
        }
    }
}

/// A stream within a title. Stream id is unique within its title; `order`
/// reflects first-seen position.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Track {
    pub stream_id: u32,
    pub order: usize,
    pub kind: TrackKind,
    pub codec_id: String,
    pub codec_short: String,
    pub codec_long: String,
    pub language_code: String,
    pub language_name: String,
    pub name: String,
    pub channel_count: Option<u32>,
    pub channel_layout: String,
    pub bit_rate: String,
    /// Attributes not otherwise modeled, keyed by attribute id. Empty values
    /// are normalized to absent to keep fingerprints stable.
    pub attributes: BTreeMap<u32, String>,
}

impl Track {
    pub fn new(stream_id: u32, order: usize) -> Self {
        Self {
            stream_id,
            order,
            kind: TrackKind::Unknown,
            codec_id: String::new(),
            codec_short: String::new(),
            codec_long: String::new(),
            language_code: String::new(),
            language_name: String::new(),
            name: String::new(),
            channel_count: None,
            channel_layout: String::new(),
            bit_rate: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Records an attribute, dropping it entirely if the value is empty so
    /// fingerprints stay stable regardless of which optional fields a given
    /// tool version reports.
    pub fn set_attribute(&mut self, id: u32, value: String) {
        if value.is_empty() {
            self.attributes.remove(&id);
        } else {
            self.attributes.insert(id, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_kind_by_substring() {
        assert_eq!(TrackKind::classify("Video"), TrackKind::Video);
        assert_eq!(TrackKind::classify("AC3 Audio"), TrackKind::Audio);
        assert_eq!(TrackKind::classify("Subtitle/Text"), TrackKind::Subtitle);
        assert_eq!(TrackKind::classify("Data"), TrackKind::Data);
        assert_eq!(TrackKind::classify("Something Else"), TrackKind::Unknown);
    }

    #[test]
    fn empty_attribute_value_is_absent() {
        let mut t = Track::new(1, 0);
        t.set_attribute(40, "5.1".to_string());
        t.set_attribute(40, "".to_string());
        assert!(!t.attributes.contains_key(&40));
    }
}
