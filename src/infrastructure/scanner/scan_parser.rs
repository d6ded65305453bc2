//! Parses the extraction tool's "robot mode" output into typed title/track
//! data (§4.3).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::domain::entities::{Title, Track, TrackKind};
use crate::domain::{BdInfo, ScanResult};
use crate::shared::error::ScanError;

static HEX_16_PLUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9A-Fa-f]{16,}").unwrap());
static FINGERPRINT_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)fingerprint").unwrap());
static DURATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):(\d{2}):(\d{2})$").unwrap());

const ERROR_MARKERS: &[&str] = &[
    "too old",
    "registration key",
    "failed",
    "error",
    "copy protection",
    "no disc",
    "not found",
    "read error",
    "i/o error",
    "timeout",
];

/// Splits a comma-separated line, treating double-quoted spans as atomic and
/// stripping their quotes.
fn split_csv_fields(payload: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = payload.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}

fn parse_duration_seconds(raw: &str) -> u64 {
    match DURATION.captures(raw) {
        Some(caps) => {
            let h: u64 = caps[1].parse().unwrap_or(0);
            let m: u64 = caps[2].parse().unwrap_or(0);
            let s: u64 = caps[3].parse().unwrap_or(0);
            h * 3600 + m * 60 + s
        }
        None => 0,
    }
}

/// Extracts the tool-reported fingerprint by priority: a line containing
/// "fingerprint" with a hex run, `CINFO:32` payload, then the first hex run
/// anywhere (§4.3). Normalized to uppercase.
fn extract_fingerprint(raw_output: &str, cinfo32: Option<&str>) -> Option<String> {
    for line in raw_output.lines() {
        if FINGERPRINT_LINE.is_match(line) {
            if let Some(m) = HEX_16_PLUS.find(line) {
                return Some(m.as_str().to_uppercase());
            }
        }
    }
    if let Some(value) = cinfo32 {
        if let Some(m) = HEX_16_PLUS.find(value) {
            return Some(m.as_str().to_uppercase());
        }
    }
    HEX_16_PLUS.find(raw_output).map(|m| m.as_str().to_uppercase())
}

/// From concatenated stdout+stderr, picks the first `MSG:…,"text"` whose
/// text matches a known failure marker; falls back to the first non-empty
/// line (§4.3).
pub fn extract_error_message(combined_output: &str) -> String {
    for line in combined_output.lines() {
        if let Some(rest) = line.strip_prefix("MSG:") {
            let fields = split_csv_fields(rest);
            if let Some(text) = fields.get(3) {
                let lower = text.to_lowercase();
                if ERROR_MARKERS.iter().any(|marker| lower.contains(marker)) {
                    return text.clone();
                }
            }
        }
    }
    combined_output
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .to_string()
}

pub struct ScanParser;

impl ScanParser {
    /// Parses robot-mode output into a [`ScanResult`]. Returns `EmptyOutput`
    /// only for genuinely empty input; otherwise returns a best-effort
    /// result even with partial records.
    pub fn parse(raw_output: &str) -> Result<ScanResult, ScanError> {
        if raw_output.trim().is_empty() {
            return Err(ScanError::EmptyOutput);
        }

        let mut titles: BTreeMap<u32, Title> = BTreeMap::new();
        let mut cinfo32: Option<String> = None;

        for line in raw_output.lines() {
            let Some((tag, payload)) = line.split_once(':') else {
                continue;
            };

            match tag {
                "CINFO" => {
                    let fields = split_csv_fields(payload);
                    if fields.first().map(|a| a.as_str()) == Some("32") {
                        if let Some(value) = fields.get(2) {
                            cinfo32 = Some(value.clone());
                        }
                    }
                }
                "TINFO" => {
                    let fields = split_csv_fields(payload);
                    let Some(title_id) = fields.first().and_then(|f| f.parse::<u32>().ok()) else {
                        continue;
                    };
                    let Some(attr) = fields.get(1).and_then(|f| f.parse::<u32>().ok()) else {
                        continue;
                    };
                    let value = fields.get(3).cloned().unwrap_or_default();
                    let title = titles.entry(title_id).or_insert_with(|| Title::new(title_id));

                    match attr {
                        2 => title.name = value,
                        8 => title.chapter_count = value.parse().ok(),
                        9 => title.duration_seconds = parse_duration_seconds(&value),
                        16 => title.playlist = Some(value).filter(|v| !v.is_empty()),
                        25 => title.segment_count = value.parse().ok(),
                        26 => title.segment_map = Some(value).filter(|v| !v.is_empty()),
                        _ => {}
                    }
                }
                "SINFO" => {
                    let fields = split_csv_fields(payload);
                    let Some(title_id) = fields.first().and_then(|f| f.parse::<u32>().ok()) else {
                        continue;
                    };
                    let Some(stream_id) = fields.get(1).and_then(|f| f.parse::<u32>().ok()) else {
                        continue;
                    };
                    let Some(attr) = fields.get(2).and_then(|f| f.parse::<u32>().ok()) else {
                        continue;
                    };
                    let value = fields.get(4).cloned().unwrap_or_default();

                    let title = titles.entry(title_id).or_insert_with(|| Title::new(title_id));
                    let order = title.tracks.len();
                    let track = if let Some(existing) = title.tracks.iter_mut().find(|t| t.stream_id == stream_id) {
                        existing
                    } else {
                        title.tracks.push(Track::new(stream_id, order));
                        title.tracks.last_mut().unwrap()
                    };

                    match attr {
                        1 => track.kind = TrackKind::classify(&value),
                        2 | 30 => track.name = value,
                        3 | 28 => track.language_code = value,
                        4 | 29 => track.language_name = value,
                        5 => track.codec_id = value,
                        6 => track.codec_short = value,
                        7 => track.codec_long = value,
                        13 => track.bit_rate = value,
                        14 => track.channel_count = value.parse().ok(),
                        40 => track.channel_layout = value,
                        other => track.set_attribute(other, value),
                    }
                }
                _ => {}
            }
        }

        let fingerprint = extract_fingerprint(raw_output, cinfo32.as_deref());

        Ok(ScanResult {
            fingerprint,
            titles: titles.into_values().collect(),
            bd_info: None,
            raw_output: raw_output.to_string(),
        })
    }
}

/// Auxiliary Blu-ray info parser (§4.3): line-oriented `key : value` tokens.
pub struct BdInfoParser;

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());
static VOLUME_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(_S\d+_DISC_\d+|_TV)$").unwrap());
static LEADING_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[_\s]*").unwrap());

const STUDIO_MARKERS: &[(&str, &str)] = &[
    ("sony", "Sony Pictures"),
    ("warner", "Warner Bros"),
    ("universal", "Universal Pictures"),
    ("disney", "Walt Disney Pictures"),
    ("paramount", "Paramount Pictures"),
    ("mgm", "Metro-Goldwyn-Mayer"),
    ("fox", "20th Century Fox"),
    ("lionsgate", "Lionsgate"),
];

impl BdInfoParser {
    pub fn parse(raw_output: &str) -> Option<BdInfo> {
        let mut info = BdInfo::default();

        for line in raw_output.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim().trim_matches('"').to_string();

            match key.as_str() {
                "volume identifier" => info.volume_identifier = value,
                "disc title" => info.disc_name = value,
                "bluray detected" => info.is_bluray = value.eq_ignore_ascii_case("yes"),
                "aacs detected" => info.has_aacs = value.eq_ignore_ascii_case("yes"),
                "provider data" => info.provider = value,
                _ => {}
            }
        }

        if info.disc_name.is_empty() && !info.volume_identifier.is_empty() {
            info.disc_name = Self::derive_disc_name(&info.volume_identifier);
        }

        info.release_year = YEAR_PATTERN
            .find(&info.disc_name)
            .or_else(|| YEAR_PATTERN.find(&info.volume_identifier))
            .and_then(|m| m.as_str().parse().ok());

        info.studio = Self::derive_studio(&info.provider);

        if info.is_effectively_empty() {
            None
        } else {
            Some(info)
        }
    }

    fn derive_disc_name(volume_identifier: &str) -> String {
        let without_suffix = VOLUME_SUFFIX.replace(volume_identifier, "");
        let without_prefix = LEADING_NUMERIC.replace(&without_suffix, "");
        without_prefix.replace('_', " ").trim().to_string()
    }

    fn derive_studio(provider: &str) -> Option<String> {
        let lower = provider.to_lowercase();
        for (marker, name) in STUDIO_MARKERS {
            if lower.contains(marker) {
                return Some(name.to_string());
            }
        }
        let cleaned = provider.trim();
        if cleaned.len() > 3 {
            Some(cleaned.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_output_error() {
        assert!(matches!(ScanParser::parse(""), Err(ScanError::EmptyOutput)));
        assert!(matches!(ScanParser::parse("   \n  "), Err(ScanError::EmptyOutput)));
    }

    #[test]
    fn parses_title_and_stream_attributes() {
        let raw = concat!(
            "CINFO:32,0,\"ABCDEF0123456789ABCDEF0123456789\"\n",
            "TINFO:0,2,0,\"Demo Disc\"\n",
            "TINFO:0,9,0,\"1:56:40\"\n",
            "SINFO:0,0,1,0,\"Video\"\n",
            "SINFO:0,0,5,0,\"V_MPEG4/ISO/AVC\"\n",
            "SINFO:0,1,1,0,\"Audio\"\n",
            "SINFO:0,1,3,0,\"eng\"\n",
        );
        let result = ScanParser::parse(raw).unwrap();
        assert_eq!(result.titles.len(), 1);
        let title = &result.titles[0];
        assert_eq!(title.name, "Demo Disc");
        assert_eq!(title.duration_seconds, 7000);
        assert_eq!(title.tracks.len(), 2);
        assert_eq!(title.tracks[0].kind, TrackKind::Video);
        assert_eq!(title.tracks[1].language_code, "eng");
        assert_eq!(result.fingerprint.as_deref(), Some("ABCDEF0123456789ABCDEF0123456789"));
    }

    #[test]
    fn duration_boundary_values_fall_back_to_zero() {
        for input in ["", " ", "not a time", "1:2:3:4"] {
            assert_eq!(parse_duration_seconds(input), 0, "input={input:?}");
        }
        assert_eq!(parse_duration_seconds("0:05:00"), 300);
    }

    #[test]
    fn extracts_error_message_by_marker() {
        let combined = "MSG:1001,0,0,\"starting up\"\nMSG:5021,0,0,\"Disc access failed: read error\"\n";
        assert_eq!(extract_error_message(combined), "Disc access failed: read error");
    }

    #[test]
    fn falls_back_to_first_nonempty_line() {
        let combined = "\nsomething unexpected happened\n";
        assert_eq!(extract_error_message(combined), "something unexpected happened");
    }

    #[test]
    fn bd_info_derives_disc_name_from_volume_identifier() {
        let raw = "Volume Identifier : 01_SOUTHPARK_S5_DISC_1\nBluRay detected : yes\n";
        let info = BdInfoParser::parse(raw).unwrap();
        assert_eq!(info.disc_name, "SOUTHPARK");
    }

    #[test]
    fn bd_info_returns_none_when_all_fields_empty() {
        let raw = "Some Random Line : without recognized keys\n";
        assert!(BdInfoParser::parse(raw).is_none());
    }
}
