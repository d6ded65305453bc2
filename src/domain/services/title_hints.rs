//! Normalization of disc labels and query construction (§4.9).

use crate::shared::text::RomanNumeralConverter;
use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_TRAILING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s(]*(\b(?:18[89]\d|19\d{2}|20\d{2})\b)\)?\s*$").unwrap());
static SEASON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)season\s*(\d{1,2})").unwrap());
static SEASON_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bs(\d{1,2})\b").unwrap());
static DISC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(disc|dvd|blu[- ]?ray|bd)\s*(\d{1,2}|[ivxlcdm]{1,4})\b").unwrap());
static DESCRIPTOR_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(tv series|complete series)\b").unwrap());
static CAPS_NOISE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9_]{1,6}\s+").unwrap());

pub struct TitleHints;

impl TitleHints {
    /// Replaces `_`, `-`, en-dash with space, strips parentheses (keeps
    /// content), collapses whitespace (§4.9).
    pub fn sanitize_query_candidate(input: &str) -> String {
        let replaced = input
            .chars()
            .map(|c| match c {
                '_' | '-' | '\u{2013}' => ' ',
                '(' | ')' => ' ',
                other => other,
            })
            .collect::<String>();
        replaced.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Strips a trailing 4-digit year (bare or parenthesized, 1880-2100);
    /// returns (cleaned_title, year).
    pub fn split_title_year(input: &str) -> (String, Option<u32>) {
        if let Some(caps) = YEAR_TRAILING.captures(input) {
            let year: u32 = caps[1].parse().unwrap_or(0);
            if (1880..=2100).contains(&year) {
                let matched = caps.get(0).unwrap();
                let cleaned = input[..matched.start()].trim().to_string();
                return (cleaned, Some(year));
            }
        }
        (input.trim().to_string(), None)
    }

    /// Removes season/disc markers and descriptor noise; returns best show
    /// title and best season number seen across candidates.
    pub fn derive_show_hint(candidates: &[&str]) -> (String, Option<u32>) {
        let mut best_title = String::new();
        let mut best_season = None;

        for candidate in candidates {
            if let Some(n) = Self::extract_season_number(&[candidate]) {
                best_season = best_season.or(Some(n));
            }

            let mut cleaned = SEASON_WORD.replace_all(candidate, "").to_string();
            cleaned = SEASON_LETTER.replace_all(&cleaned, "").to_string();
            cleaned = DISC_TOKEN.replace_all(&cleaned, "").to_string();
            cleaned = DESCRIPTOR_NOISE.replace_all(&cleaned, "").to_string();
            cleaned = CAPS_NOISE_PREFIX.replace(&cleaned, "").to_string();
            let cleaned = Self::sanitize_query_candidate(&cleaned);

            if !cleaned.is_empty() && best_title.is_empty() {
                best_title = cleaned;
            }
        }

        (best_title, best_season)
    }

    /// First integer from `Season (\d{1,2})` or `\bS(\d{1,2})\b`.
    pub fn extract_season_number(candidates: &[&str]) -> Option<u32> {
        for candidate in candidates {
            if let Some(caps) = SEASON_WORD.captures(candidate) {
                return caps[1].parse().ok();
            }
            if let Some(caps) = SEASON_LETTER.captures(candidate) {
                return caps[1].parse().ok();
            }
        }
        None
    }

    /// `\b(disc|dvd|blu[- ]?ray|bd)\s*(\d{1,2}|[ivxlcdm]{1,4})\b`, with
    /// Roman numeral support.
    pub fn extract_disc_number(candidates: &[&str]) -> Option<u32> {
        for candidate in candidates {
            if let Some(caps) = DISC_TOKEN.captures(candidate) {
                let raw = &caps[2];
                if let Ok(n) = raw.parse::<u32>() {
                    return Some(n);
                }
                if let Some(n) = RomanNumeralConverter::roman_to_arabic(&raw.to_uppercase()) {
                    return Some(n);
                }
            }
        }
        None
    }

    /// Sanitizes and deduplicates (case-insensitive), preserving order.
    pub fn build_query_list(candidates: &[&str]) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for candidate in candidates {
            let sanitized = Self::sanitize_query_candidate(candidate);
            if sanitized.is_empty() {
                continue;
            }
            let key = sanitized.to_lowercase();
            if seen.insert(key) {
                out.push(sanitized);
            }
        }
        out
    }

    /// When `title` ends in parentheses, returns `(canonical, label)` with
    /// the parenthesized content as canonical and the prefix as label.
    /// Rejects year-only parens or `DISC*`/`VOL*`/`DVD*`/`BD*` prefixes.
    pub fn extract_canonical_title(title: &str) -> Option<(String, String)> {
        let trimmed = title.trim();
        if !trimmed.ends_with(')') {
            return None;
        }
        let open = trimmed.rfind('(')?;
        let inner = &trimmed[open + 1..trimmed.len() - 1];
        let prefix = trimmed[..open].trim();

        if inner.trim().parse::<u32>().is_ok() {
            return None;
        }
        let upper_prefix = prefix.to_uppercase();
        if ["DISC", "VOL", "DVD", "BD"]
            .iter()
            .any(|p| upper_prefix.starts_with(p))
        {
            return None;
        }
        if inner.trim().is_empty() || prefix.is_empty() {
            return None;
        }
        Some((inner.trim().to_string(), prefix.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_underscores_dashes_and_parens() {
        assert_eq!(
            TitleHints::sanitize_query_candidate("South_Park-Season(5)"),
            "South Park Season 5"
        );
    }

    #[test]
    fn splits_trailing_year() {
        assert_eq!(
            TitleHints::split_title_year("Demo Disc (2001)"),
            ("Demo Disc".to_string(), Some(2001))
        );
        assert_eq!(
            TitleHints::split_title_year("Demo Disc 2001"),
            ("Demo Disc".to_string(), Some(2001))
        );
        assert_eq!(
            TitleHints::split_title_year("Demo Disc"),
            ("Demo Disc".to_string(), None)
        );
    }

    #[test]
    fn extracts_season_number_from_either_form() {
        assert_eq!(
            TitleHints::extract_season_number(&["South Park Season 5 Disc 1"]),
            Some(5)
        );
        assert_eq!(TitleHints::extract_season_number(&["SOUTHPARK_S05_D1"]), Some(5));
        assert_eq!(TitleHints::extract_season_number(&["The Matrix"]), None);
    }

    #[test]
    fn extracts_disc_number_arabic_and_roman() {
        assert_eq!(
            TitleHints::extract_disc_number(&["South Park Season 5 Disc 1"]),
            Some(1)
        );
        assert_eq!(TitleHints::extract_disc_number(&["Show Disc III"]), Some(3));
    }

    #[test]
    fn builds_deduplicated_query_list() {
        let queries = TitleHints::build_query_list(&["Demo Disc", "demo-disc", "Other"]);
        assert_eq!(queries, vec!["Demo Disc".to_string(), "Other".to_string()]);
    }

    #[test]
    fn extracts_canonical_title_from_parens() {
        let result = TitleHints::extract_canonical_title("Label (The Real Title)");
        assert_eq!(
            result,
            Some(("The Real Title".to_string(), "Label".to_string()))
        );
        assert_eq!(TitleHints::extract_canonical_title("Demo Disc (2001)"), None);
        assert_eq!(TitleHints::extract_canonical_title("DISC 1 (The Matrix)"), None);
    }

    #[test]
    fn derives_show_hint_strips_noise() {
        let (title, season) = TitleHints::derive_show_hint(&[
            "South Park Season 5 Disc 1",
            "SOUTHPARK5_DISC1",
        ]);
        assert_eq!(season, Some(5));
        assert!(title.to_lowercase().contains("south park"));
    }
}
