//! Predicate over candidate labels: generic/technical vs. usable as a query (§4.2).

use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static SHORT_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9_]{1,4}$").unwrap());
static SHORT_CODE_GENERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9_]{1,3}$").unwrap());
static ALL_CAPS_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9_]+$").unwrap());

const UNUSABLE_SUBSTRINGS: &[&str] = &[
    "LOGICAL_VOLUME_ID",
    "VOLUME_ID",
    "DVD_VIDEO",
    "BLURAY",
    "BD_ROM",
    "UNTITLED",
    "UNKNOWN DISC",
    "VOLUME_",
    "VOLUME ID",
    "DISK_",
    "TRACK_",
];

pub struct LabelClassifier;

impl LabelClassifier {
    /// Rejects strings unfit for content identification (§4.2).
    pub fn is_unusable_label(label: &str) -> bool {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return true;
        }
        let upper = trimmed.to_uppercase();

        if UNUSABLE_SUBSTRINGS.iter().any(|needle| upper.contains(needle)) {
            return true;
        }
        if DIGITS_ONLY.is_match(trimmed) {
            return true;
        }
        if SHORT_CODE.is_match(trimmed) {
            return true;
        }
        if (upper.contains("DISC") || upper.contains("DISK")) && trimmed.contains('_') {
            return true;
        }
        if trimmed.len() > 8 && ALL_CAPS_UNDERSCORE.is_match(trimmed) {
            return true;
        }
        false
    }

    /// A narrower subset of [`is_unusable_label`]: no length-8 heuristic,
    /// short-code limit of 3 (§4.2).
    pub fn is_generic_label(label: &str) -> bool {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return true;
        }
        let upper = trimmed.to_uppercase();

        if UNUSABLE_SUBSTRINGS.iter().any(|needle| upper.contains(needle)) {
            return true;
        }
        if DIGITS_ONLY.is_match(trimmed) {
            return true;
        }
        if SHORT_CODE_GENERIC.is_match(trimmed) {
            return true;
        }
        if (upper.contains("DISC") || upper.contains("DISK")) && trimmed.contains('_') {
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(LabelClassifier::is_unusable_label(""));
        assert!(LabelClassifier::is_unusable_label("   "));
    }

    #[test]
    fn rejects_known_substrings() {
        assert!(LabelClassifier::is_unusable_label("LOGICAL_VOLUME_ID"));
        assert!(LabelClassifier::is_unusable_label("dvd_video"));
        assert!(LabelClassifier::is_unusable_label("SOME_UNKNOWN DISC_THING"));
    }

    #[test]
    fn rejects_digits_and_short_codes() {
        assert!(LabelClassifier::is_unusable_label("12345"));
        assert!(LabelClassifier::is_unusable_label("AB12"));
    }

    #[test]
    fn rejects_disc_with_underscore() {
        assert!(LabelClassifier::is_unusable_label("DISC_1"));
        assert!(!LabelClassifier::is_unusable_label("DISC ONE"));
    }

    #[test]
    fn rejects_long_all_caps_underscore() {
        assert!(LabelClassifier::is_unusable_label("SOUTHPARK5_DISC1"));
    }

    #[test]
    fn accepts_real_titles() {
        assert!(!LabelClassifier::is_unusable_label("South Park Season 5 Disc 1"));
        assert!(!LabelClassifier::is_unusable_label("The Matrix"));
    }

    #[test]
    fn generic_label_is_narrower() {
        // length-8 all-caps-underscore is unusable but not generic
        assert!(LabelClassifier::is_unusable_label("ABCDEFGH_"));
        assert!(!LabelClassifier::is_generic_label("ABCDEFGH_"));
        // 4-char short code is unusable but not generic (generic caps at 3)
        assert!(LabelClassifier::is_unusable_label("AB12"));
        assert!(!LabelClassifier::is_generic_label("AB12"));
    }
}
