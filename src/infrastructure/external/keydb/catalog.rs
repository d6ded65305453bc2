//! Keydb Catalog (§4.12): parses and periodically refreshes the external
//! disc-id → canonical-title registry.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::value_objects::KeydbEntry;
use crate::shared::error::KeydbError;

static ALIAS_BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]").unwrap());

/// Parses one `0x<40-hex>=Title[|extras]` line into a [`KeydbEntry`].
pub fn parse_line(line: &str) -> Option<KeydbEntry> {
    let line = line.trim();
    if line.is_empty() || !line.contains('=') {
        return None;
    }
    let (raw_id, raw_value) = line.split_once('=')?;
    let hex_part = raw_id.trim().strip_prefix("0x").unwrap_or(raw_id.trim());
    if hex_part.len() != 40 || hex::decode(hex_part).is_err() {
        return None;
    }
    let disc_id = hex_part.to_uppercase();

    let value_title = raw_value.split('|').next().unwrap_or("").trim();
    let title = normalize_title(value_title);

    Some(KeydbEntry {
        disc_id,
        title,
        raw: line.to_string(),
    })
}

fn normalize_title(raw: &str) -> String {
    let with_alias = if let Some(caps) = ALIAS_BRACKET.captures(raw) {
        let alias = caps.get(1).unwrap().as_str().trim();
        if !alias.is_empty() {
            ALIAS_BRACKET.replace(raw, alias).trim().to_string()
        } else {
            ALIAS_BRACKET.replace(raw, "").trim().to_string()
        }
    } else {
        raw.trim().to_string()
    };

    strip_duplicate_wrapping(&with_alias)
}

/// Normalizes `"Foo (1990) (Foo (1990))"` by stripping the outer duplicated
/// layer when the parenthesized suffix exactly repeats the prefix (§4.12).
fn strip_duplicate_wrapping(s: &str) -> String {
    let trimmed = s.trim();
    if !trimmed.ends_with(')') {
        return trimmed.to_string();
    }

    let mut depth = 0i32;
    let mut open_idx = None;
    for (idx, c) in trimmed.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    open_idx = Some(idx);
                    break;
                }
            }
            _ => {}
        }
    }

    if let Some(idx) = open_idx {
        let inner = trimmed[idx + 1..trimmed.len() - 1].trim();
        let prefix = trimmed[..idx].trim();
        if inner == prefix && !prefix.is_empty() {
            return prefix.to_string();
        }
    }
    trimmed.to_string()
}

fn parse_file(contents: &str) -> HashMap<String, KeydbEntry> {
    contents
        .lines()
        .filter_map(parse_line)
        .map(|e| (e.disc_id.clone(), e))
        .collect()
}

/// Extracts `KEYDB.cfg` (case-insensitive name match) from a ZIP archive.
fn extract_keydb_cfg(bytes: &[u8]) -> Result<String, KeydbError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.name().eq_ignore_ascii_case("KEYDB.cfg") {
            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| KeydbError::Download(e.to_string()))?;
            return Ok(contents);
        }
    }
    Err(KeydbError::MissingEntry)
}

pub struct KeydbCatalog {
    path: PathBuf,
    download_url: String,
    max_age: Duration,
    download_timeout: Duration,
    http_client: reqwest::Client,
    entries: Mutex<HashMap<String, KeydbEntry>>,
    refreshing: Arc<AtomicBool>,
}

impl KeydbCatalog {
    pub fn new(path: PathBuf, download_url: String, max_age: Duration, download_timeout: Duration) -> Self {
        let entries = std::fs::read_to_string(&path).map(|c| parse_file(&c)).unwrap_or_default();
        Self {
            path,
            download_url,
            max_age,
            download_timeout,
            http_client: reqwest::Client::new(),
            entries: Mutex::new(entries),
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Uppercases and trims, then returns an exact-match entry (§4.12).
    pub fn lookup(&self, disc_id: &str) -> Option<KeydbEntry> {
        let key = disc_id.trim().to_uppercase();
        self.entries.lock().unwrap().get(&key).cloned()
    }

    /// Downloads synchronously if the file is missing; schedules an
    /// asynchronous single-flight refresh if it is present but stale (§4.12).
    pub async fn ensure_fresh(self: &Arc<Self>) -> Result<(), KeydbError> {
        if !self.path.exists() {
            self.download_and_store().await?;
            return Ok(());
        }

        let age = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .unwrap_or(Duration::MAX);

        if age > self.max_age && !self.refreshing.swap(true, Ordering::AcqRel) {
            let this = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(e) = this.download_and_store().await {
                    warn!(error = %e, "keydb background refresh failed");
                }
                this.refreshing.store(false, Ordering::Release);
            });
        }

        Ok(())
    }

    async fn download_and_store(&self) -> Result<(), KeydbError> {
        let bytes = tokio::time::timeout(self.download_timeout, self.http_client.get(&self.download_url).send())
            .await
            .map_err(|_| KeydbError::Download("timed out".to_string()))?
            .map_err(|e| KeydbError::Download(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| KeydbError::Download(e.to_string()))?;

        let contents = extract_keydb_cfg(&bytes)?;
        let parsed = parse_file(&contents);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("cfg.tmp");
        std::fs::write(&tmp, &contents)?;
        std::fs::rename(&tmp, &self.path)?;

        info!(entries = parsed.len(), "keydb catalog refreshed");
        *self.entries.lock().unwrap() = parsed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_entry() {
        let line = format!("0x{}={}", "A".repeat(40), "Demo Disc");
        let entry = parse_line(&line).unwrap();
        assert_eq!(entry.disc_id, "A".repeat(40));
        assert_eq!(entry.title, "Demo Disc");
    }

    #[test]
    fn rejects_non_hex_or_wrong_length_id() {
        assert!(parse_line("0xZZZ=Demo").is_none());
        assert!(parse_line("0xAB=Demo").is_none());
    }

    #[test]
    fn replaces_bracket_with_alias_when_present() {
        let line = format!("0x{}={}", "B".repeat(40), "Weird Raw Name [The Real Title]");
        let entry = parse_line(&line).unwrap();
        assert_eq!(entry.title, "The Real Title");
    }

    #[test]
    fn strips_noise_brackets_when_no_alias() {
        let line = format!("0x{}={}", "C".repeat(40), "Demo Disc []");
        let entry = parse_line(&line).unwrap();
        assert_eq!(entry.title, "Demo Disc");
    }

    #[test]
    fn normalizes_duplicated_parenthetical_title() {
        assert_eq!(
            normalize_title("Foo (1990) (Foo (1990))"),
            "Foo (1990)"
        );
    }

    #[test]
    fn ignores_value_extras_after_pipe() {
        let line = format!("0x{}={}", "D".repeat(40), "Demo Disc|extra,stuff");
        let entry = parse_line(&line).unwrap();
        assert_eq!(entry.title, "Demo Disc");
    }
}
