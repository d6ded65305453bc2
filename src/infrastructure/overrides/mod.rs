//! Identification overrides (§6): an operator-maintained file mapping a disc
//! fingerprint or disc id straight to a title, bypassing TMDB search entirely
//! for discs the confidence scorer can never resolve on its own (odd
//! regional releases, festival cuts, home movies burned with a studio
//! template).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::shared::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct OverrideEntry {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub media_type: Option<String>,
}

/// Keyed by uppercased fingerprint/disc id, mirroring the Keydb Catalog's
/// lookup convention.
pub struct OverrideCatalog {
    entries: HashMap<String, OverrideEntry>,
}

impl OverrideCatalog {
    pub fn empty() -> Self {
        Self { entries: HashMap::new() }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;
        let entries: HashMap<String, OverrideEntry> =
            serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(Self { entries })
    }

    pub fn lookup(&self, fingerprint: &str) -> Option<&OverrideEntry> {
        self.entries.get(&fingerprint.trim().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_looks_up_by_uppercased_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ABCDEF:\n  title: Home Movie 1998\n  year: 1998").unwrap();
        let catalog = OverrideCatalog::load(file.path()).unwrap();
        let entry = catalog.lookup("abcdef").unwrap();
        assert_eq!(entry.title, "Home Movie 1998");
        assert_eq!(entry.year, Some(1998));
    }

    #[test]
    fn missing_key_returns_none() {
        let catalog = OverrideCatalog::empty();
        assert!(catalog.lookup("whatever").is_none());
    }
}
