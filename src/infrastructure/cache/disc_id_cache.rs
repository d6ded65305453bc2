//! Disc-ID Cache (§4.11): thread-safe on-disk JSON cache of prior
//! disc-id → TMDB mappings, atomically replaced via tmp-then-rename.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::domain::value_objects::CacheEntry;
use crate::shared::error::CacheError;

pub struct DiscIdCache {
    path: Option<PathBuf>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl DiscIdCache {
    /// With an empty configured path, all operations degrade to no-ops (§4.11).
    pub fn new(path: Option<PathBuf>) -> Self {
        let entries = match &path {
            Some(p) => load(p),
            None => HashMap::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn store(&self, entry: CacheEntry) -> Result<(), CacheError> {
        if entry.disc_id.trim().is_empty() {
            return Ok(());
        }
        let Some(path) = &self.path else { return Ok(()) };

        let mut entries = self.entries.lock().unwrap();
        entries.insert(entry.disc_id.clone(), entry);
        persist(path, &entries)
    }

    pub fn lookup(&self, disc_id: &str) -> (Option<CacheEntry>, bool) {
        let disc_id = disc_id.trim();
        if disc_id.is_empty() || self.path.is_none() {
            return (None, false);
        }
        let entries = self.entries.lock().unwrap();
        match entries.get(disc_id) {
            Some(entry) => (Some(entry.clone()), true),
            None => (None, false),
        }
    }

    pub fn remove(&self, disc_id: &str) -> Result<(), CacheError> {
        let Some(path) = &self.path else { return Ok(()) };
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(disc_id).is_none() {
            return Err(CacheError::NotFound(disc_id.to_string()));
        }
        persist(path, &entries)
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        let Some(path) = &self.path else { return Ok(()) };
        let mut entries = self.entries.lock().unwrap();
        entries.clear();
        persist(path, &entries)
    }

    /// Copy sorted by `cached_at` descending.
    pub fn list(&self) -> Vec<CacheEntry> {
        if self.path.is_none() {
            return Vec::new();
        }
        let entries = self.entries.lock().unwrap();
        let mut list: Vec<CacheEntry> = entries.values().cloned().collect();
        list.sort_by(|a, b| b.cached_at.cmp(&a.cached_at));
        list
    }

    pub fn count(&self) -> usize {
        if self.path.is_none() {
            return 0;
        }
        self.entries.lock().unwrap().len()
    }
}

fn load(path: &Path) -> HashMap<String, CacheEntry> {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return HashMap::new();
    };
    match serde_json::from_str::<Vec<CacheEntry>>(&raw) {
        Ok(list) => list.into_iter().map(|e| (e.disc_id.clone(), e)).collect(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "disc-id cache file corrupt, starting empty");
            HashMap::new()
        }
    }
}

/// Atomically replaces the cache file: write to `<path>.tmp`, then rename
/// over the destination (§6: JSON array, pretty-printed, sorted newest-first).
fn persist(path: &Path, entries: &HashMap<String, CacheEntry>) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut list: Vec<&CacheEntry> = entries.values().collect();
    list.sort_by(|a, b| b.cached_at.cmp(&a.cached_at));

    let json = serde_json::to_string_pretty(&list)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::MediaKind;
    use chrono::Utc;

    fn entry(disc_id: &str) -> CacheEntry {
        CacheEntry {
            disc_id: disc_id.to_string(),
            tmdb_id: 1,
            media_type: MediaKind::Movie,
            title: "Demo Disc".to_string(),
            edition: None,
            season_number: None,
            year: Some(2001),
            cached_at: Utc::now(),
        }
    }

    #[test]
    fn store_then_lookup_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiscIdCache::new(Some(dir.path().join("cache.json")));
        cache.store(entry("fp1")).unwrap();
        let (found, ok) = cache.lookup("fp1");
        assert!(ok);
        assert_eq!(found.unwrap().disc_id, "fp1");
    }

    #[test]
    fn clear_empties_the_list() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiscIdCache::new(Some(dir.path().join("cache.json")));
        cache.store(entry("fp1")).unwrap();
        cache.clear().unwrap();
        assert_eq!(cache.list().len(), 0);
    }

    #[test]
    fn remove_missing_errors() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiscIdCache::new(Some(dir.path().join("cache.json")));
        assert!(cache.remove("missing").is_err());
    }

    #[test]
    fn empty_path_degrades_to_no_ops() {
        let cache = DiscIdCache::new(None);
        cache.store(entry("fp1")).unwrap();
        assert_eq!(cache.count(), 0);
        assert!(cache.list().is_empty());
        let (found, ok) = cache.lookup("fp1");
        assert!(found.is_none() && !ok);
    }
}
