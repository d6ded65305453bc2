//! Configuration surface (§6, §10).
//!
//! Loaded from a TOML file with environment-variable overrides. Validation
//! happens at construction so configuration errors surface at health-check
//! time rather than buried inside the identifier.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::shared::error::ConfigError;

/// Recognized configuration options (§6).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Optical drive path or `disc:N`. Required for real scans.
    pub optical_drive: Option<String>,
    /// Path to the MakeMKV-compatible extractor binary.
    #[serde(default = "Config::default_makemkv_binary")]
    pub makemkv_binary: String,
    /// Optional wrapping timeout, in seconds, around the scanner invocation.
    pub makemkv_info_timeout: Option<u64>,
    /// TMDB API key.
    pub tmdb_api_key: Option<String>,
    /// TMDB base URL.
    #[serde(default = "Config::default_tmdb_base_url")]
    pub tmdb_base_url: String,
    /// TMDB language parameter.
    #[serde(default = "Config::default_tmdb_language")]
    pub tmdb_language: String,
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Path to the on-disk disc-id → canonical-title registry.
    pub keydb_path: Option<PathBuf>,
    /// URL to download the keydb archive from when missing or stale.
    #[serde(default = "Config::default_keydb_download_url")]
    pub keydb_download_url: String,
    /// Timeout, in seconds, for the keydb download.
    #[serde(default = "Config::default_keydb_download_timeout")]
    pub keydb_download_timeout: u64,
    /// Optional manual fingerprint/disc-id → title override file.
    pub identification_overrides_path: Option<PathBuf>,
    /// Path to the on-disk disc-id → TMDB cache file. Absent disables caching.
    pub disc_id_cache_path: Option<PathBuf>,
    /// Base directory for staging skeletons.
    pub staging_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    /// Confidence gate for exact matches; 0 disables.
    #[serde(default)]
    pub min_vote_count_exact_match: i32,
}

impl Config {
    pub const TMDB_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    pub const SEARCH_GATEWAY_MIN_INTERVAL: Duration = Duration::from_millis(250);
    pub const SEARCH_GATEWAY_CACHE_TTL: Duration = Duration::from_secs(3600);
    pub const KEYDB_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 3600);
    pub const DRIVE_WAIT_POLL_INTERVAL: Duration = Duration::from_secs(1);
    pub const DRIVE_WAIT_MAX_ATTEMPTS: u32 = 60;
    pub const FINGERPRINT_FALLBACK_PREFIX_BYTES: usize = 64 * 1024;

    fn default_makemkv_binary() -> String {
        "makemkvcon".to_string()
    }

    fn default_tmdb_base_url() -> String {
        "https://api.themoviedb.org/3".to_string()
    }

    fn default_tmdb_language() -> String {
        "en-US".to_string()
    }

    fn default_keydb_download_url() -> String {
        "http://labs.makemkv.com/KEYDB.cfg.zip".to_string()
    }

    fn default_keydb_download_timeout() -> u64 {
        300
    }

    /// Loads configuration from a TOML file, applying environment-variable overrides,
    /// then validates required fields.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;
        let mut config: Config = toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            config.tmdb_api_key = Some(key);
        }
        if let Ok(url) = std::env::var("TMDB_BASE_URL") {
            config.tmdb_base_url = url;
        }
        if let Ok(drive) = std::env::var("OPTICAL_DRIVE") {
            config.optical_drive = Some(drive);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tmdb_api_key.as_deref().unwrap_or_default().is_empty() {
            return Err(ConfigError::MissingRequired("tmdb_api_key".to_string()));
        }
        if self.makemkv_binary.trim().is_empty() {
            return Err(ConfigError::MissingRequired("makemkv_binary".to_string()));
        }
        Ok(())
    }

    pub fn makemkv_info_timeout(&self) -> Option<Duration> {
        self.makemkv_info_timeout.map(Duration::from_secs)
    }

    pub fn keydb_download_timeout(&self) -> Duration {
        Duration::from_secs(self.keydb_download_timeout)
    }
}
