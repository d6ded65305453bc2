//! Typed errors, one concern per enum, plus a top-level umbrella.
//!
//! Review conditions (§7) are never represented as `Err` — they are plain
//! data mutations on the queue item. These enums cover infrastructure and
//! validation failures only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("mount point for device {0} not found")]
    MountNotFound(String),
    #[error("no structural metadata found to fingerprint")]
    NoMetadata,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scanner output was empty")]
    EmptyOutput,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("extractor tool failed: {0}")]
    ExternalTool(#[from] ExternalToolError),
}

#[derive(Debug, Error)]
pub enum ExternalToolError {
    #[error("{binary} exited with status {code}: {message}")]
    NonZeroExit {
        binary: String,
        code: i32,
        message: String,
    },
    #[error("{binary} not found on PATH")]
    NotFound { binary: String },
    #[error("{binary} timed out after {0:?}", .timeout)]
    Timeout { binary: String, timeout: std::time::Duration },
    #[error("io error running {binary}: {source}")]
    Io { binary: String, source: std::io::Error },
}

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("io error opening {0}: {1}")]
    Open(String, std::io::Error),
    #[error("ioctl failed on {0}: {1}")]
    Ioctl(String, std::io::Error),
    #[error("drive not ready after {0} attempts, last status: {1}")]
    NotReady(u32, String),
    #[error("eject failed for {0}: {1}")]
    EjectFailed(String, String),
    #[error("drive controller unsupported on this platform")]
    Unsupported,
    #[error("operation cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("empty query")]
    EmptyQuery,
    #[error("http status {status} after {latency:?}")]
    Status {
        status: u16,
        latency: std::time::Duration,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TmdbError {
    fn from(err: reqwest::Error) -> Self {
        TmdbError::Network(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("disc id {0} not found")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum KeydbError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("download failed: {0}")]
    Download(String),
    #[error("archive did not contain KEYDB.cfg")]
    MissingEntry,
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing fingerprint")]
    MissingFingerprint,
    #[error("rip spec failed to parse: {0}")]
    RipSpecParse(String),
    #[error("rip spec fingerprint {rip_spec} does not match item fingerprint {item}")]
    FingerprintMismatch { rip_spec: String, item: String },
    #[error("invalid media type: {0}")]
    InvalidMediaType(String),
    #[error("non-positive tmdb id: {0}")]
    NonPositiveTmdbId(i64),
    #[error("identified title is empty")]
    EmptyTitle,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {0}: {1}")]
    Io(String, String),
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("missing required configuration value: {0}")]
    MissingRequired(String),
}

/// Cancellation token error: a suspension point observed cancellation before completing.
#[derive(Debug, Error, Clone, Copy)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Umbrella error for the identifier orchestrator and CLI edge.
#[derive(Debug, Error)]
pub enum IdentifyError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("external tool error: {0}")]
    ExternalTool(#[from] ExternalToolError),
    #[error("drive error: {0}")]
    Drive(#[from] DriveError),
    #[error("tmdb error: {0}")]
    Tmdb(#[from] TmdbError),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("keydb error: {0}")]
    Keydb(#[from] KeydbError),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("cancelled: {0}")]
    Cancelled(#[from] Cancelled),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
