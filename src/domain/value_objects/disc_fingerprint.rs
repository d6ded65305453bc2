//! 64-hex-char SHA-256 of a deterministic disc manifest (§3, §4.1).

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DiscFingerprint(String);

impl DiscFingerprint {
    /// Builds from a lowercase 64-hex digest, as produced by the fingerprinter.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 16 hex chars, used in the `unknown:<fp16>` content key form (§3).
    pub fn short(&self) -> String {
        self.0.chars().take(16).collect()
    }

    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for DiscFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
