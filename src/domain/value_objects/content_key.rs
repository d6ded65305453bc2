//! `content_key` on the rip spec envelope (§3).

use std::fmt;

use super::media_kind::MediaKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKey {
    Tmdb { media_type: MediaKind, id: i64 },
    UnknownFp(String),
    UnknownPending,
}

impl ContentKey {
    pub fn tmdb(media_type: MediaKind, id: i64) -> Self {
        ContentKey::Tmdb { media_type, id }
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKey::Tmdb { media_type, id } => write!(f, "tmdb:{}:{}", media_type, id),
            ContentKey::UnknownFp(fp16) => write!(f, "unknown:{}", fp16),
            ContentKey::UnknownPending => write!(f, "unknown:pending"),
        }
    }
}

impl serde::Serialize for ContentKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_variant() {
        assert_eq!(ContentKey::tmdb(MediaKind::Movie, 1).to_string(), "tmdb:movie:1");
        assert_eq!(ContentKey::UnknownFp("abcd1234abcd1234".into()).to_string(), "unknown:abcd1234abcd1234");
        assert_eq!(ContentKey::UnknownPending.to_string(), "unknown:pending");
    }
}
