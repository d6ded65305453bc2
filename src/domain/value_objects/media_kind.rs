//! Media-kind hint driving search mode order (§4.7, §4.13).

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
    Unknown,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
            MediaKind::Unknown => "unknown",
        }
    }

    /// Mode order the search gateway tries, per §4.7: `tv` hint tries tv
    /// first; `movie`/`unknown` try movie first. Multi is always last resort.
    pub fn search_mode_order(&self) -> [SearchMode; 3] {
        match self {
            MediaKind::Tv => [SearchMode::Tv, SearchMode::Movie, SearchMode::Multi],
            MediaKind::Movie | MediaKind::Unknown => {
                [SearchMode::Movie, SearchMode::Tv, SearchMode::Multi]
            }
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaKind::Movie),
            "tv" => Ok(MediaKind::Tv),
            "unknown" => Ok(MediaKind::Unknown),
            _ => Err(()),
        }
    }
}

/// TMDB search mode dispatched by the search gateway (§4.7, §9 "tagged variant" guidance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    Movie,
    Tv,
    Multi,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Movie => "movie",
            SearchMode::Tv => "tv",
            SearchMode::Multi => "multi",
        }
    }
}
