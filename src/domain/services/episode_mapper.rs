//! Maps anonymous scanned titles to season episode numbers by runtime
//! proximity, with a disc-number offset (§4.10).

use crate::domain::entities::Title;
use std::collections::{BTreeMap, HashSet};

/// One TMDB episode row for a season, reduced to the fields the mapper needs.
#[derive(Debug, Clone)]
pub struct TmdbEpisode {
    pub episode_number: i32,
    pub name: String,
    pub air_date: Option<String>,
    /// Minutes; 0 means unknown.
    pub runtime_minutes: u32,
}

#[derive(Debug, Clone)]
pub struct MappedEpisode {
    pub season: i32,
    pub episode: i32,
    pub name: String,
    pub air_date: Option<String>,
}

pub struct EpisodeMapper;

const FALLBACK_RUNTIME_MINUTES: u32 = 22;
const ACCEPT_DELTA_SECONDS: i64 = 5 * 60;

impl EpisodeMapper {
    /// Maps each episode-runtime title (in disc order) to the closest unused
    /// episode by runtime proximity. Returns `(titleId -> MappedEpisode,
    /// sorted episode numbers)`.
    pub fn map(
        season: i32,
        titles: &[Title],
        episodes: &[TmdbEpisode],
        disc_number: u32,
    ) -> (BTreeMap<u32, MappedEpisode>, Vec<i32>) {
        let episodic: Vec<&Title> = titles.iter().filter(|t| t.is_episode_runtime()).collect();
        if episodic.is_empty() || episodes.is_empty() {
            return (BTreeMap::new(), Vec::new());
        }

        let episodic_count = episodic.len();
        let total_episodes = episodes.len();
        let mut start = if disc_number > 0 {
            (disc_number as usize - 1) * episodic_count
        } else {
            0
        };
        if start + episodic_count > total_episodes {
            start = total_episodes.saturating_sub(episodic_count);
        }

        let mut used = HashSet::new();
        let mut result = BTreeMap::new();
        let mut matched_numbers = Vec::new();

        for title in episodic {
            let title_seconds = title.duration_seconds as i64;

            let forward = Self::best_in_range(episodes, start..total_episodes, &used, title_seconds);
            let candidate = match forward {
                Some((idx, delta)) if delta <= ACCEPT_DELTA_SECONDS => Some(idx),
                _ => {
                    let prefix = Self::best_in_range(episodes, 0..start, &used, title_seconds);
                    match prefix {
                        Some((idx, delta)) if delta <= ACCEPT_DELTA_SECONDS => Some(idx),
                        _ => forward.map(|(idx, _)| idx).or(prefix.map(|(idx, _)| idx)),
                    }
                }
            };

            if let Some(idx) = candidate {
                used.insert(idx);
                let ep = &episodes[idx];
                result.insert(
                    title.id,
                    MappedEpisode {
                        season,
                        episode: ep.episode_number,
                        name: ep.name.clone(),
                        air_date: ep.air_date.clone(),
                    },
                );
                matched_numbers.push(ep.episode_number);
            }
        }

        matched_numbers.sort_unstable();
        (result, matched_numbers)
    }

    fn best_in_range(
        episodes: &[TmdbEpisode],
        range: std::ops::Range<usize>,
        used: &HashSet<usize>,
        title_seconds: i64,
    ) -> Option<(usize, i64)> {
        range
            .filter(|idx| !used.contains(idx))
            .map(|idx| {
                let ep = &episodes[idx];
                let runtime_minutes = if ep.runtime_minutes > 0 {
                    ep.runtime_minutes
                } else if title_seconds > 0 {
                    (title_seconds / 60) as u32
                } else {
                    FALLBACK_RUNTIME_MINUTES
                };
                let delta = (runtime_minutes as i64 * 60 - title_seconds).abs();
                (idx, delta)
            })
            .min_by_key(|(_, delta)| *delta)
    }

    /// Placeholder rows for episode-runtime titles when the season is known
    /// but episode numbers cannot yet be looked up. Deduplicated by
    /// `segment_map` (preferred) or `title_hash`.
    pub fn placeholders(season: i32, titles: &[Title], title_hashes: &BTreeMap<u32, String>) -> Vec<MappedEpisode> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for title in titles.iter().filter(|t| t.is_episode_runtime()) {
            let dedup_key = title
                .segment_map
                .clone()
                .or_else(|| title_hashes.get(&title.id).cloned())
                .unwrap_or_default();

            if !dedup_key.is_empty() && !seen.insert(dedup_key) {
                continue;
            }

            out.push(MappedEpisode {
                season,
                episode: 0,
                name: String::new(),
                air_date: None,
            });
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(id: u32, minutes: u64) -> Title {
        let mut t = Title::new(id);
        t.duration_seconds = minutes * 60;
        t
    }

    fn episode(n: i32, minutes: u32) -> TmdbEpisode {
        TmdbEpisode {
            episode_number: n,
            name: format!("Episode {n}"),
            air_date: Some("1997-08-13".to_string()),
            runtime_minutes: minutes,
        }
    }

    #[test]
    fn maps_four_titles_to_four_episodes_disc_one() {
        let titles = vec![title(0, 22), title(1, 22), title(2, 22), title(3, 22)];
        let episodes: Vec<TmdbEpisode> = (1..=4).map(|n| episode(n, 22)).collect();
        let (mapped, numbers) = EpisodeMapper::map(5, &titles, &episodes, 1);
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(mapped.len(), 4);
        assert_eq!(mapped[&0].season, 5);
    }

    #[test]
    fn offsets_by_disc_number() {
        let titles = vec![title(0, 22), title(1, 22)];
        let episodes: Vec<TmdbEpisode> = (1..=8).map(|n| episode(n, 22)).collect();
        let (_, numbers) = EpisodeMapper::map(5, &titles, &episodes, 3);
        assert_eq!(numbers, vec![5, 6]);
    }

    #[test]
    fn produces_no_duplicate_episode_numbers() {
        let titles = vec![title(0, 20), title(1, 20), title(2, 20)];
        let episodes: Vec<TmdbEpisode> = vec![episode(1, 20), episode(2, 20), episode(3, 20)];
        let (_, numbers) = EpisodeMapper::map(1, &titles, &episodes, 1);
        let unique: HashSet<i32> = numbers.iter().copied().collect();
        assert_eq!(unique.len(), numbers.len());
    }

    #[test]
    fn placeholders_deduplicate_by_title_hash() {
        let mut a = title(0, 22);
        a.segment_map = None;
        let mut b = title(1, 22);
        b.segment_map = None;

        let mut hashes = BTreeMap::new();
        hashes.insert(0, "samehash".to_string());
        hashes.insert(1, "samehash".to_string());

        let placeholders = EpisodeMapper::placeholders(5, &[a, b], &hashes);
        assert_eq!(placeholders.len(), 1);
        assert_eq!(placeholders[0].episode, 0);
    }
}
