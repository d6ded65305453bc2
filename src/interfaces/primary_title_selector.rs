//! Primary-title selection shared between the Identifier and the Ripping
//! stage. Routed through a small interface to avoid an import cycle between
//! the two stages (§9).

use crate::domain::entities::Title;

pub trait PrimaryTitleSelector: Send + Sync {
    /// Picks the title to treat as the disc's primary content, if any.
    fn select<'a>(&self, titles: &'a [Title]) -> Option<&'a Title>;
}

/// Longest-duration title wins; ties keep the lowest id.
#[derive(Debug, Default, Clone, Copy)]
pub struct LongestTitleSelector;

impl PrimaryTitleSelector for LongestTitleSelector {
    fn select<'a>(&self, titles: &'a [Title]) -> Option<&'a Title> {
        titles
            .iter()
            .max_by(|a, b| {
                a.duration_seconds
                    .cmp(&b.duration_seconds)
                    .then(b.id.cmp(&a.id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_longest_duration() {
        let mut a = Title::new(0);
        a.duration_seconds = 1000;
        let mut b = Title::new(1);
        b.duration_seconds = 7000;
        let selector = LongestTitleSelector;
        let picked = selector.select(&[a, b]).unwrap();
        assert_eq!(picked.id, 1);
    }
}
