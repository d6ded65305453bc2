//! Domain Services - Stateless services containing business logic.

pub mod confidence_scorer;
pub mod episode_mapper;
pub mod label_classifier;
pub mod title_hints;

pub use confidence_scorer::{score, Candidate, ConfidenceScorer, ScoredCandidate};
pub use episode_mapper::{EpisodeMapper, MappedEpisode, TmdbEpisode};
pub use label_classifier::LabelClassifier;
pub use title_hints::TitleHints;
