//! Ranks TMDB candidates against a query; accept/reject with an exact-match
//! special case (§4.8).

use tracing::info;

/// A TMDB search/candidate result, reduced to the fields the scorer needs.
/// Infrastructure adapters convert their wire DTOs into this shape.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub tmdb_id: i64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub vote_average: f64,
    pub vote_count: i64,
}

impl Candidate {
    /// Title preferred for comparison: `title` field, else `name`, else empty (§4.8).
    pub fn comparison_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
    pub is_exact_match: bool,
}

/// `score(query, result) = contains-bonus + voteAverage/10 + voteCount/1000` (§4.8).
pub fn score(query: &str, candidate: &Candidate) -> f64 {
    let title_lower = candidate.comparison_title().to_lowercase();
    let query_lower = query.to_lowercase();
    let contains_bonus = if title_lower.contains(&query_lower) { 1.0 } else { 0.0 };
    contains_bonus + candidate.vote_average / 10.0 + candidate.vote_count as f64 / 1000.0
}

/// Normalizes for exact-match comparison: lowercase, `&`/`+` → "and", keep
/// only letters and digits (§4.8).
fn normalize(s: &str) -> String {
    let lower = s.to_lowercase().replace('&', "and").replace('+', "and");
    lower.chars().filter(|c| c.is_alphanumeric()).collect()
}

fn is_exact_match(query: &str, candidate: &Candidate) -> bool {
    let title = candidate.comparison_title();
    if title.to_lowercase() == query.to_lowercase() {
        return true;
    }
    normalize(title) == normalize(query)
}

pub struct ConfidenceScorer {
    /// Confidence gate for exact matches; 0 disables (§6 `validation.min_vote_count_exact_match`).
    pub min_vote_count_exact_match: i32,
}

impl ConfidenceScorer {
    pub fn new(min_vote_count_exact_match: i32) -> Self {
        Self { min_vote_count_exact_match }
    }

    /// Picks the best candidate and applies the accept/reject gates (§4.8).
    ///
    /// Candidates are considered in score order (ties broken by higher vote
    /// count); the first candidate whose exact/non-exact gate passes is
    /// accepted. Returns `None` when no candidate clears its gate.
    pub fn accept<'a>(&self, query: &str, candidates: &'a [Candidate]) -> Option<&'a Candidate> {
        if candidates.is_empty() {
            self.log_decision("reject", "empty result set", &[]);
            return None;
        }

        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|c| ScoredCandidate {
                candidate: c.clone(),
                score: score(query, c),
                is_exact_match: is_exact_match(query, c),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.candidate.vote_count.cmp(&a.candidate.vote_count))
        });

        let top3: Vec<String> = scored
            .iter()
            .take(3)
            .map(|s| format!("{} (score={:.3})", s.candidate.comparison_title(), s.score))
            .collect();

        for candidate in &scored {
            let (accepted, reason) = self.gate(candidate);
            if accepted {
                self.log_decision("accept", &reason, &top3);
                return candidates.iter().find(|c| c.tmdb_id == candidate.candidate.tmdb_id);
            }
        }

        self.log_decision("reject", "no candidate cleared its accept gate", &top3);
        None
    }

    fn gate(&self, candidate: &ScoredCandidate) -> (bool, String) {
        if candidate.is_exact_match {
            if candidate.candidate.vote_average < 2.0 {
                (false, "exact match vote_average below 2.0".to_string())
            } else if self.min_vote_count_exact_match > 0
                && (candidate.candidate.vote_count as i32) < self.min_vote_count_exact_match
            {
                (false, format!(
                    "exact match vote_count {} below configured minimum {}",
                    candidate.candidate.vote_count, self.min_vote_count_exact_match
                ))
            } else {
                (true, "exact match accepted".to_string())
            }
        } else if candidate.candidate.vote_average < 3.0 {
            (false, "non-exact match vote_average below 3.0".to_string())
        } else {
            let min_expected = 1.3 + candidate.candidate.vote_count as f64 / 1000.0;
            if candidate.score < min_expected {
                (false, format!("non-exact score {:.3} below expected minimum {:.3}", candidate.score, min_expected))
            } else {
                (true, "non-exact match accepted".to_string())
            }
        }
    }

    fn log_decision(&self, decision_result: &str, decision_reason: &str, top3: &[String]) {
        info!(
            decision_type = "tmdb_confidence",
            decision_result,
            decision_reason,
            top_candidates = ?top3,
            "confidence scorer decision"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, title: &str, vote_average: f64, vote_count: i64) -> Candidate {
        Candidate {
            tmdb_id: id,
            title: Some(title.to_string()),
            name: None,
            vote_average,
            vote_count,
        }
    }

    #[test]
    fn never_accepts_exact_match_under_vote_average_two() {
        let scorer = ConfidenceScorer::new(0);
        let candidates = vec![candidate(1, "Demo Disc", 1.9, 5000)];
        assert!(scorer.accept("Demo Disc", &candidates).is_none());
    }

    #[test]
    fn accepts_clean_exact_match() {
        let scorer = ConfidenceScorer::new(0);
        let candidates = vec![candidate(1, "Demo Disc", 8.5, 200)];
        let accepted = scorer.accept("Demo Disc", &candidates).unwrap();
        assert_eq!(accepted.tmdb_id, 1);
    }

    #[test]
    fn exact_match_low_vote_count_gate() {
        let scorer = ConfidenceScorer::new(5);
        let candidates = vec![
            candidate(1, "The Wolverine", 6.5, 3),
            candidate(2, "Logan", 7.5, 1500),
        ];
        // Logan scores higher (contains bonus only if query contains name; query is "The Wolverine")
        assert!(scorer.accept("The Wolverine", &candidates).is_none());

        let scorer_open = ConfidenceScorer::new(0);
        let accepted = scorer_open.accept("The Wolverine", &candidates);
        assert_eq!(accepted.unwrap().tmdb_id, 1);
    }

    #[test]
    fn rejects_low_score_non_exact_match() {
        let scorer = ConfidenceScorer::new(0);
        let candidates = vec![candidate(1, "Something Unrelated", 3.5, 10)];
        assert!(scorer.accept("Demo Disc", &candidates).is_none());
    }

    #[test]
    fn ties_broken_by_vote_count() {
        let candidates = vec![
            candidate(1, "Demo Disc", 5.0, 100),
            candidate(2, "Demo Disc", 5.0, 500),
        ];
        let scorer = ConfidenceScorer::new(0);
        let accepted = scorer.accept("Demo Disc", &candidates).unwrap();
        assert_eq!(accepted.tmdb_id, 2);
    }
}
