//! Explainability for similar-player results
//!
//! Serializable response structures showing which stats drove each match.

use crate::engine::{SearchOutcome, SimilarPlayer};
use combinex_core::{QueryPlayer, StatField};
use serde::Serialize;

/// Response for a similar-players query
#[derive(Debug, Clone, Serialize)]
pub struct SimilarResponse {
    /// The profile that was searched for
    pub query: QueryPlayer,
    /// Matches, best first
    pub result: Vec<SimilarPlayer>,
    pub stats: SimilarityStats,
}

impl SimilarResponse {
    pub fn new(query: QueryPlayer, outcome: SearchOutcome) -> Self {
        let stats = SimilarityStats::compute(&outcome.results, outcome.candidates, outcome.skipped);
        Self {
            query,
            result: outcome.results,
            stats,
        }
    }
}

/// Summary statistics for a similarity query
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityStats {
    /// Number of candidates considered
    pub candidates_count: usize,
    /// Candidates at the position that had no stats
    pub skipped_count: usize,
    /// Number of results returned
    pub results_count: usize,
    /// Average score of results
    pub avg_score: f64,
    /// Score of best result
    pub best_score: f64,
    /// Field that contributed most to best result
    pub top_contributing_field: Option<StatField>,
}

impl SimilarityStats {
    /// Compute stats from ranked results
    pub fn compute(results: &[SimilarPlayer], candidates_count: usize, skipped_count: usize) -> Self {
        if results.is_empty() {
            return Self {
                candidates_count,
                skipped_count,
                results_count: 0,
                avg_score: 0.0,
                best_score: 0.0,
                top_contributing_field: None,
            };
        }

        let avg_score = results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64;
        let best_score = results[0].score; // Results are sorted

        let top_contributing_field = results[0]
            .explain
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(field, _)| field);

        Self {
            candidates_count,
            skipped_count,
            results_count: results.len(),
            avg_score,
            best_score,
            top_contributing_field,
        }
    }
}
