//! Similarity engine
//!
//! Ranks the historical players at a query's position by cosine similarity of
//! their raw stat vectors.

use combinex_core::{PlayerRecord, Position, QueryPlayer, ReferencePopulation, StatLine, StatVector};
use combinex_core::{Error, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Default number of similar players returned
pub const DEFAULT_LIMIT: usize = 10;

/// A historical player matched against a query
#[derive(Debug, Clone, Serialize)]
pub struct SimilarPlayer {
    /// The matched historical record
    pub record: PlayerRecord,
    /// Cosine similarity to the query
    pub score: f64,
    /// Per-field share of `score`; the values sum to it
    pub explain: StatLine<f64>,
}

/// Results of one search with candidate bookkeeping
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<SimilarPlayer>,
    /// Records at the position that were scored
    pub candidates: usize,
    /// Records at the position skipped for having no stats at all, or stats
    /// too large to compare
    pub skipped: usize,
}

/// Nearest-neighbour search over the reference population
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    population: Arc<ReferencePopulation>,
    limit: usize,
}

impl SimilarityEngine {
    pub fn new(population: Arc<ReferencePopulation>) -> Self {
        Self::with_limit(population, DEFAULT_LIMIT)
    }

    pub fn with_limit(population: Arc<ReferencePopulation>, limit: usize) -> Self {
        Self { population, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn population(&self) -> &Arc<ReferencePopulation> {
        &self.population
    }

    /// Most similar historical players at `query.position`, best first.
    ///
    /// Fails with [`Error::DegenerateInput`] if the query vector is all zeros and
    /// with [`Error::InvalidInput`] if a query stat is not finite or too large.
    /// An empty position yields an empty list.
    pub fn most_similar(&self, query: &QueryPlayer) -> Result<Vec<SimilarPlayer>> {
        Ok(self.search(query)?.results)
    }

    /// Like [`most_similar`](Self::most_similar), also reporting candidate counts
    pub fn search(&self, query: &QueryPlayer) -> Result<SearchOutcome> {
        if let Some((field, value)) = query.stats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "query player '{}' has non-finite {}: {}",
                query.name, field, value
            )));
        }

        let query_vector = StatVector::from_query(query);
        let query_norm = query_vector.norm();
        if !query_norm.is_finite() {
            return Err(Error::InvalidInput(format!(
                "stats of query player '{}' are too large to compare",
                query.name
            )));
        }
        if query_norm == 0.0 {
            return Err(Error::DegenerateInput(format!(
                "query player '{}' has no non-zero stats",
                query.name
            )));
        }

        let mut skipped = 0;
        let mut results = Vec::new();
        for record in self.population.at_position(query.position) {
            let candidate = StatVector::from_record(record);
            match query_vector.cosine_contributions(&candidate) {
                Ok(explain) => {
                    let score: f64 = explain.iter().map(|(_, v)| v).sum();
                    results.push(SimilarPlayer {
                        record: record.clone(),
                        score,
                        explain,
                    });
                }
                Err(Error::DegenerateInput(_)) => {
                    debug!(player = %record.name, "skipping record without stats");
                    skipped += 1;
                }
                Err(Error::InvalidInput(_)) => {
                    debug!(player = %record.name, "skipping record with overflowing stats");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let candidates = results.len();

        // Stable sort keeps dataset order among equal scores
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(self.limit);

        debug!(
            position = %query.position,
            candidates,
            skipped,
            returned = results.len(),
            "similarity search finished"
        );

        Ok(SearchOutcome {
            results,
            candidates,
            skipped,
        })
    }

    /// Number of historical records at a position
    pub fn candidates_at(&self, position: Position) -> usize {
        self.population.at_position(position).count()
    }
}
