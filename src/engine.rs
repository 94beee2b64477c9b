//! Query facade
//!
//! [`CombineEngine`] is the only interface the presentation layer needs: it
//! owns the reference population and answers percentile and similar-player
//! queries against it.

use combinex_core::{
    Error, PercentileIndex, PlayerRecord, Position, QueryPlayer, ReferencePopulation, Result,
    StatField, StatLine,
};
use combinex_similarity::{SimilarPlayer, SimilarResponse, SimilarityEngine, DEFAULT_LIMIT};
use combinex_storage::StorageManager;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for an engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of similar players returned
    pub similar_limit: usize,
    /// Build every percentile reference at startup instead of on first use
    pub precompute: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similar_limit: DEFAULT_LIMIT,
            precompute: false,
        }
    }
}

/// Percentiles of one stat of a historical player
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatPercentile {
    pub raw: Option<f64>,
    /// Against every position
    pub percentile: f64,
    /// Against the player's own position
    pub position_percentile: f64,
}

impl Default for StatPercentile {
    fn default() -> Self {
        Self {
            raw: None,
            percentile: 0.0,
            position_percentile: 0.0,
        }
    }
}

/// Every stat of a historical player with its global and positional percentile
#[derive(Debug, Clone, Serialize)]
pub struct PercentileProfile {
    pub player: String,
    pub position: Position,
    pub stats: StatLine<StatPercentile>,
}

/// Percentile ranking and similar-player search over one reference population
pub struct CombineEngine {
    population: Arc<ReferencePopulation>,
    percentiles: PercentileIndex,
    similarity: SimilarityEngine,
}

impl CombineEngine {
    pub fn new(population: Arc<ReferencePopulation>, config: EngineConfig) -> Self {
        let engine = Self::unwarmed(population, &config);
        if config.precompute {
            engine.percentiles.precompute();
        }
        engine
    }

    fn unwarmed(population: Arc<ReferencePopulation>, config: &EngineConfig) -> Self {
        Self {
            percentiles: PercentileIndex::new(population.clone()),
            similarity: SimilarityEngine::with_limit(population.clone(), config.similar_limit),
            population,
        }
    }

    pub fn from_records(records: Vec<PlayerRecord>, config: EngineConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(ReferencePopulation::new(records)?), config))
    }

    /// Load the dataset in `data_dir`, seeding percentiles from its snapshot when
    /// the snapshot matches the dataset. A stale or unreadable snapshot is
    /// skipped with a warning.
    pub fn open<P: AsRef<Path>>(data_dir: P, config: EngineConfig) -> Result<Self> {
        let storage = StorageManager::open(data_dir)?;
        let engine = Self::unwarmed(storage.population(), &config);

        // The snapshot only warms the cache; any key it fails to seed is built lazily
        match storage.load_snapshot_into(&engine.percentiles) {
            Ok(_) => {}
            Err(Error::SnapshotMismatch { expected, actual }) => {
                warn!(%expected, %actual, "ignoring percentile snapshot built from another dataset");
            }
            Err(e) => {
                warn!(error = %e, "ignoring unreadable percentile snapshot");
            }
        }

        if config.precompute {
            engine.percentiles.precompute();
        }

        info!(
            records = engine.population.len(),
            cached = engine.percentiles.cached_keys(),
            "engine ready"
        );
        Ok(engine)
    }

    pub fn population(&self) -> &Arc<ReferencePopulation> {
        &self.population
    }

    pub fn percentiles(&self) -> &PercentileIndex {
        &self.percentiles
    }

    /// Percentile (0 to 100, higher is better) of `value` for `field`,
    /// against `position` when given or the whole population otherwise.
    ///
    /// An absent value ranks 0.
    pub fn percent_rank(
        &self,
        field: StatField,
        value: Option<f64>,
        position: Option<Position>,
    ) -> Result<f64> {
        self.percentiles.percent_rank(field, value, position)
    }

    /// Up to the configured limit of historical players at the query's
    /// position, most similar first
    pub fn most_similar_players(&self, query: &QueryPlayer) -> Result<Vec<SimilarPlayer>> {
        self.similarity.most_similar(query)
    }

    /// Similar players with per-field explanations and summary stats
    pub fn similar_response(&self, query: &QueryPlayer) -> Result<SimilarResponse> {
        let outcome = self.similarity.search(query)?;
        Ok(SimilarResponse::new(query.clone(), outcome))
    }

    /// Position-scoped percentile of each stat, in canonical order.
    ///
    /// A stat with no reference data at the position is `None`.
    pub fn radar(&self, query: &QueryPlayer) -> Result<StatLine<Option<f64>>> {
        let mut radar = StatLine::default();
        for (field, value) in query.stats.iter() {
            radar[field] = match self.percent_rank(field, Some(*value), Some(query.position)) {
                Ok(rank) => Some(rank),
                Err(Error::DataIntegrity { .. }) => None,
                Err(e) => return Err(e),
            };
        }
        Ok(radar)
    }

    /// Global and positional percentile of every stat of a historical player
    pub fn percentile_profile(&self, record: &PlayerRecord) -> Result<PercentileProfile> {
        let mut stats = StatLine::default();
        for (field, value) in record.stats().iter() {
            stats[field] = StatPercentile {
                raw: *value,
                percentile: self.percent_rank(field, *value, None)?,
                position_percentile: self.percent_rank(field, *value, Some(record.position))?,
            };
        }
        Ok(PercentileProfile {
            player: record.name.clone(),
            position: record.position,
            stats,
        })
    }

    /// Case-insensitive lookup of a historical player
    pub fn find_player(&self, name: &str) -> Result<&PlayerRecord> {
        self.population
            .find(name)
            .ok_or_else(|| Error::PlayerNotFound(name.to_string()))
    }

    /// The profile shown before any input: a WR at every field's default
    pub fn default_player(&self) -> QueryPlayer {
        QueryPlayer::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CombineEngine {
        let mut records: Vec<PlayerRecord> = [4.3, 4.4, 4.4, 4.5, 4.6]
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                let mut stats = StatLine::default();
                stats[StatField::FortyYard] = Some(t);
                stats[StatField::Height] = Some(70.0 + i as f64);
                PlayerRecord::new(format!("WR {}", i), Position::Wr, stats)
            })
            .collect();
        let mut qb = StatLine::default();
        qb[StatField::FortyYard] = Some(4.9);
        qb[StatField::Height] = Some(76.0);
        records.push(PlayerRecord::new("QB", Position::Qb, qb));
        CombineEngine::from_records(records, EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_percent_rank_delegates() {
        let engine = engine();
        assert_eq!(
            engine.percent_rank(StatField::FortyYard, Some(4.4), Some(Position::Wr)).unwrap(),
            40.0
        );
        assert_eq!(engine.percent_rank(StatField::Height, None, None).unwrap(), 0.0);
    }

    #[test]
    fn test_radar_marks_missing_references() {
        let engine = engine();
        let radar = engine.radar(&engine.default_player()).unwrap();
        assert!(radar[StatField::FortyYard].is_some());
        assert!(radar[StatField::Height].is_some());
        assert_eq!(radar[StatField::BenchReps], None);
    }

    #[test]
    fn test_percentile_profile() {
        let engine = engine();
        let qb = engine.find_player("qb").unwrap().clone();
        let profile = engine.percentile_profile(&qb).unwrap();
        assert_eq!(profile.position, Position::Qb);

        let forty = profile.stats[StatField::FortyYard];
        assert_eq!(forty.raw, Some(4.9));
        // Slowest overall, and the only QB
        assert_eq!(forty.percentile, 0.0);
        assert_eq!(forty.position_percentile, 0.0);

        let height = profile.stats[StatField::Height];
        assert_eq!(height.percentile, 100.0);
        assert_eq!(profile.stats[StatField::Weight], StatPercentile::default());
    }

    #[test]
    fn test_open_skips_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let records = engine().population().records().to_vec();
        combinex_storage::write_dataset(dir.path(), &records).unwrap();
        std::fs::write(dir.path().join("percentiles.json"), b"not a snapshot").unwrap();

        let engine = CombineEngine::open(dir.path(), EngineConfig::default()).unwrap();
        assert_eq!(engine.percentiles().cached_keys(), 0);
        assert_eq!(
            engine.percent_rank(StatField::FortyYard, Some(4.4), Some(Position::Wr)).unwrap(),
            40.0
        );
    }

    #[test]
    fn test_find_player_not_found() {
        let engine = engine();
        assert!(matches!(engine.find_player("nobody"), Err(Error::PlayerNotFound(_))));
    }

    #[test]
    fn test_precompute_config() {
        let population = engine().population().clone();
        let config = EngineConfig {
            precompute: true,
            ..EngineConfig::default()
        };
        let engine = CombineEngine::new(population, config);
        let built = engine.percentiles().builds();
        assert_eq!(built, 8 + 8 * Position::ALL.len());
        engine.percent_rank(StatField::Height, Some(72.0), Some(Position::Wr)).unwrap();
        assert_eq!(engine.percentiles().builds(), built);
    }

    #[test]
    fn test_similar_limit_config() {
        let population = engine().population().clone();
        let config = EngineConfig {
            similar_limit: 2,
            ..EngineConfig::default()
        };
        let engine = CombineEngine::new(population, config);
        let results = engine.most_similar_players(&engine.default_player()).unwrap();
        assert_eq!(results.len(), 2);
        let response = engine.similar_response(&engine.default_player()).unwrap();
        assert_eq!(response.stats.candidates_count, 5);
    }
}
