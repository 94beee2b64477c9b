// Integration tests for combinex
use combinex::prelude::*;
use combinex::{ingest_into, StorageManager};
use combinex_storage::write_dataset;
use std::path::Path;

fn record(name: &str, position: Position, values: [f64; 8]) -> PlayerRecord {
    PlayerRecord::new(name, position, StatLine::new(values.map(Some)))
}

fn dataset() -> Vec<PlayerRecord> {
    vec![
        record("Speedy", Position::Wr, [72.0, 180.0, 4.30, 40.0, 12.0, 130.0, 6.70, 4.10]),
        record("Average", Position::Wr, [73.0, 190.0, 4.45, 36.0, 15.0, 124.0, 6.90, 4.20]),
        record("Big Target", Position::Wr, [77.0, 225.0, 4.55, 35.0, 18.0, 122.0, 7.00, 4.30]),
        record("Slot", Position::Wr, [69.0, 175.0, 4.40, 38.0, 10.0, 126.0, 6.60, 4.00]),
        record("Lineman", Position::Ot, [78.0, 315.0, 5.20, 28.0, 26.0, 104.0, 7.80, 4.75]),
        record("Guard", Position::Og, [76.0, 320.0, 5.30, 27.0, 30.0, 100.0, 7.90, 4.80]),
        record("Back", Position::Rb, [70.0, 215.0, 4.45, 37.0, 20.0, 123.0, 7.00, 4.25]),
    ]
}

fn open(dir: &Path) -> CombineEngine {
    write_dataset(dir, &dataset()).unwrap();
    CombineEngine::open(dir, EngineConfig::default()).unwrap()
}

#[test]
fn test_percentiles_in_range_and_monotonic() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());

    for field in StatField::ALL {
        for position in [None, Some(Position::Wr)] {
            let mut last_raw_rank: Option<f64> = None;
            for step in 0..=60 {
                let value = field.default_value() * (0.5 + step as f64 / 40.0);
                let rank = engine.percent_rank(field, Some(value), position).unwrap();
                assert!((0.0..=100.0).contains(&rank), "{} {} -> {}", field, value, rank);

                // Ascending values rank monotonically in the field's own direction
                if let Some(last) = last_raw_rank {
                    match field.meta().directionality {
                        combinex_core::Directionality::HigherIsBetter => assert!(rank >= last),
                        combinex_core::Directionality::LowerIsBetter => assert!(rank <= last),
                    }
                }
                last_raw_rank = Some(rank);
            }
        }
    }
}

#[test]
fn test_faster_time_ranks_higher() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());

    let fast = engine.percent_rank(StatField::FortyYard, Some(4.30), Some(Position::Wr)).unwrap();
    let slow = engine.percent_rank(StatField::FortyYard, Some(4.55), Some(Position::Wr)).unwrap();
    assert!(fast > slow);

    let best = engine.percent_rank(StatField::FortyYard, Some(4.20), Some(Position::Wr)).unwrap();
    assert_eq!(best, 100.0);
    assert_eq!(slow, 0.0);
}

#[test]
fn test_position_scope_differs_from_global() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());

    let global = engine.percent_rank(StatField::Weight, Some(225.0), None).unwrap();
    let at_wr = engine.percent_rank(StatField::Weight, Some(225.0), Some(Position::Wr)).unwrap();
    assert_eq!(at_wr, 100.0);
    assert!(global < at_wr);
}

#[test]
fn test_missing_value_and_missing_reference() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());

    assert_eq!(engine.percent_rank(StatField::BenchReps, None, None).unwrap(), 0.0);
    assert!(matches!(
        engine.percent_rank(StatField::BenchReps, Some(20.0), Some(Position::K)),
        Err(Error::DataIntegrity { .. })
    ));
}

#[test]
fn test_similar_players_scoped_and_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());

    let query = QueryPlayer::from_record(engine.find_player("speedy").unwrap());
    let results = engine.most_similar_players(&query).unwrap();

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|p| p.record.position == Position::Wr));
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));

    // Identical profile is a perfect match
    assert_eq!(results[0].record.name, "Speedy");
    assert!((results[0].score - 1.0).abs() < 1e-12);

    for player in &results {
        let total: f64 = player.explain.iter().map(|(_, c)| c).sum();
        assert!((total - player.score).abs() < 1e-9);
    }
}

#[test]
fn test_similar_limit_and_empty_position() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), &dataset()).unwrap();
    let config = EngineConfig {
        similar_limit: 2,
        ..EngineConfig::default()
    };
    let engine = CombineEngine::open(dir.path(), config).unwrap();

    let results = engine.most_similar_players(&engine.default_player()).unwrap();
    assert_eq!(results.len(), 2);

    let kicker = engine.default_player().with_position(Position::K);
    assert!(engine.most_similar_players(&kicker).unwrap().is_empty());
}

#[test]
fn test_zero_query_is_degenerate() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());

    let zero = QueryPlayer::new("Nobody", Position::Wr, StatLine::new([0.0; 8]));
    assert!(matches!(
        engine.most_similar_players(&zero),
        Err(Error::DegenerateInput(_))
    ));
}

#[test]
fn test_non_finite_query_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());

    for bad in [f64::NAN, f64::INFINITY, 1e200] {
        let query = engine.default_player().with_stat(StatField::Weight, bad);
        assert!(matches!(
            engine.similar_response(&query),
            Err(Error::InvalidInput(_))
        ));
    }
}

#[test]
fn test_snapshot_warm_start() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), &dataset()).unwrap();

    let storage = StorageManager::open(dir.path()).unwrap();
    let config = EngineConfig {
        precompute: true,
        ..EngineConfig::default()
    };
    let warm = CombineEngine::new(storage.population(), config);
    storage.save_snapshot(warm.percentiles(), true).unwrap();

    let engine = CombineEngine::open(dir.path(), EngineConfig::default()).unwrap();
    let rank = engine.percent_rank(StatField::FortyYard, Some(4.45), Some(Position::Wr)).unwrap();
    assert_eq!(
        rank,
        warm.percent_rank(StatField::FortyYard, Some(4.45), Some(Position::Wr)).unwrap()
    );
    assert_eq!(engine.percentiles().builds(), 0);
}

#[test]
fn test_stale_snapshot_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), &dataset()).unwrap();
    let storage = StorageManager::open(dir.path()).unwrap();
    let config = EngineConfig {
        precompute: true,
        ..EngineConfig::default()
    };
    let warm = CombineEngine::new(storage.population(), config);
    storage.save_snapshot(warm.percentiles(), false).unwrap();

    write_dataset(dir.path(), &dataset()[..4]).unwrap();
    let engine = CombineEngine::open(dir.path(), EngineConfig::default()).unwrap();
    assert_eq!(engine.percentiles().cached_keys(), 0);
    assert_eq!(
        engine.percent_rank(StatField::Height, Some(77.0), None).unwrap(),
        100.0
    );
}

#[test]
fn test_ingest_then_profile() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw.json");
    std::fs::write(
        &raw,
        r#"[
            {"Player": "Quick", "Pos": "CB", "Ht": "5-10", "Wt": 190, "Forty": 4.35, "Year": 2019},
            {"Player": "Steady", "Pos": "CB", "Ht": "6-0", "Wt": 200, "Forty": 4.50, "Year": 2019},
            {"Player": "Lost", "Pos": "XX", "Ht": "6-0"}
        ]"#,
    )
    .unwrap();

    let data_dir = dir.path().join("data");
    let report = ingest_into(&raw, &data_dir).unwrap();
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.skipped, 1);

    let engine = CombineEngine::open(&data_dir, EngineConfig::default()).unwrap();
    let quick = engine.find_player("QUICK").unwrap();
    assert_eq!(quick.draft.year, Some(2019));

    let profile = engine.percentile_profile(quick).unwrap();
    let forty = profile.stats[StatField::FortyYard];
    assert_eq!(forty.raw, Some(4.35));
    assert_eq!(forty.position_percentile, 50.0);
    assert_eq!(profile.stats[StatField::BenchReps].raw, None);
    assert_eq!(profile.stats[StatField::BenchReps].percentile, 0.0);
}

#[test]
fn test_default_player_and_input_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());

    let default = engine.default_player();
    assert_eq!(default.position, Position::Wr);
    assert_eq!(default.stats[StatField::FortyYard], 4.29);

    assert_eq!(StatField::FortyYard.parse_value("4.417").unwrap(), 4.42);
    assert!(matches!(StatField::Height.parse_value("tall"), Err(Error::InvalidInput(_))));
    assert!(matches!(engine.find_player("Nobody"), Err(Error::PlayerNotFound(_))));
}
