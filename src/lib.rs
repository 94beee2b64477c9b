//! # combinex
//!
//! Percentile ranking and similar-player search over historical NFL combine
//! results.
//!
//! Given a prospect's eight combine measurements and position, combinex reports
//! where each measurement falls among historical players (overall and at the
//! position) and which historical players at the same position have the most
//! similar overall profile.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! combinex ingest raw_combine.json
//! combinex rank fortyYard 4.41 --position WR
//! combinex similar --position WR --forty-yard 4.41 --height 74
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use combinex::prelude::*;
//!
//! let engine = CombineEngine::open("./data", EngineConfig::default()).unwrap();
//!
//! let rank = engine.percent_rank(StatField::FortyYard, Some(4.41), Some(Position::Wr)).unwrap();
//! println!("{:.0}th percentile", rank);
//!
//! let query = engine.default_player().with_stat(StatField::FortyYard, 4.41);
//! for player in engine.most_similar_players(&query).unwrap() {
//!     println!("{} {:.4}", player.record.name, player.score);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `combinex-core` - Stat model, positions, reference population, percentile index
//! - `combinex-similarity` - Position-scoped cosine similarity search
//! - `combinex-storage` - Dataset loading, raw ingest, percentile snapshots

pub mod engine;

pub use engine::{CombineEngine, EngineConfig, PercentileProfile, StatPercentile};

// Re-export core types
pub use combinex_core::{
    CacheKey, DraftInfo, Error, PercentileIndex, PlayerRecord, Position, QueryPlayer,
    ReferencePopulation, Result, Scope, StatField, StatLine,
};
pub use combinex_core::parse_input;

// Re-export similarity
pub use combinex_similarity::{SimilarPlayer, SimilarResponse, SimilarityStats};

// Re-export storage
pub use combinex_storage::{ingest_into, IngestReport, StorageManager};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CombineEngine, EngineConfig, PercentileProfile,
        PlayerRecord, Position, QueryPlayer, StatField, StatLine,
        SimilarPlayer, SimilarResponse,
        Error, Result,
    };
}
