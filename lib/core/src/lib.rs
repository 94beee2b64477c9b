//! # combinex Core
//!
//! Core library for combinex.
//!
//! This crate provides the data model and the percentile side of the engine:
//!
//! - [`StatField`] - The eight combine stats, their canonical order and metadata
//! - [`Position`] - Closed set of on-field positions
//! - [`PlayerRecord`] / [`QueryPlayer`] - Historical entries and ad-hoc query profiles
//! - [`ReferencePopulation`] - The immutable historical dataset
//! - [`PercentileIndex`] - Cached percentile ranks per stat and position
//! - [`StatVector`] - Stat vectors with cosine similarity
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use combinex_core::{PercentileIndex, PlayerRecord, Position, ReferencePopulation, StatField, StatLine};
//!
//! let records = [4.3, 4.4, 4.4, 4.5, 4.6]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &t)| {
//!         let mut stats = StatLine::default();
//!         stats[StatField::FortyYard] = Some(t);
//!         PlayerRecord::new(format!("wr{}", i), Position::Wr, stats)
//!     })
//!     .collect();
//! let population = Arc::new(ReferencePopulation::new(records).unwrap());
//!
//! let index = PercentileIndex::new(population);
//! let rank = index.percent_rank(StatField::FortyYard, Some(4.4), Some(Position::Wr)).unwrap();
//! assert_eq!(rank, 40.0);
//! ```

pub mod error;
pub mod percentile;
pub mod player;
pub mod population;
pub mod position;
pub mod stat;
pub mod vector;

pub use error::{Error, Result};
pub use percentile::{raw_percent_rank, CacheKey, PercentileIndex, Scope};
pub use player::{DraftInfo, PlayerRecord, QueryPlayer};
pub use population::ReferencePopulation;
pub use position::Position;
pub use stat::{parse_input, Directionality, StatField, StatLine, StatMeta, STAT_COUNT};
pub use vector::StatVector;
