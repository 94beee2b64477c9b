//! # combinex Similarity
//!
//! Finds the historical players whose combine results most resemble a query
//! profile.
//!
//! ## Features
//!
//! - **Position scoped**: only players at the query's position are compared
//! - **Cosine similarity**: raw 8-dimensional stat vectors in canonical field order
//! - **Explainability**: per-field contribution breakdown for every match
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use combinex_core::{PlayerRecord, Position, QueryPlayer, ReferencePopulation, StatLine};
//! use combinex_similarity::SimilarityEngine;
//!
//! let stats = StatLine::new([73.0, 184.0, 4.29, 38.5, 17.0, 131.0, 6.74, 4.17].map(Some));
//! let population = ReferencePopulation::new(vec![PlayerRecord::new("Twin", Position::Wr, stats)]).unwrap();
//!
//! let engine = SimilarityEngine::new(Arc::new(population));
//! let results = engine.most_similar(&QueryPlayer::default()).unwrap();
//! assert_eq!(results[0].record.name, "Twin");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ QueryPlayer │────>│ StatVector  │────>│   Engine    │
//! │  (profile)  │     │  (8 stats)  │     │ (position)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                         ┌─────────────┐
//!                                         │  Explain    │
//!                                         │  (results)  │
//!                                         └─────────────┘
//! ```

pub mod engine;
pub mod explain;

pub use engine::{SearchOutcome, SimilarPlayer, SimilarityEngine, DEFAULT_LIMIT};
pub use explain::{SimilarResponse, SimilarityStats};
