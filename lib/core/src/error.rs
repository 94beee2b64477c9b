use crate::percentile::Scope;
use crate::stat::StatField;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No reference values for {field} ({scope})")]
    DataIntegrity { field: StatField, scope: Scope },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Unknown position: {0}")]
    UnknownPosition(String),

    #[error("Unknown stat field: {0}")]
    UnknownField(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Snapshot does not match dataset: expected {expected}, got {actual}")]
    SnapshotMismatch { expected: String, actual: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
