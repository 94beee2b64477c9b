// Processed dataset loading
use anyhow::{Context, Result};
use combinex_core::PlayerRecord;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// A loaded dataset together with the checksum of its source bytes
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub records: Vec<PlayerRecord>,
    pub sha256: String,
}

/// Hex SHA-256 of a dataset file's bytes
pub fn dataset_checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Parse a processed dataset (JSON array of player rows)
pub fn parse_dataset(bytes: &[u8]) -> Result<LoadedDataset> {
    let records: Vec<PlayerRecord> =
        serde_json::from_slice(bytes).context("malformed combine dataset")?;
    Ok(LoadedDataset {
        records,
        sha256: dataset_checksum(bytes),
    })
}

pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<LoadedDataset> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading dataset {:?}", path))?;
    parse_dataset(&bytes)
}

/// Serialize records in the processed dataset format
pub fn dataset_to_json(records: &[PlayerRecord]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(records)?)
}
