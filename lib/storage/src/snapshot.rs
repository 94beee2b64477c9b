// Percentile snapshot files: sorted reference arrays persisted next to the dataset
use anyhow::{anyhow, Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{DateTime, Utc};
use combinex_core::{CacheKey, Error, PercentileIndex};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::Path;
use tracing::info;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted percentile references, keyed `field.SCOPE` (e.g. `fortyYard.WR`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentileSnapshot {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    /// Checksum of the dataset the references were built from
    pub dataset_sha256: String,
    pub entries: BTreeMap<String, Vec<f64>>,
}

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

impl PercentileSnapshot {
    /// Capture every reference array currently cached by `index`
    pub fn from_index(index: &PercentileIndex, dataset_sha256: impl Into<String>) -> Self {
        let entries = index
            .snapshot()
            .into_iter()
            .map(|(key, values)| (key.to_string(), values.to_vec()))
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            created_at: Utc::now(),
            dataset_sha256: dataset_sha256.into(),
            entries,
        }
    }

    /// Write atomically; a `.gz` extension selects gzip compression
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json_data = serde_json::to_vec(self)?;
        let gzip = is_gzip(path);

        let file = AtomicFile::new(path, OverwriteBehavior::AllowOverwrite);
        file.write(|f| {
            if gzip {
                let mut encoder = GzEncoder::new(f, Compression::default());
                encoder.write_all(&json_data)?;
                encoder.finish()?;
                Ok(())
            } else {
                f.write_all(&json_data)
            }
        })
        .with_context(|| format!("writing percentile snapshot {:?}", path))?;

        info!(path = ?path, entries = self.entries.len(), "percentile snapshot written");
        Ok(())
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow!("Snapshot {:?} not found", path));
        }

        let json_data = if is_gzip(path) {
            let file = File::open(path)?;
            let mut decoder = GzDecoder::new(BufReader::new(file));
            let mut data = Vec::new();
            decoder.read_to_end(&mut data)?;
            data
        } else {
            fs::read(path)?
        };

        let snapshot: PercentileSnapshot =
            serde_json::from_slice(&json_data).with_context(|| format!("parsing snapshot {:?}", path))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(anyhow!(
                "Unsupported snapshot version {} in {:?}",
                snapshot.version,
                path
            ));
        }
        Ok(snapshot)
    }

    /// Seed `index` with these references. Returns how many keys were installed.
    ///
    /// The snapshot must have been built from the dataset with checksum `dataset_sha256`.
    pub fn apply(&self, index: &PercentileIndex, dataset_sha256: &str) -> combinex_core::Result<usize> {
        if self.dataset_sha256 != dataset_sha256 {
            return Err(Error::SnapshotMismatch {
                expected: dataset_sha256.to_string(),
                actual: self.dataset_sha256.clone(),
            });
        }

        let mut seeded = 0;
        for (key, values) in &self.entries {
            let key: CacheKey = key.parse()?;
            if index.seed(key, values.clone())? {
                seeded += 1;
            }
        }
        Ok(seeded)
    }
}
