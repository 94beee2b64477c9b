use crate::ingest::{ingest_raw, IngestReport};
use crate::loader::{dataset_to_json, load_dataset};
use crate::snapshot::PercentileSnapshot;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use combinex_core::{Error, PercentileIndex, PlayerRecord, ReferencePopulation, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const DATASET_FILE: &str = "data.json";
pub const SNAPSHOT_FILE: &str = "percentiles.json";
pub const SNAPSHOT_GZ_FILE: &str = "percentiles.json.gz";

/// Owns the data directory: the processed dataset and its percentile snapshot
pub struct StorageManager {
    data_dir: PathBuf,
    population: Arc<ReferencePopulation>,
    dataset_sha256: String,
}

impl StorageManager {
    /// Load `data.json` from `data_dir`
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        let dataset_path = data_dir.join(DATASET_FILE);

        let dataset = load_dataset(&dataset_path).map_err(|e| Error::Storage(format!("{:#}", e)))?;
        let population = ReferencePopulation::new(dataset.records)?;
        info!(
            path = ?dataset_path,
            records = population.len(),
            sha256 = %dataset.sha256,
            "combine dataset loaded"
        );

        Ok(Self {
            data_dir,
            population: Arc::new(population),
            dataset_sha256: dataset.sha256,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn population(&self) -> Arc<ReferencePopulation> {
        self.population.clone()
    }

    pub fn dataset_sha256(&self) -> &str {
        &self.dataset_sha256
    }

    /// The snapshot file present in the data directory, gzip preferred
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        [SNAPSHOT_GZ_FILE, SNAPSHOT_FILE]
            .iter()
            .map(|name| self.data_dir.join(name))
            .find(|path| path.exists())
    }

    /// Seed `index` from the data directory's snapshot, if there is one.
    ///
    /// Returns the number of keys seeded, or `None` without a snapshot file.
    pub fn load_snapshot_into(&self, index: &PercentileIndex) -> Result<Option<usize>> {
        let Some(path) = self.snapshot_path() else {
            return Ok(None);
        };

        let snapshot = PercentileSnapshot::read(&path).map_err(|e| Error::Storage(format!("{:#}", e)))?;
        let seeded = snapshot.apply(index, &self.dataset_sha256)?;
        info!(path = ?path, seeded, "percentile snapshot loaded");
        Ok(Some(seeded))
    }

    /// Write every reference cached by `index` to the data directory
    pub fn save_snapshot(&self, index: &PercentileIndex, gzip: bool) -> Result<PathBuf> {
        let path = self
            .data_dir
            .join(if gzip { SNAPSHOT_GZ_FILE } else { SNAPSHOT_FILE });
        PercentileSnapshot::from_index(index, self.dataset_sha256.clone())
            .write(&path)
            .map_err(|e| Error::Storage(format!("{:#}", e)))?;
        Ok(path)
    }
}

/// Convert a raw export into `data.json` inside `data_dir`
pub fn ingest_into<P: AsRef<Path>, Q: AsRef<Path>>(raw_path: P, data_dir: Q) -> Result<IngestReport> {
    let raw_path = raw_path.as_ref();
    let data_dir = data_dir.as_ref();

    let bytes = std::fs::read(raw_path)?;
    let report = ingest_raw(&bytes).map_err(|e| Error::Serialization(format!("{:#}", e)))?;
    write_dataset(data_dir, &report.records)?;
    Ok(report)
}

/// Atomically write records as the data directory's `data.json`
pub fn write_dataset<P: AsRef<Path>>(data_dir: P, records: &[PlayerRecord]) -> Result<PathBuf> {
    let data_dir = data_dir.as_ref();
    std::fs::create_dir_all(data_dir)?;

    let path = data_dir.join(DATASET_FILE);
    let json = dataset_to_json(records).map_err(|e| Error::Serialization(e.to_string()))?;
    AtomicFile::new(&path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(&json))
        .map_err(|e| Error::Storage(format!("writing {:?}: {}", path, e)))?;

    info!(path = ?path, records = records.len(), "combine dataset written");
    Ok(path)
}
