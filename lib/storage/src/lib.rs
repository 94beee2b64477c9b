pub mod ingest;
pub mod loader;
pub mod manager;
pub mod snapshot;

pub use ingest::{ingest_raw, IngestReport};
pub use loader::{dataset_checksum, load_dataset, parse_dataset, LoadedDataset};
pub use manager::{ingest_into, write_dataset, StorageManager};
pub use snapshot::PercentileSnapshot;
