use crate::percentile::Scope;
use crate::player::PlayerRecord;
use crate::position::Position;
use crate::stat::StatField;
use crate::{Error, Result};
use ahash::AHashMap;
use ordered_float::OrderedFloat;

/// The static historical dataset every query is measured against.
///
/// Built once at startup and shared read-only (usually behind an `Arc`) by the
/// percentile index and the similarity engine.
#[derive(Debug, Clone, Default)]
pub struct ReferencePopulation {
    records: Vec<PlayerRecord>,
    by_name: AHashMap<String, usize>,
}

impl ReferencePopulation {
    /// Validate and index a set of records. Every stat must be finite or absent.
    ///
    /// A recorded `0` means the drill was not run and is stored as absent.
    pub fn new(mut records: Vec<PlayerRecord>) -> Result<Self> {
        let mut by_name = AHashMap::with_capacity(records.len());

        for (idx, record) in records.iter_mut().enumerate() {
            for field in StatField::ALL {
                match record.stat(field) {
                    Some(v) if !v.is_finite() => {
                        return Err(Error::InvalidRecord(format!(
                            "{} has non-finite {}: {}",
                            record.name, field, v
                        )));
                    }
                    Some(v) if v == 0.0 => *record.stat_mut(field) = None,
                    _ => {}
                }
            }
            // First occurrence wins on duplicate names
            by_name.entry(record.name.to_lowercase()).or_insert(idx);
        }

        Ok(Self { records, by_name })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.records.iter()
    }

    /// Records at one position, in dataset order
    pub fn at_position(&self, position: Position) -> impl Iterator<Item = &PlayerRecord> {
        self.records.iter().filter(move |r| r.position == position)
    }

    /// Case-insensitive lookup by player name
    pub fn find(&self, name: &str) -> Option<&PlayerRecord> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.records[idx])
    }

    /// Ascending values of `field` among the records in `scope`, absent values skipped
    pub fn sorted_values(&self, field: StatField, scope: Scope) -> Vec<f64> {
        let mut values: Vec<f64> = self
            .records
            .iter()
            .filter(|r| scope.contains(r.position))
            .filter_map(|r| r.stat(field))
            .collect();
        values.sort_unstable_by_key(|v| OrderedFloat(*v));
        values
    }
}
