//! Percentile index
//!
//! Answers "what fraction of the reference population is at or below this
//! value" for one stat, over either the whole population or a single
//! position. Each `(field, scope)` reference array is sorted once and kept for
//! the life of the index.

use crate::population::ReferencePopulation;
use crate::position::Position;
use crate::stat::{Directionality, StatField};
use crate::{Error, Result};
use ahash::AHashMap;
use parking_lot::RwLock;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Which slice of the population a reference array covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    All,
    Position(Position),
}

impl Scope {
    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        match self {
            Scope::All => true,
            Scope::Position(p) => *p == position,
        }
    }
}

impl From<Option<Position>> for Scope {
    fn from(position: Option<Position>) -> Self {
        position.map(Scope::Position).unwrap_or(Scope::All)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str("ALL"),
            Scope::Position(p) => write!(f, "{}", p),
        }
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("ALL") {
            Ok(Scope::All)
        } else {
            s.parse().map(Scope::Position)
        }
    }
}

/// Cache key of one reference array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub field: StatField,
    pub scope: Scope,
}

impl CacheKey {
    pub fn new(field: StatField, scope: Scope) -> Self {
        Self { field, scope }
    }

    /// Every key the index can hold: each field globally and per position
    pub fn all() -> Vec<CacheKey> {
        let scopes = std::iter::once(Scope::All).chain(Position::ALL.into_iter().map(Scope::Position));
        scopes
            .flat_map(|scope| StatField::ALL.into_iter().map(move |field| CacheKey::new(field, scope)))
            .collect()
    }
}

/// Formats as `field.SCOPE`, e.g. `fortyYard.WR` or `height.ALL`
impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.field, self.scope)
    }
}

impl FromStr for CacheKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (field, scope) = s
            .split_once('.')
            .ok_or_else(|| Error::InvalidInput(format!("malformed percentile key '{}'", s)))?;
        Ok(CacheKey::new(field.parse()?, scope.parse()?))
    }
}

/// Raw percent rank of `value` in an ascending, non-empty array, in `[0, 1]`.
///
/// Ties are ranked after their run. A value strictly between two entries is
/// interpolated past the index of the larger one. A value above every entry
/// ranks 1.
pub fn raw_percent_rank(sorted: &[f64], value: f64) -> f64 {
    let len = sorted.len();
    let first = sorted.partition_point(|&x| x < value);
    if first == len {
        return 1.0;
    }

    // Skip the run of exact ties
    let i = sorted.partition_point(|&x| x <= value);
    if i == 0 {
        return 0.0;
    }

    let mut rank = i as f64;
    if value != sorted[i - 1] {
        rank += (value - sorted[i - 1]) / (sorted[i] - sorted[i - 1]);
    }
    rank / len as f64
}

/// Lazily built, process-lifetime cache of sorted reference arrays
pub struct PercentileIndex {
    population: Arc<ReferencePopulation>,
    cache: RwLock<AHashMap<CacheKey, Arc<[f64]>>>,
    builds: AtomicUsize,
}

impl PercentileIndex {
    pub fn new(population: Arc<ReferencePopulation>) -> Self {
        Self {
            population,
            cache: RwLock::new(AHashMap::new()),
            builds: AtomicUsize::new(0),
        }
    }

    pub fn population(&self) -> &Arc<ReferencePopulation> {
        &self.population
    }

    /// Number of reference arrays built from the population so far
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    pub fn cached_keys(&self) -> usize {
        self.cache.read().len()
    }

    fn build(&self, key: CacheKey) -> Arc<[f64]> {
        let values: Arc<[f64]> = self.population.sorted_values(key.field, key.scope).into();
        self.builds.fetch_add(1, Ordering::Relaxed);
        debug!(%key, len = values.len(), "built percentile reference");
        values
    }

    /// Sorted reference array for `key`, built on first use
    pub fn reference(&self, key: CacheKey) -> Arc<[f64]> {
        if let Some(values) = self.cache.read().get(&key) {
            return values.clone();
        }

        // Re-check under the write lock so a key is only ever built once
        let mut cache = self.cache.write();
        cache.entry(key).or_insert_with(|| self.build(key)).clone()
    }

    /// Percentile (0 to 100) of `value` for `field`, scoped to `position` when given.
    ///
    /// An absent value ranks 0. Lower-is-better fields are inverted so that
    /// 100 is always the best result.
    pub fn percent_rank(
        &self,
        field: StatField,
        value: Option<f64>,
        position: Option<Position>,
    ) -> Result<f64> {
        let Some(value) = value else {
            return Ok(0.0);
        };
        if !value.is_finite() {
            return Err(Error::InvalidInput(format!("{} value {} is not finite", field, value)));
        }

        let scope = Scope::from(position);
        let reference = self.reference(CacheKey::new(field, scope));
        if reference.is_empty() {
            return Err(Error::DataIntegrity { field, scope });
        }

        let raw = raw_percent_rank(&reference, value);
        Ok(match field.directionality() {
            Directionality::HigherIsBetter => raw * 100.0,
            Directionality::LowerIsBetter => (1.0 - raw) * 100.0,
        })
    }

    /// Build every missing key up front. Returns how many were built.
    ///
    /// Keys with no observations are cached empty and still fail on query.
    pub fn precompute(&self) -> usize {
        let mut cache = self.cache.write();
        let missing: Vec<CacheKey> = CacheKey::all()
            .into_iter()
            .filter(|key| !cache.contains_key(key))
            .collect();

        let built: Vec<(CacheKey, Arc<[f64]>)> = missing
            .par_iter()
            .map(|&key| (key, self.build(key)))
            .collect();

        let count = built.len();
        cache.extend(built);
        info!(built = count, total = cache.len(), "percentile references precomputed");
        count
    }

    /// Install a pre-sorted reference array, e.g. from a snapshot.
    ///
    /// Returns `false` when the key is already cached. Seeding is not counted
    /// as a build.
    pub fn seed(&self, key: CacheKey, values: Vec<f64>) -> Result<bool> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidRecord(format!("non-finite value in {}", key)));
        }
        if values.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidRecord(format!("reference {} is not sorted", key)));
        }

        let mut cache = self.cache.write();
        if cache.contains_key(&key) {
            return Ok(false);
        }
        cache.insert(key, values.into());
        Ok(true)
    }

    /// All cached reference arrays, ordered by key
    pub fn snapshot(&self) -> Vec<(CacheKey, Arc<[f64]>)> {
        let mut entries: Vec<_> = self
            .cache
            .read()
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }
}
