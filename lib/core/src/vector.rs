use crate::player::{PlayerRecord, QueryPlayer};
use crate::stat::{StatLine, STAT_COUNT};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// An 8-dimensional stat vector in canonical field order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatVector {
    data: [f64; STAT_COUNT],
}

impl StatVector {
    #[inline]
    #[must_use]
    pub fn new(data: [f64; STAT_COUNT]) -> Self {
        Self { data }
    }

    /// Vector of a historical record. Absent stats count as zero.
    #[must_use]
    pub fn from_record(record: &PlayerRecord) -> Self {
        Self::new(*record.stats().map(|_, v| v.unwrap_or(0.0)).as_array())
    }

    #[must_use]
    pub fn from_query(player: &QueryPlayer) -> Self {
        Self::new(*player.stats.as_array())
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn dot(&self, other: &StatVector) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Compute cosine similarity with another vector.
    ///
    /// Fails with [`Error::DegenerateInput`] when either vector has zero magnitude
    /// and with [`Error::InvalidInput`] when a magnitude is not finite.
    pub fn cosine_similarity(&self, other: &StatVector) -> Result<f64> {
        let denom = self.cosine_denominator(other)?;
        Ok(self.dot(other) / denom)
    }

    /// Product of both magnitudes; zero is degenerate and overflow is invalid input
    fn cosine_denominator(&self, other: &StatVector) -> Result<f64> {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return Err(Error::DegenerateInput(
                "cosine similarity of a zero-magnitude stat vector".to_string(),
            ));
        }
        if !denom.is_finite() {
            return Err(Error::InvalidInput(
                "stat vector magnitude is not finite".to_string(),
            ));
        }
        Ok(denom)
    }

    /// Per-component share of the cosine similarity; the components sum to it.
    pub fn cosine_contributions(&self, other: &StatVector) -> Result<StatLine<f64>> {
        let denom = self.cosine_denominator(other)?;
        Ok(StatLine::new(std::array::from_fn(|i| {
            self.data[i] * other.data[i] / denom
        })))
    }
}
