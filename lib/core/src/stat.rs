//! Combine stat fields and their metadata
//!
//! The order of [`StatField::ALL`] is the canonical order of the whole system:
//! similarity vectors, percentile radars and any serialized player use it.

use crate::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Number of combine stats tracked per player
pub const STAT_COUNT: usize = 8;

/// One of the eight standardized combine measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatField {
    Height,
    Weight,
    FortyYard,
    VerticalJump,
    BenchReps,
    BroadJump,
    ThreeCone,
    ShuttleRun,
}

/// Whether a larger raw value is the better athletic result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directionality {
    HigherIsBetter,
    LowerIsBetter,
}

/// Display and input metadata for a stat field
#[derive(Debug, Clone, Copy)]
pub struct StatMeta {
    pub field: StatField,
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub default: f64,
    /// Decimal places accepted on input
    pub precision: u32,
    pub directionality: Directionality,
}

const STAT_TABLE: [StatMeta; STAT_COUNT] = [
    StatMeta {
        field: StatField::Height,
        key: "height",
        label: "Height",
        unit: "\"",
        default: 73.0,
        precision: 0,
        directionality: Directionality::HigherIsBetter,
    },
    StatMeta {
        field: StatField::Weight,
        key: "weight",
        label: "Weight",
        unit: "lbs",
        default: 184.0,
        precision: 0,
        directionality: Directionality::HigherIsBetter,
    },
    StatMeta {
        field: StatField::FortyYard,
        key: "fortyYard",
        label: "40y Dash",
        unit: "s",
        default: 4.29,
        precision: 2,
        directionality: Directionality::LowerIsBetter,
    },
    StatMeta {
        field: StatField::VerticalJump,
        key: "verticalJump",
        label: "Vertical Jump",
        unit: "\"",
        default: 38.5,
        precision: 1,
        directionality: Directionality::HigherIsBetter,
    },
    StatMeta {
        field: StatField::BenchReps,
        key: "benchReps",
        label: "225lb Bench Press",
        unit: "reps",
        default: 17.0,
        precision: 0,
        directionality: Directionality::HigherIsBetter,
    },
    StatMeta {
        field: StatField::BroadJump,
        key: "broadJump",
        label: "Broad Jump",
        unit: "\"",
        default: 131.0,
        precision: 0,
        directionality: Directionality::HigherIsBetter,
    },
    StatMeta {
        field: StatField::ThreeCone,
        key: "threeCone",
        label: "Three Cone Drill",
        unit: "s",
        default: 6.74,
        precision: 2,
        directionality: Directionality::LowerIsBetter,
    },
    StatMeta {
        field: StatField::ShuttleRun,
        key: "shuttleRun",
        label: "20y Shuttle Run",
        unit: "s",
        default: 4.17,
        precision: 2,
        directionality: Directionality::LowerIsBetter,
    },
];

impl StatField {
    /// All fields in canonical order
    pub const ALL: [StatField; STAT_COUNT] = [
        StatField::Height,
        StatField::Weight,
        StatField::FortyYard,
        StatField::VerticalJump,
        StatField::BenchReps,
        StatField::BroadJump,
        StatField::ThreeCone,
        StatField::ShuttleRun,
    ];

    /// Position of this field in the canonical order
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn meta(self) -> &'static StatMeta {
        &STAT_TABLE[self.index()]
    }

    #[inline]
    pub fn key(self) -> &'static str {
        self.meta().key
    }

    #[inline]
    pub fn directionality(self) -> Directionality {
        self.meta().directionality
    }

    #[inline]
    pub fn default_value(self) -> f64 {
        self.meta().default
    }

    /// Parse a user-entered value for this field, rounded to its precision
    pub fn parse_value(self, text: &str) -> Result<f64> {
        parse_input(text, self.meta().precision)
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StatField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        StatField::ALL
            .iter()
            .copied()
            .find(|f| f.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// Parse a decimal number and round it to `precision` decimal places.
///
/// Non-numeric or non-finite text is rejected rather than coerced to zero.
pub fn parse_input(text: &str, precision: u32) -> Result<f64> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("'{}' is not a number", text)))?;
    if !value.is_finite() {
        return Err(Error::InvalidInput(format!("'{}' is not a finite number", text)));
    }
    let factor = 10f64.powi(precision as i32);
    Ok((value * factor).round() / factor)
}

/// One value per stat field, indexed by [`StatField`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatLine<T>([T; STAT_COUNT]);

impl<T> StatLine<T> {
    pub fn new(values: [T; STAT_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[T; STAT_COUNT] {
        &self.0
    }

    /// Iterate `(field, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (StatField, &T)> {
        StatField::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(StatField, &T) -> U) -> StatLine<U> {
        StatLine(std::array::from_fn(|i| f(StatField::ALL[i], &self.0[i])))
    }
}

impl StatLine<f64> {
    /// The default value of every field
    pub fn defaults() -> Self {
        Self(std::array::from_fn(|i| StatField::ALL[i].default_value()))
    }
}

impl<T: Default> Default for StatLine<T> {
    fn default() -> Self {
        Self(std::array::from_fn(|_| T::default()))
    }
}

impl<T> Index<StatField> for StatLine<T> {
    type Output = T;

    fn index(&self, field: StatField) -> &T {
        &self.0[field.index()]
    }
}

impl<T> IndexMut<StatField> for StatLine<T> {
    fn index_mut(&mut self, field: StatField) -> &mut T {
        &mut self.0[field.index()]
    }
}

impl<T: Serialize> Serialize for StatLine<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(STAT_COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let keys: Vec<_> = StatField::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            vec![
                "height",
                "weight",
                "fortyYard",
                "verticalJump",
                "benchReps",
                "broadJump",
                "threeCone",
                "shuttleRun"
            ]
        );
        for (i, field) in StatField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(field.meta().field, *field);
        }
    }

    #[test]
    fn test_directionality() {
        let lower: Vec<_> = StatField::ALL
            .iter()
            .filter(|f| f.directionality() == Directionality::LowerIsBetter)
            .copied()
            .collect();
        assert_eq!(
            lower,
            vec![StatField::FortyYard, StatField::ThreeCone, StatField::ShuttleRun]
        );
    }

    #[test]
    fn test_parse_field() {
        assert_eq!("fortyYard".parse::<StatField>().unwrap(), StatField::FortyYard);
        assert_eq!("BENCHREPS".parse::<StatField>().unwrap(), StatField::BenchReps);
        assert!(matches!("forty".parse::<StatField>(), Err(Error::UnknownField(_))));
    }

    #[test]
    fn test_parse_input_rounds_to_precision() {
        assert_eq!(parse_input("4.318", 2).unwrap(), 4.32);
        assert_eq!(parse_input(" 72.6 ", 0).unwrap(), 73.0);
        assert_eq!(StatField::VerticalJump.parse_value("38.54").unwrap(), 38.5);
    }

    #[test]
    fn test_parse_input_rejects_garbage() {
        assert!(matches!(parse_input("fast", 2), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_input("", 0), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_input("NaN", 0), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_input("inf", 0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_stat_line_serializes_as_map() {
        let line = StatLine::defaults();
        let json = serde_json::to_value(line).unwrap();
        assert_eq!(json["fortyYard"], 4.29);
        assert_eq!(json["height"], 73.0);
        assert_eq!(json.as_object().unwrap().len(), STAT_COUNT);
    }
}
