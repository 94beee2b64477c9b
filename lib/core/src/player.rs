use crate::position::Position;
use crate::stat::{StatField, StatLine};
use serde::{Deserialize, Serialize};

/// Draft outcome carried alongside a combine entry. Not used for ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftInfo {
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub team: Option<String>,
    /// Approximate value
    #[serde(default)]
    pub av: Option<i32>,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub pick: Option<u32>,
}

/// One historical combine entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    #[serde(rename = "player")]
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub forty_yard: Option<f64>,
    #[serde(default)]
    pub vertical_jump: Option<f64>,
    #[serde(default)]
    pub bench_reps: Option<f64>,
    #[serde(default)]
    pub broad_jump: Option<f64>,
    #[serde(default)]
    pub three_cone: Option<f64>,
    #[serde(default)]
    pub shuttle_run: Option<f64>,
    #[serde(flatten)]
    pub draft: DraftInfo,
}

impl PlayerRecord {
    /// Create a record from a stat line, without draft data
    pub fn new(name: impl Into<String>, position: Position, stats: StatLine<Option<f64>>) -> Self {
        let mut record = Self {
            name: name.into(),
            position,
            height: None,
            weight: None,
            forty_yard: None,
            vertical_jump: None,
            bench_reps: None,
            broad_jump: None,
            three_cone: None,
            shuttle_run: None,
            draft: DraftInfo::default(),
        };
        for (field, value) in stats.iter() {
            *record.stat_mut(field) = *value;
        }
        record
    }

    pub fn with_draft(mut self, draft: DraftInfo) -> Self {
        self.draft = draft;
        self
    }

    pub fn stat(&self, field: StatField) -> Option<f64> {
        match field {
            StatField::Height => self.height,
            StatField::Weight => self.weight,
            StatField::FortyYard => self.forty_yard,
            StatField::VerticalJump => self.vertical_jump,
            StatField::BenchReps => self.bench_reps,
            StatField::BroadJump => self.broad_jump,
            StatField::ThreeCone => self.three_cone,
            StatField::ShuttleRun => self.shuttle_run,
        }
    }

    pub fn stat_mut(&mut self, field: StatField) -> &mut Option<f64> {
        match field {
            StatField::Height => &mut self.height,
            StatField::Weight => &mut self.weight,
            StatField::FortyYard => &mut self.forty_yard,
            StatField::VerticalJump => &mut self.vertical_jump,
            StatField::BenchReps => &mut self.bench_reps,
            StatField::BroadJump => &mut self.broad_jump,
            StatField::ThreeCone => &mut self.three_cone,
            StatField::ShuttleRun => &mut self.shuttle_run,
        }
    }

    /// All eight stats in canonical order
    pub fn stats(&self) -> StatLine<Option<f64>> {
        StatLine::new(StatField::ALL.map(|f| self.stat(f)))
    }
}

/// A fully populated player profile to compare against the population.
///
/// Never part of the reference population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlayer {
    pub name: String,
    pub position: Position,
    pub stats: StatLine<f64>,
}

impl QueryPlayer {
    pub fn new(name: impl Into<String>, position: Position, stats: StatLine<f64>) -> Self {
        Self {
            name: name.into(),
            position,
            stats,
        }
    }

    /// Build a query from a historical record. Absent stats take the field default.
    pub fn from_record(record: &PlayerRecord) -> Self {
        Self {
            name: record.name.clone(),
            position: record.position,
            stats: record
                .stats()
                .map(|field, value| value.unwrap_or_else(|| field.default_value())),
        }
    }

    pub fn with_stat(mut self, field: StatField, value: f64) -> Self {
        self.stats[field] = value;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

impl Default for QueryPlayer {
    fn default() -> Self {
        Self {
            name: "My Player".to_string(),
            position: Position::Wr,
            stats: StatLine::defaults(),
        }
    }
}
