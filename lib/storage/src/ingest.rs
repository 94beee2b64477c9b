//! Raw combine export ingestion
//!
//! Converts rows of the upstream export (`Player`, `Pos`, `Ht`, `Forty`, ...)
//! into processed [`PlayerRecord`]s. Zero, blank or missing measurements
//! become absent.

use anyhow::{Context, Result};
use combinex_core::{DraftInfo, PlayerRecord, Position, StatField, StatLine};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawCombineRow {
    #[serde(default)]
    player: Option<String>,
    #[serde(default)]
    pos: Option<String>,
    #[serde(default)]
    ht: Value,
    #[serde(default)]
    wt: Value,
    #[serde(default)]
    forty: Value,
    #[serde(default)]
    vertical: Value,
    #[serde(default)]
    bench_reps: Value,
    #[serde(default)]
    broad_jump: Value,
    #[serde(default)]
    cone: Value,
    #[serde(default)]
    shuttle: Value,
    #[serde(default)]
    year: Value,
    #[serde(default)]
    team: Value,
    #[serde(default, rename = "AV")]
    av: Value,
    #[serde(default)]
    round: Value,
    #[serde(default)]
    pick: Value,
}

/// Result of converting a raw export
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub records: Vec<PlayerRecord>,
    /// Rows dropped for a missing name or unknown position
    pub skipped: usize,
}

/// A measurement cell. Heights may be written as feet-inches (`"6-2"`).
fn measurement(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            match s.split_once('-') {
                Some((feet, inches)) => {
                    let feet: f64 = feet.trim().parse().ok()?;
                    let inches: f64 = inches.trim().parse().ok()?;
                    feet * 12.0 + inches
                }
                None => s.parse().ok()?,
            }
        }
        _ => return None,
    };
    (v.is_finite() && v != 0.0).then_some(v)
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RawCombineRow {
    fn into_record(self) -> Option<PlayerRecord> {
        let name = self.player.filter(|n| !n.trim().is_empty())?;
        let pos = self.pos.unwrap_or_default();
        let position: Position = match pos.parse() {
            Ok(p) => p,
            Err(_) => {
                warn!(player = %name, position = %pos, "skipping row with unknown position");
                return None;
            }
        };

        let mut stats = StatLine::default();
        stats[StatField::Height] = measurement(&self.ht);
        stats[StatField::Weight] = measurement(&self.wt);
        stats[StatField::FortyYard] = measurement(&self.forty);
        stats[StatField::VerticalJump] = measurement(&self.vertical);
        stats[StatField::BenchReps] = measurement(&self.bench_reps);
        stats[StatField::BroadJump] = measurement(&self.broad_jump);
        stats[StatField::ThreeCone] = measurement(&self.cone);
        stats[StatField::ShuttleRun] = measurement(&self.shuttle);

        let draft = DraftInfo {
            year: integer(&self.year).and_then(|y| u16::try_from(y).ok()),
            team: text(&self.team),
            av: integer(&self.av).and_then(|v| i32::try_from(v).ok()),
            round: integer(&self.round).and_then(|v| u32::try_from(v).ok()),
            pick: integer(&self.pick).and_then(|v| u32::try_from(v).ok()),
        };

        Some(PlayerRecord::new(name.trim(), position, stats).with_draft(draft))
    }
}

/// Convert a raw export (JSON array) into processed records
pub fn ingest_raw(bytes: &[u8]) -> Result<IngestReport> {
    let rows: Vec<RawCombineRow> =
        serde_json::from_slice(bytes).context("malformed raw combine export")?;
    let total = rows.len();

    let records: Vec<PlayerRecord> = rows.into_iter().filter_map(RawCombineRow::into_record).collect();
    let skipped = total - records.len();

    info!(rows = total, records = records.len(), skipped, "raw combine export ingested");
    Ok(IngestReport { records, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_measurement_parsing() {
        assert_eq!(measurement(&json!(4.41)), Some(4.41));
        assert_eq!(measurement(&json!("6-2")), Some(74.0));
        assert_eq!(measurement(&json!("38.5")), Some(38.5));
        assert_eq!(measurement(&json!(0)), None);
        assert_eq!(measurement(&json!("")), None);
        assert_eq!(measurement(&Value::Null), None);
        assert_eq!(measurement(&json!(true)), None);
    }

    #[test]
    fn test_ingest_raw_rows() {
        let raw = json!([
            {
                "Player": "Calvin Johnson", "Pos": "WR", "Ht": "6-5", "Wt": 239,
                "Forty": 4.35, "Vertical": 42.5, "BenchReps": 0, "BroadJump": 139,
                "Cone": null, "Shuttle": "", "Year": 2007, "Team": "Detroit Lions",
                "AV": 85, "Round": 1, "Pick": 2
            },
            {"Player": "Mystery", "Pos": "ZZ", "Ht": 70},
            {"Pos": "QB", "Ht": 75},
            {"Player": "Kicker", "Pos": "K"}
        ]);
        let report = ingest_raw(raw.to_string().as_bytes()).unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.skipped, 2);

        let megatron = &report.records[0];
        assert_eq!(megatron.name, "Calvin Johnson");
        assert_eq!(megatron.stat(StatField::Height), Some(77.0));
        assert_eq!(megatron.stat(StatField::Weight), Some(239.0));
        assert_eq!(megatron.stat(StatField::BenchReps), None);
        assert_eq!(megatron.stat(StatField::ThreeCone), None);
        assert_eq!(megatron.stat(StatField::ShuttleRun), None);
        assert_eq!(megatron.draft.year, Some(2007));
        assert_eq!(megatron.draft.pick, Some(2));
        assert_eq!(megatron.draft.team.as_deref(), Some("Detroit Lions"));

        let kicker = &report.records[1];
        assert_eq!(kicker.position, Position::K);
        assert!(kicker.stats().iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn test_malformed_export_fails() {
        assert!(ingest_raw(b"{\"Player\": 1}").is_err());
    }
}
