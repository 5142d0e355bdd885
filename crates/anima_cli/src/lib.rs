//! Scenario replay for the `anima` binary.

pub mod scenario;

pub use scenario::{replay, Scenario, ScenarioEvent, TurnRecord};

use anima_core::PsycheSnapshot;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
struct SnapshotRecord<'a> {
    snapshot: &'a PsycheSnapshot,
}

/// The `{"snapshot": ...}` line printed after a run.
pub fn snapshot_line(snapshot: &PsycheSnapshot) -> Result<String> {
    Ok(serde_json::to_string(&SnapshotRecord { snapshot })?)
}

/// Read a snapshot from either a bare JSON document or a saved run output,
/// in which case the last `{"snapshot": ...}` line wins.
pub fn parse_snapshot(content: &str) -> Result<PsycheSnapshot> {
    if let Ok(snapshot) = serde_json::from_str::<PsycheSnapshot>(content) {
        return Ok(snapshot);
    }
    content
        .lines()
        .rev()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find_map(|mut value| value.get_mut("snapshot").map(serde_json::Value::take))
        .context("No snapshot found")
        .and_then(|value| serde_json::from_value(value).context("Failed to parse snapshot JSON"))
}
