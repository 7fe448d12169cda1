//! JSON export of a frontier.

use std::path::Path;

use pcx_core::{ParetoFrontier, PcxResult};

/// Serialize as `{ "convention": .., "mode": .., "points": [..] }`.
pub fn frontier_to_json_value(frontier: &ParetoFrontier) -> PcxResult<serde_json::Value> {
    Ok(serde_json::to_value(frontier)?)
}

pub fn write_frontier_json(frontier: &ParetoFrontier, path: &Path) -> PcxResult<()> {
    let json = serde_json::to_string_pretty(frontier)?;
    std::fs::write(path, json)?;
    Ok(())
}
