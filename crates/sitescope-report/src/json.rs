//! JSON report: the full aggregate, pretty-printed.

use crate::error::Result;
use sitescope_core::AggregateResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `report.json` under `output_dir`.
pub fn write_json_report(output_dir: &Path, aggregate: &AggregateResult) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join("report.json");
    let contents = serde_json::to_string_pretty(aggregate)?;
    fs::write(&path, contents)?;
    Ok(path)
}
