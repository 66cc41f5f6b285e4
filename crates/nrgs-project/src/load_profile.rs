//! Hourly load profile CSV (`load_mw` column, one row per hour).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ProjectError, ProjectResult};

#[derive(Debug, Serialize, Deserialize)]
struct LoadRecord {
    load_mw: f64,
}

/// Read the `load_mw` column. Other columns are ignored.
pub fn read_load_profile(path: &Path) -> ProjectResult<Vec<f64>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut load = Vec::new();
    for (i, record) in reader.deserialize::<LoadRecord>().enumerate() {
        let record = record?;
        if !record.load_mw.is_finite() || record.load_mw < 0.0 {
            return Err(ProjectError::LoadProfile {
                row: i + 1,
                what: format!(
                    "load_mw must be finite and non-negative (got {})",
                    record.load_mw
                ),
            });
        }
        load.push(record.load_mw);
    }
    Ok(load)
}

pub fn write_load_profile(path: &Path, load_mw: &[f64]) -> ProjectResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for &value in load_mw {
        writer.serialize(LoadRecord { load_mw: value })?;
    }
    writer.flush()?;
    Ok(())
}
