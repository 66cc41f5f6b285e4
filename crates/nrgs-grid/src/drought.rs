//! Drought scenario: reduced hydro availability.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dispatch::{DispatchOptions, DispatchResult, merit_order_dispatch};
use crate::error::{GridError, GridResult};
use crate::source::SourceCatalog;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DroughtSeverity {
    Mild,
    #[default]
    Moderate,
    Severe,
    Extreme,
}

impl DroughtSeverity {
    pub const ALL: [DroughtSeverity; 4] = [
        DroughtSeverity::Mild,
        DroughtSeverity::Moderate,
        DroughtSeverity::Severe,
        DroughtSeverity::Extreme,
    ];

    /// Hydro capacity multiplier.
    pub fn hydro_factor(self) -> f64 {
        match self {
            DroughtSeverity::Mild => 0.85,
            DroughtSeverity::Moderate => 0.65,
            DroughtSeverity::Severe => 0.40,
            DroughtSeverity::Extreme => 0.20,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DroughtSeverity::Mild => "mild",
            DroughtSeverity::Moderate => "moderate",
            DroughtSeverity::Severe => "severe",
            DroughtSeverity::Extreme => "extreme",
        }
    }
}

impl fmt::Display for DroughtSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DroughtSeverity {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sev| sev.label() == s.trim())
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|sev| sev.label()).collect();
                GridError::validation(format!(
                    "invalid drought severity '{s}'. Choose from: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// Dispatch under drought, tagged with the severity that produced it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DroughtResult {
    pub severity: DroughtSeverity,
    pub hydro_capacity_factor: f64,
    pub dispatch: DispatchResult,
}

/// Run dispatch once with hydro de-rated for `severity`.
pub fn apply_drought(
    catalog: &SourceCatalog,
    demand_mw: &[f64],
    severity: DroughtSeverity,
    include_nuclear: bool,
) -> GridResult<DroughtResult> {
    let factor = severity.hydro_factor();
    info!(%severity, hydro_factor = factor, "Applying drought");
    let opts = DispatchOptions {
        include_nuclear,
        drought_factor: factor,
        outage: false,
    };
    let dispatch = merit_order_dispatch(catalog, demand_mw, &opts)?;
    Ok(DroughtResult {
        severity,
        hydro_capacity_factor: factor,
        dispatch,
    })
}
