//! Cost and emission totals over a dispatch table.

use std::collections::BTreeMap;

use nrgs_core::constants::G_PER_KWH_TO_T_PER_MWH;
use nrgs_core::hourly_energy_mwh;
use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchResult;
use crate::error::{GridError, GridResult};
use crate::source::{SourceCatalog, SourceKind};

/// Lifecycle emission factors in gCO2eq/kWh, keyed by source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmissionFactors(BTreeMap<SourceKind, f64>);

impl EmissionFactors {
    pub fn new(factors: BTreeMap<SourceKind, f64>) -> GridResult<Self> {
        for (kind, &g) in &factors {
            if !g.is_finite() || g < 0.0 {
                return Err(GridError::configuration(format!(
                    "{kind}: emission factor must be finite and >= 0 (got {g})"
                )));
            }
        }
        Ok(Self(factors))
    }

    /// IPCC AR5 lifecycle medians.
    pub fn ipcc_median() -> Self {
        Self(BTreeMap::from([
            (SourceKind::Nuclear, 12.0),
            (SourceKind::Geothermal, 38.0),
            (SourceKind::Hydro, 24.0),
            (SourceKind::Wind, 11.0),
            (SourceKind::Solar, 48.0),
            (SourceKind::Thermal, 650.0),
        ]))
    }

    pub fn get(&self, kind: SourceKind) -> Option<f64> {
        self.0.get(&kind).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceKind, f64)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }
}

/// Energy, cost and emissions of one source over a dispatch table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SourceBreakdown {
    pub kind: SourceKind,
    pub energy_mwh: f64,
    pub cost_usd: f64,
    pub emissions_t: f64,
}

/// Per-source totals in column order.
///
/// Sources missing from the catalog cost nothing; sources without an
/// emission factor emit nothing.
pub fn breakdown(
    result: &DispatchResult,
    catalog: &SourceCatalog,
    factors: &EmissionFactors,
) -> Vec<SourceBreakdown> {
    result
        .columns()
        .iter()
        .filter_map(|&kind| {
            let series = result.column(kind)?;
            let energy_mwh = hourly_energy_mwh(&series);
            let cost_usd = catalog
                .get(kind)
                .map_or(0.0, |s| energy_mwh * s.variable_cost_usd_per_mwh);
            let emissions_t = factors
                .get(kind)
                .map_or(0.0, |g| energy_mwh * g / G_PER_KWH_TO_T_PER_MWH);
            Some(SourceBreakdown {
                kind,
                energy_mwh,
                cost_usd,
                emissions_t,
            })
        })
        .collect()
}

/// Total variable cost (USD).
pub fn total_cost_usd(result: &DispatchResult, catalog: &SourceCatalog) -> f64 {
    breakdown(result, catalog, &EmissionFactors::default())
        .iter()
        .map(|b| b.cost_usd)
        .sum()
}

/// Total lifecycle emissions (tCO2eq).
pub fn total_emissions_t(result: &DispatchResult, factors: &EmissionFactors) -> f64 {
    result
        .columns()
        .iter()
        .filter_map(|&kind| {
            let g = factors.get(kind)?;
            let series = result.column(kind)?;
            Some(hourly_energy_mwh(&series) * g / G_PER_KWH_TO_T_PER_MWH)
        })
        .sum()
}
