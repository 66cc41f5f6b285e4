//! Dispatch summary metrics.
//!
//! Energy totals assume one row per hour, so MW sums equal MWh.

use nrgs_core::hourly_energy_mwh;
use nrgs_grid::{DispatchResult, EmissionFactors, SourceBreakdown, SourceCatalog, breakdown};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchMetrics {
    pub hours: usize,
    pub total_demand_mwh: f64,
    /// Energy served by generation, excluding unserved demand
    pub total_dispatched_mwh: f64,
    pub unserved_mwh: f64,
    /// Unserved energy as a share of demand, in percent
    pub unserved_pct: f64,
    pub peak_unserved_mw: f64,
    pub total_cost_usd: f64,
    pub total_emissions_t: f64,
    pub per_source: Vec<SourceBreakdown>,
}

impl DispatchMetrics {
    /// Average variable cost of served energy (USD/MWh).
    pub fn average_cost_usd_per_mwh(&self) -> Option<f64> {
        (self.total_dispatched_mwh > 0.0).then(|| self.total_cost_usd / self.total_dispatched_mwh)
    }
}

pub fn compute_dispatch_metrics(
    result: &DispatchResult,
    catalog: &SourceCatalog,
    factors: &EmissionFactors,
) -> DispatchMetrics {
    let per_source = breakdown(result, catalog, factors);
    let total_demand_mwh = hourly_energy_mwh(&result.demand());
    let unserved = result.unserved();
    let unserved_mwh = hourly_energy_mwh(&unserved);
    let unserved_pct = if total_demand_mwh > 0.0 {
        unserved_mwh / total_demand_mwh * 100.0
    } else {
        0.0
    };

    DispatchMetrics {
        hours: result.hours(),
        total_demand_mwh,
        total_dispatched_mwh: per_source.iter().map(|b| b.energy_mwh).sum(),
        unserved_mwh,
        unserved_pct,
        peak_unserved_mw: unserved.iter().copied().fold(0.0, f64::max),
        total_cost_usd: per_source.iter().map(|b| b.cost_usd).sum(),
        total_emissions_t: per_source.iter().map(|b| b.emissions_t).sum(),
        per_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrgs_grid::{DispatchOptions, GenerationSource, SourceKind, merit_order_dispatch};

    #[test]
    fn metrics_split_served_and_unserved() {
        let cat = SourceCatalog::new(vec![
            GenerationSource::new(SourceKind::Hydro, 600.0, 5.0),
            GenerationSource::new(SourceKind::Thermal, 200.0, 100.0),
        ])
        .unwrap();
        let r = merit_order_dispatch(&cat, &[500.0, 1000.0], &DispatchOptions::default()).unwrap();
        let m = compute_dispatch_metrics(&r, &cat, &EmissionFactors::ipcc_median());

        assert_eq!(m.hours, 2);
        assert!((m.total_demand_mwh - 1500.0).abs() < 1e-9);
        assert!((m.total_dispatched_mwh - 1300.0).abs() < 1e-9);
        assert!((m.unserved_mwh - 200.0).abs() < 1e-9);
        assert!((m.unserved_pct - 200.0 / 1500.0 * 100.0).abs() < 1e-9);
        assert_eq!(m.peak_unserved_mw, 200.0);
        // hydro 1100 MWh at 5, thermal 200 MWh at 100
        assert!(
            (m.total_cost_usd - (1100.0 * 5.0 + 200.0 * 100.0)).abs() < 1e-6
        );
        assert!(
            (m.total_emissions_t - (1100.0 * 24.0 + 200.0 * 650.0) / 1000.0).abs() < 1e-9
        );
        assert!(m.average_cost_usd_per_mwh().is_some());
    }

    #[test]
    fn empty_dispatch_has_zero_metrics() {
        let cat = SourceCatalog::kenya_baseline();
        let r = merit_order_dispatch(&cat, &[], &DispatchOptions::default()).unwrap();
        let m = compute_dispatch_metrics(&r, &cat, &EmissionFactors::ipcc_median());
        assert_eq!(m.total_demand_mwh, 0.0);
        assert_eq!(m.unserved_pct, 0.0);
        assert_eq!(m.average_cost_usd_per_mwh(), None);
    }
}
