//! Merit-order economic dispatch.
//!
//! Each hour is allocated independently: sources are walked in ascending
//! variable cost (ties keep declaration order) and each takes
//! `min(remaining, capacity)` until demand is met. Whatever is left after
//! the last source is unserved.

use nrgs_core::ensure_non_negative;
use serde::Serialize;
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::source::{GenerationSource, SourceCatalog, SourceKind};

/// Flags for a single dispatch call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DispatchOptions {
    pub include_nuclear: bool,
    /// Multiplier in (0, 1] on hydro capacity
    pub drought_factor: f64,
    /// Forces nuclear offline for this call
    pub outage: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            include_nuclear: true,
            drought_factor: 1.0,
            outage: false,
        }
    }
}

impl DispatchOptions {
    fn nuclear_available(&self) -> bool {
        self.include_nuclear && !self.outage
    }
}

/// Allocation for one hour, aligned with [`DispatchResult::columns`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DispatchHour {
    pub demand_mw: f64,
    pub dispatched_mw: Vec<f64>,
    pub unserved_mw: f64,
}

/// Hourly dispatch table: one row per input hour, one column per retained source.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DispatchResult {
    columns: Vec<SourceKind>,
    rows: Vec<DispatchHour>,
}

impl DispatchResult {
    pub(crate) fn from_parts(columns: Vec<SourceKind>, rows: Vec<DispatchHour>) -> Self {
        Self { columns, rows }
    }

    /// Retained sources in declaration order.
    pub fn columns(&self) -> &[SourceKind] {
        &self.columns
    }

    pub fn rows(&self) -> &[DispatchHour] {
        &self.rows
    }

    pub fn hours(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Hourly MW of one source, `None` if the source was not retained.
    pub fn column(&self, kind: SourceKind) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|&k| k == kind)?;
        Some(self.rows.iter().map(|r| r.dispatched_mw[idx]).collect())
    }

    /// MW of `kind` in hour `h`; 0 for sources not retained, `None` past the last hour.
    pub fn dispatched(&self, h: usize, kind: SourceKind) -> Option<f64> {
        let row = self.rows.get(h)?;
        Some(
            self.columns
                .iter()
                .position(|&k| k == kind)
                .map_or(0.0, |idx| row.dispatched_mw[idx]),
        )
    }

    pub fn demand(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.demand_mw).collect()
    }

    pub fn unserved(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.unserved_mw).collect()
    }
}

/// Indices of `sources` in merit order. Stable: equal costs keep input order.
pub fn merit_order(sources: &[GenerationSource]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..sources.len()).collect();
    order.sort_by(|&a, &b| {
        sources[a]
            .variable_cost_usd_per_mwh
            .total_cmp(&sources[b].variable_cost_usd_per_mwh)
    });
    order
}

fn validate_demand(demand_mw: &[f64]) -> GridResult<()> {
    for (h, &d) in demand_mw.iter().enumerate() {
        ensure_non_negative(d, "hourly demand")
            .map_err(|e| GridError::validation(format!("hour {h}: {e}")))?;
    }
    Ok(())
}

fn validate_options(opts: &DispatchOptions) -> GridResult<()> {
    let f = opts.drought_factor;
    if !f.is_finite() || f <= 0.0 || f > 1.0 {
        return Err(GridError::validation(format!(
            "drought factor must be in (0, 1] (got {f})"
        )));
    }
    Ok(())
}

fn dispatch_hour(
    sources: &[GenerationSource],
    order: &[usize],
    demand_mw: f64,
) -> DispatchHour {
    let mut dispatched_mw = vec![0.0; sources.len()];
    let mut remaining = demand_mw;
    for &idx in order {
        let take = remaining.min(sources[idx].capacity_mw);
        dispatched_mw[idx] = take;
        remaining -= take;
        if remaining <= 0.0 {
            break;
        }
    }
    DispatchHour {
        demand_mw,
        dispatched_mw,
        unserved_mw: remaining.max(0.0),
    }
}

/// Allocate every hour of `demand_mw` across the catalog in merit order.
///
/// An empty demand profile gives an empty table.
pub fn merit_order_dispatch(
    catalog: &SourceCatalog,
    demand_mw: &[f64],
    opts: &DispatchOptions,
) -> GridResult<DispatchResult> {
    validate_options(opts)?;
    validate_demand(demand_mw)?;

    let sources = catalog.working_set(opts.nuclear_available(), opts.drought_factor);
    let order = merit_order(&sources);
    debug!(
        hours = demand_mw.len(),
        merit_order = ?order.iter().map(|&i| sources[i].kind).collect::<Vec<_>>(),
        "Dispatching"
    );

    let rows = demand_mw
        .iter()
        .map(|&d| dispatch_hour(&sources, &order, d))
        .collect();
    let columns = sources.iter().map(|s| s.kind).collect();
    Ok(DispatchResult::from_parts(columns, rows))
}
