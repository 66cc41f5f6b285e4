//! Nuclear outage scenario.
//!
//! Demand is split into before/during/after windows; each non-empty window
//! is dispatched on its own (nuclear excluded during the outage) and the
//! rows are stitched back together in hour order.

use serde::Serialize;
use tracing::info;

use crate::dispatch::{DispatchHour, DispatchOptions, DispatchResult, merit_order_dispatch};
use crate::error::{GridError, GridResult};
use crate::source::{SourceCatalog, SourceKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OutagePlan {
    pub start_hour: usize,
    pub duration_hours: usize,
    /// Nuclear available outside the outage window
    pub include_nuclear_before_after: bool,
}

impl Default for OutagePlan {
    fn default() -> Self {
        Self {
            start_hour: 0,
            duration_hours: 24,
            include_nuclear_before_after: true,
        }
    }
}

impl OutagePlan {
    /// Half-open hour range `[start, end)` of the outage, clipped to `n_hours`.
    pub fn window(&self, n_hours: usize) -> (usize, usize) {
        let start = self.start_hour.min(n_hours);
        let end = self.start_hour.saturating_add(self.duration_hours).min(n_hours);
        (start, end)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutageResult {
    pub plan: OutagePlan,
    pub dispatch: DispatchResult,
    /// Per hour: true while nuclear is offline
    pub outage_active: Vec<bool>,
}

fn window_options(include_nuclear: bool) -> DispatchOptions {
    DispatchOptions {
        include_nuclear,
        ..DispatchOptions::default()
    }
}

/// Re-index a window's rows onto the union columns; missing sources read 0.
fn align_rows(part: &DispatchResult, columns: &[SourceKind]) -> Vec<DispatchHour> {
    part.rows()
        .iter()
        .map(|row| DispatchHour {
            demand_mw: row.demand_mw,
            dispatched_mw: columns
                .iter()
                .map(|&k| {
                    part.columns()
                        .iter()
                        .position(|&c| c == k)
                        .map_or(0.0, |idx| row.dispatched_mw[idx])
                })
                .collect(),
            unserved_mw: row.unserved_mw,
        })
        .collect()
}

/// Dispatch `demand_mw` with a nuclear outage described by `plan`.
pub fn simulate_outage(
    catalog: &SourceCatalog,
    demand_mw: &[f64],
    plan: &OutagePlan,
) -> GridResult<OutageResult> {
    let n_hours = demand_mw.len();
    let (start, end) = plan.window(n_hours);
    info!(start, end, n_hours, "Simulating nuclear outage");

    let windows = [
        (&demand_mw[..start], plan.include_nuclear_before_after),
        (&demand_mw[start..end], false),
        (&demand_mw[end..], plan.include_nuclear_before_after),
    ];

    let mut parts = Vec::with_capacity(windows.len());
    for (slice, include_nuclear) in windows {
        if !slice.is_empty() {
            let opts = window_options(include_nuclear);
            parts.push(merit_order_dispatch(catalog, slice, &opts)?);
        }
    }
    if parts.is_empty() {
        return Err(GridError::computation(
            "no data after splitting demand into outage windows",
        ));
    }

    let columns: Vec<SourceKind> = catalog
        .sources()
        .iter()
        .map(|s| s.kind)
        .filter(|k| parts.iter().any(|p| p.columns().contains(k)))
        .collect();

    let rows: Vec<DispatchHour> = parts.iter().flat_map(|p| align_rows(p, &columns)).collect();
    let outage_active = (0..n_hours).map(|h| h >= start && h < end).collect();

    Ok(OutageResult {
        plan: *plan,
        dispatch: DispatchResult::from_parts(columns, rows),
        outage_active,
    })
}
