//! Scenario execution for the dispatch and reactor engines.

use std::fmt;
use std::time::Instant;

use nrgs_grid::{
    DispatchOptions, DispatchResult, DroughtSeverity, OutagePlan, apply_drought,
    merit_order_dispatch, simulate_outage,
};
use nrgs_reactor::{
    LoadFollowingRamp, ReactorKind, StepInsertion, TransientMetrics, TransientOptions,
    TransientResult, load_following, step_reactivity_insertion,
};
use rayon::prelude::*;
use tracing::info;

use crate::catalog_compile::CompiledProject;
use crate::error::AppResult;
use crate::metrics::{DispatchMetrics, compute_dispatch_metrics};

/// Grid scenario selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridScenario {
    Baseline { include_nuclear: bool },
    Drought {
        severity: DroughtSeverity,
        include_nuclear: bool,
    },
    Outage(OutagePlan),
}

impl fmt::Display for GridScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridScenario::Baseline { include_nuclear } if *include_nuclear => write!(f, "baseline"),
            GridScenario::Baseline { .. } => write!(f, "baseline (no nuclear)"),
            GridScenario::Drought { severity, .. } => write!(f, "drought ({severity})"),
            GridScenario::Outage(plan) => write!(
                f,
                "nuclear outage (hours {}..{})",
                plan.start_hour,
                plan.start_hour.saturating_add(plan.duration_hours)
            ),
        }
    }
}

/// Outcome of one grid scenario.
#[derive(Debug, Clone)]
pub struct GridRunResponse {
    pub scenario: GridScenario,
    pub dispatch: DispatchResult,
    /// Set for drought runs
    pub hydro_capacity_factor: Option<f64>,
    /// Set for outage runs
    pub outage_active: Option<Vec<bool>>,
    pub metrics: DispatchMetrics,
    pub elapsed_s: f64,
}

pub fn run_grid_scenario(
    project: &CompiledProject,
    demand_mw: &[f64],
    scenario: GridScenario,
) -> AppResult<GridRunResponse> {
    let started = Instant::now();
    info!(%scenario, hours = demand_mw.len(), "Running grid scenario");

    let (dispatch, hydro_capacity_factor, outage_active) = match scenario {
        GridScenario::Baseline { include_nuclear } => {
            let opts = DispatchOptions {
                include_nuclear,
                ..DispatchOptions::default()
            };
            (merit_order_dispatch(&project.sources, demand_mw, &opts)?, None, None)
        }
        GridScenario::Drought {
            severity,
            include_nuclear,
        } => {
            let r = apply_drought(&project.sources, demand_mw, severity, include_nuclear)?;
            (r.dispatch, Some(r.hydro_capacity_factor), None)
        }
        GridScenario::Outage(plan) => {
            let r = simulate_outage(&project.sources, demand_mw, &plan)?;
            (r.dispatch, None, Some(r.outage_active))
        }
    };

    let metrics = compute_dispatch_metrics(&dispatch, &project.sources, &project.emission_factors);
    Ok(GridRunResponse {
        scenario,
        dispatch,
        hydro_capacity_factor,
        outage_active,
        metrics,
        elapsed_s: started.elapsed().as_secs_f64(),
    })
}

/// Every drought severity, mildest first, run in parallel.
pub fn sweep_drought(
    project: &CompiledProject,
    demand_mw: &[f64],
    include_nuclear: bool,
) -> AppResult<Vec<GridRunResponse>> {
    DroughtSeverity::ALL
        .par_iter()
        .map(|&severity| {
            run_grid_scenario(
                project,
                demand_mw,
                GridScenario::Drought {
                    severity,
                    include_nuclear,
                },
            )
        })
        .collect()
}

/// Reactor transient selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransientScenario {
    Step(StepInsertion),
    LoadFollow(LoadFollowingRamp),
}

#[derive(Debug, Clone)]
pub struct TransientRunResponse {
    pub scenario: TransientScenario,
    pub result: TransientResult,
    pub metrics: TransientMetrics,
    pub elapsed_s: f64,
}

pub fn run_transient(
    project: &CompiledProject,
    reactor: ReactorKind,
    scenario: TransientScenario,
    opts: &TransientOptions,
) -> AppResult<TransientRunResponse> {
    let started = Instant::now();
    let result = match scenario {
        TransientScenario::Step(step) => {
            step_reactivity_insertion(&project.reactors, reactor, step, opts)?
        }
        TransientScenario::LoadFollow(ramp) => {
            load_following(&project.reactors, reactor, ramp, opts)?
        }
    };
    let metrics = result.metrics();
    let elapsed_s = started.elapsed().as_secs_f64();
    info!(
        %reactor,
        peak_power = metrics.peak_power,
        elapsed_s,
        "Transient complete"
    );
    Ok(TransientRunResponse {
        scenario,
        result,
        metrics,
        elapsed_s,
    })
}
