//! Initial value problem driver with sampled output.

use nalgebra::DVector;
use tracing::debug;

use crate::bdf::{Bdf, BdfStats};
use crate::error::{OdeError, OdeResult};
use crate::system::OdeSystem;

/// Options for an integration run.
#[derive(Clone, Copy, Debug)]
pub struct OdeOptions {
    /// Relative error tolerance
    pub rtol: f64,
    /// Absolute error tolerance
    pub atol: f64,
    /// Upper bound on the step size (seconds)
    pub max_step: f64,
    /// Initial step size; chosen automatically when `None`
    pub first_step: Option<f64>,
    /// Maximum number of accepted steps (safety limit)
    pub max_steps: usize,
}

impl Default for OdeOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-10,
            max_step: f64::INFINITY,
            first_step: None,
            max_steps: 500_000,
        }
    }
}

/// Trajectory sampled at the requested times.
#[derive(Clone, Debug)]
pub struct OdeSolution {
    /// Sample times (seconds)
    pub t: Vec<f64>,
    /// State at each sample time
    pub y: Vec<DVector<f64>>,
    /// Solver counters
    pub stats: BdfStats,
}

/// Integrate `system` from `t_span.0` to `t_span.1` starting at `y0`, and
/// evaluate the continuous solution at every time in `t_eval`.
///
/// `t_eval` must be non-decreasing and lie inside `t_span`. Samples at
/// `t_span.0` return `y0` exactly; all others come from the dense output of
/// the step that covers them. Any solver failure aborts the run; no partial
/// trajectory is returned.
pub fn solve_ivp<S: OdeSystem + ?Sized>(
    system: &S,
    t_span: (f64, f64),
    y0: DVector<f64>,
    t_eval: &[f64],
    opts: &OdeOptions,
) -> OdeResult<OdeSolution> {
    let (t0, t1) = t_span;
    if !t0.is_finite() || !t1.is_finite() {
        return Err(OdeError::InvalidArg {
            what: "time span must be finite",
        });
    }
    if !(t1 > t0) {
        return Err(OdeError::InvalidArg {
            what: "time span end must be greater than start",
        });
    }
    if opts.max_steps == 0 {
        return Err(OdeError::InvalidArg {
            what: "max_steps must be positive",
        });
    }
    if t_eval.windows(2).any(|w| !(w[1] >= w[0])) {
        return Err(OdeError::InvalidArg {
            what: "t_eval must be non-decreasing",
        });
    }
    if t_eval.iter().any(|&t| !(t >= t0 && t <= t1)) {
        return Err(OdeError::InvalidArg {
            what: "t_eval must lie within the time span",
        });
    }

    let mut solver = Bdf::new(system, t0, y0.clone(), t1, opts)?;

    let mut t_out = Vec::with_capacity(t_eval.len());
    let mut y_out = Vec::with_capacity(t_eval.len());
    let mut next = 0;

    while next < t_eval.len() && t_eval[next] <= t0 {
        t_out.push(t_eval[next]);
        y_out.push(y0.clone());
        next += 1;
    }

    while !solver.is_finished() {
        if solver.stats().accepted_steps >= opts.max_steps {
            return Err(OdeError::MaxStepsExceeded {
                t: solver.t(),
                max_steps: opts.max_steps,
            });
        }

        solver.step()?;

        if solver.y().iter().any(|v| !v.is_finite()) {
            return Err(OdeError::NonFinite { t: solver.t() });
        }

        if next < t_eval.len() && t_eval[next] <= solver.t() {
            let dense = solver.dense_output();
            while next < t_eval.len() && t_eval[next] <= solver.t() {
                let t = t_eval[next];
                let y = if t == solver.t() {
                    solver.y().clone()
                } else {
                    dense.eval(t)
                };
                t_out.push(t);
                y_out.push(y);
                next += 1;
            }
        }
    }

    let stats = solver.stats();
    debug!(
        accepted = stats.accepted_steps,
        rejected = stats.rejected_steps,
        rhs_evals = stats.rhs_evals,
        jacobian_evals = stats.jacobian_evals,
        lu_decompositions = stats.lu_decompositions,
        "BDF integration finished"
    );

    Ok(OdeSolution {
        t: t_out,
        y: y_out,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ode_options_defaults() {
        let opts = OdeOptions::default();
        assert_eq!(opts.rtol, 1e-8);
        assert_eq!(opts.atol, 1e-10);
        assert_eq!(opts.max_steps, 500_000);
        assert!(opts.max_step.is_infinite());
        assert!(opts.first_step.is_none());
    }
}
