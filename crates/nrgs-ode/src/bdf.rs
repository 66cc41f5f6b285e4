//! Variable-order, variable-step BDF solver for stiff systems.
//!
//! Backward differentiation formulas of orders 1 through 5 in the
//! quasi-constant step size formulation (NDF-style `kappa` coefficients).
//! The solution history is held as modified divided differences `D`, which
//! makes step size changes a matrix product and gives dense output for free.
//!
//! Each step:
//! 1. predicts `y` from the difference table,
//! 2. solves the implicit corrector with a simplified Newton iteration on
//!    `I - c J` (LU-factorised, reused across steps while it converges),
//! 3. accepts or rejects the step from the local error estimate,
//! 4. after `order + 1` equal steps, considers orders `k-1, k, k+1` and
//!    picks the one allowing the largest next step.
//!
//! References:
//! - Shampine, L. F., & Reichelt, M. W. (1997). "The MATLAB ODE Suite".
//!   SIAM J. Sci. Comput., 18(1), 1-22.
//! - Byrne, G. D., & Hindmarsh, A. C. (1975). "A Polyalgorithm for the
//!   Numerical Solution of Ordinary Differential Equations". ACM TOMS 1(1).

use nalgebra::linalg::LU;
use nalgebra::{DMatrix, DVector, Dyn};
use tracing::trace;

use crate::dense::DenseOutput;
use crate::error::{OdeError, OdeResult};
use crate::solve::OdeOptions;
use crate::system::OdeSystem;

/// Highest BDF order used.
pub const MAX_ORDER: usize = 5;

const NEWTON_MAXITER: usize = 4;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

const KAPPA: [f64; MAX_ORDER + 1] = [0.0, -0.1850, -1.0 / 9.0, -0.0823, -0.0415, 0.0];

/// Counters accumulated over one integration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BdfStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub rhs_evals: usize,
    pub jacobian_evals: usize,
    pub lu_decompositions: usize,
}

struct NewtonOutcome {
    converged: bool,
    iterations: usize,
    y: DVector<f64>,
    d: DVector<f64>,
}

/// BDF integrator state for one forward integration `t0 -> t_bound`.
pub struct Bdf<'a, S: OdeSystem + ?Sized> {
    system: &'a S,
    t: f64,
    t_old: f64,
    t_bound: f64,
    y: DVector<f64>,
    rtol: f64,
    atol: f64,
    max_step: f64,
    h_abs: f64,
    order: usize,
    n_equal_steps: usize,
    newton_tol: f64,
    d: Vec<DVector<f64>>,
    jac: DMatrix<f64>,
    lu: Option<LU<f64, Dyn, Dyn>>,
    gamma: [f64; MAX_ORDER + 1],
    alpha: [f64; MAX_ORDER + 1],
    error_const: [f64; MAX_ORDER + 1],
    stats: BdfStats,
}

impl<'a, S: OdeSystem + ?Sized> Bdf<'a, S> {
    /// Set up the solver at `(t0, y0)`.
    ///
    /// `opts.first_step` overrides the automatic initial step selection.
    pub fn new(
        system: &'a S,
        t0: f64,
        y0: DVector<f64>,
        t_bound: f64,
        opts: &OdeOptions,
    ) -> OdeResult<Self> {
        let OdeOptions {
            rtol,
            atol,
            max_step,
            first_step,
            ..
        } = *opts;
        if !(t_bound > t0) {
            return Err(OdeError::InvalidArg {
                what: "t_bound must be greater than t0",
            });
        }
        if !(rtol > 0.0) || !(atol > 0.0) {
            return Err(OdeError::InvalidArg {
                what: "rtol and atol must be positive",
            });
        }
        if !(max_step > 0.0) {
            return Err(OdeError::InvalidArg {
                what: "max_step must be positive",
            });
        }
        if y0.len() != system.dim() {
            return Err(OdeError::DimensionMismatch {
                expected: system.dim(),
                got: y0.len(),
            });
        }
        if y0.iter().any(|v| !v.is_finite()) {
            return Err(OdeError::InvalidArg {
                what: "initial state must be finite",
            });
        }

        let mut stats = BdfStats::default();
        let f0 = eval_rhs(system, t0, &y0, &mut stats)?;
        if f0.iter().any(|v| !v.is_finite()) {
            return Err(OdeError::NonFinite { t: t0 });
        }

        let h_abs = match first_step {
            Some(h) if h > 0.0 => h.min(t_bound - t0),
            Some(_) => {
                return Err(OdeError::InvalidArg {
                    what: "first_step must be positive",
                });
            }
            None => select_initial_step(
                system, t0, &y0, &f0, t_bound, max_step, rtol, atol, &mut stats,
            )?,
        };

        let mut gamma = [0.0; MAX_ORDER + 1];
        for k in 1..=MAX_ORDER {
            gamma[k] = gamma[k - 1] + 1.0 / k as f64;
        }
        let mut alpha = [0.0; MAX_ORDER + 1];
        let mut error_const = [0.0; MAX_ORDER + 1];
        for k in 0..=MAX_ORDER {
            alpha[k] = (1.0 - KAPPA[k]) * gamma[k];
            error_const[k] = KAPPA[k] * gamma[k] + 1.0 / (k + 1) as f64;
        }

        let n = y0.len();
        let mut d = vec![DVector::zeros(n); MAX_ORDER + 3];
        d[0] = y0.clone();
        d[1] = &f0 * h_abs;

        let jac = system.jacobian(t0, &y0)?;
        stats.jacobian_evals += 1;

        let newton_tol = (10.0 * f64::EPSILON / rtol).max(0.03_f64.min(rtol.sqrt()));

        Ok(Self {
            system,
            t: t0,
            t_old: t0,
            t_bound,
            y: y0,
            rtol,
            atol,
            max_step,
            h_abs,
            order: 1,
            n_equal_steps: 0,
            newton_tol,
            d,
            jac,
            lu: None,
            gamma,
            alpha,
            error_const,
            stats,
        })
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn y(&self) -> &DVector<f64> {
        &self.y
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn step_size(&self) -> f64 {
        self.h_abs
    }

    pub fn stats(&self) -> BdfStats {
        self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.t >= self.t_bound
    }

    /// Interpolant over the most recent accepted step.
    pub fn dense_output(&self) -> DenseOutput {
        DenseOutput::new(
            self.t_old,
            self.t,
            self.h_abs,
            self.order,
            self.d[..=self.order].to_vec(),
        )
    }

    /// Advance by one accepted step (possibly after several rejected attempts).
    pub fn step(&mut self) -> OdeResult<()> {
        let t = self.t;
        let min_step = 10.0 * (t.abs() * f64::EPSILON).max(f64::MIN_POSITIVE);

        let mut h_abs = self.h_abs;
        if h_abs > self.max_step {
            change_d(&mut self.d, self.order, self.max_step / h_abs);
            h_abs = self.max_step;
            self.n_equal_steps = 0;
        } else if h_abs < min_step {
            change_d(&mut self.d, self.order, min_step / h_abs);
            h_abs = min_step;
            self.n_equal_steps = 0;
        }

        let order = self.order;
        let mut lu = self.lu.take();
        let mut current_jac = false;

        let (t_new, outcome, safety, scale, error_norm) = loop {
            if h_abs < min_step {
                return Err(OdeError::StepTooSmall { t });
            }

            let mut t_new = t + h_abs;
            if t_new > self.t_bound {
                t_new = self.t_bound;
                change_d(&mut self.d, order, (t_new - t) / h_abs);
                self.n_equal_steps = 0;
                lu = None;
            }
            let h = t_new - t;
            h_abs = h;

            let mut y_predict = self.d[0].clone();
            for k in 1..=order {
                y_predict += &self.d[k];
            }
            let scale = y_predict.map(|v| self.atol + self.rtol * v.abs());

            let mut psi = DVector::zeros(y_predict.len());
            for k in 1..=order {
                psi.axpy(self.gamma[k], &self.d[k], 1.0);
            }
            psi /= self.alpha[order];

            let c = h / self.alpha[order];

            let outcome = loop {
                let factor = match lu.take() {
                    Some(factor) => factor,
                    None => {
                        self.stats.lu_decompositions += 1;
                        iteration_matrix(&self.jac, c).lu()
                    }
                };
                let outcome = solve_bdf_system(
                    self.system,
                    t_new,
                    &y_predict,
                    c,
                    &psi,
                    &factor,
                    &scale,
                    self.newton_tol,
                    &mut self.stats,
                )?;
                lu = Some(factor);

                if outcome.converged || current_jac {
                    break outcome;
                }
                self.jac = self.system.jacobian(t_new, &y_predict)?;
                self.stats.jacobian_evals += 1;
                lu = None;
                current_jac = true;
            };

            if !outcome.converged {
                trace!(t, h, "BDF Newton iteration failed, halving step");
                h_abs *= 0.5;
                change_d(&mut self.d, order, 0.5);
                self.n_equal_steps = 0;
                lu = None;
                self.stats.rejected_steps += 1;
                continue;
            }

            let safety = 0.9 * (2 * NEWTON_MAXITER + 1) as f64
                / (2 * NEWTON_MAXITER + outcome.iterations) as f64;

            let scale = outcome.y.map(|v| self.atol + self.rtol * v.abs());
            let error = &outcome.d * self.error_const[order];
            let error_norm = rms_norm(&error.component_div(&scale));

            if error_norm > 1.0 {
                let factor =
                    MIN_FACTOR.max(safety * error_norm.powf(-1.0 / (order as f64 + 1.0)));
                trace!(t, h, error_norm, "BDF step rejected");
                h_abs *= factor;
                change_d(&mut self.d, order, factor);
                self.n_equal_steps = 0;
                self.stats.rejected_steps += 1;
                continue;
            }

            break (t_new, outcome, safety, scale, error_norm);
        };

        self.stats.accepted_steps += 1;
        self.n_equal_steps += 1;
        self.t_old = t;
        self.t = t_new;
        self.y = outcome.y;
        self.h_abs = h_abs;
        self.lu = lu;

        // Update the difference table with the corrector increment.
        self.d[order + 2] = &outcome.d - &self.d[order + 1];
        self.d[order + 1] = outcome.d;
        for i in (0..=order).rev() {
            let next = self.d[i + 1].clone();
            self.d[i] += next;
        }

        if self.n_equal_steps < order + 1 {
            return Ok(());
        }

        let error_m_norm = if order > 1 {
            let error_m = &self.d[order] * self.error_const[order - 1];
            rms_norm(&error_m.component_div(&scale))
        } else {
            f64::INFINITY
        };
        let error_p_norm = if order < MAX_ORDER {
            let error_p = &self.d[order + 2] * self.error_const[order + 1];
            rms_norm(&error_p.component_div(&scale))
        } else {
            f64::INFINITY
        };

        let error_norms = [error_m_norm, error_norm, error_p_norm];
        let mut best = 0;
        let mut best_factor = f64::NEG_INFINITY;
        for (i, norm) in error_norms.iter().enumerate() {
            let factor = norm.powf(-1.0 / (order + i) as f64);
            if factor > best_factor {
                best = i;
                best_factor = factor;
            }
        }

        let new_order = order + best - 1;
        let factor = MAX_FACTOR.min(safety * best_factor);
        self.order = new_order;
        self.h_abs *= factor;
        change_d(&mut self.d, new_order, factor);
        self.n_equal_steps = 0;
        self.lu = None;

        Ok(())
    }
}

fn eval_rhs<S: OdeSystem + ?Sized>(
    system: &S,
    t: f64,
    y: &DVector<f64>,
    stats: &mut BdfStats,
) -> OdeResult<DVector<f64>> {
    stats.rhs_evals += 1;
    system.rhs(t, y)
}

/// Root-mean-square norm.
fn rms_norm(v: &DVector<f64>) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.norm() / (v.len() as f64).sqrt()
}

fn iteration_matrix(jac: &DMatrix<f64>, c: f64) -> DMatrix<f64> {
    let n = jac.nrows();
    DMatrix::identity(n, n) - jac * c
}

/// Transformation matrix used when rescaling the difference table.
fn compute_r(order: usize, factor: f64) -> DMatrix<f64> {
    let n = order + 1;
    let mut m = DMatrix::zeros(n, n);
    for j in 0..n {
        m[(0, j)] = 1.0;
    }
    for i in 1..n {
        for j in 1..n {
            m[(i, j)] = (i as f64 - 1.0 - factor * j as f64) / i as f64;
        }
    }
    for i in 1..n {
        for j in 0..n {
            m[(i, j)] *= m[(i - 1, j)];
        }
    }
    m
}

/// Rescale the first `order + 1` differences for a step size change by `factor`.
fn change_d(d: &mut [DVector<f64>], order: usize, factor: f64) {
    let r = compute_r(order, factor);
    let u = compute_r(order, 1.0);
    let ru = r * u;
    let old: Vec<DVector<f64>> = d[..=order].to_vec();
    for (i, slot) in d.iter_mut().take(order + 1).enumerate() {
        let mut acc = DVector::zeros(old[0].len());
        for (k, dk) in old.iter().enumerate() {
            acc.axpy(ru[(k, i)], dk, 1.0);
        }
        *slot = acc;
    }
}

#[allow(clippy::too_many_arguments)]
fn solve_bdf_system<S: OdeSystem + ?Sized>(
    system: &S,
    t_new: f64,
    y_predict: &DVector<f64>,
    c: f64,
    psi: &DVector<f64>,
    lu: &LU<f64, Dyn, Dyn>,
    scale: &DVector<f64>,
    tol: f64,
    stats: &mut BdfStats,
) -> OdeResult<NewtonOutcome> {
    let mut d = DVector::zeros(y_predict.len());
    let mut y = y_predict.clone();
    let mut dy_norm_old: Option<f64> = None;
    let mut converged = false;
    let mut iterations = 0;

    for k in 0..NEWTON_MAXITER {
        iterations = k + 1;
        let f = eval_rhs(system, t_new, &y, stats)?;
        if f.iter().any(|v| !v.is_finite()) {
            break;
        }

        let rhs = f * c - psi - &d;
        let Some(dy) = lu.solve(&rhs) else {
            break;
        };
        let dy_norm = rms_norm(&dy.component_div(scale));

        let rate = dy_norm_old.map(|old| dy_norm / old);
        if let Some(rate) = rate {
            if rate >= 1.0
                || rate.powi((NEWTON_MAXITER - k) as i32) / (1.0 - rate) * dy_norm > tol
            {
                break;
            }
        }

        y += &dy;
        d += &dy;

        if dy_norm == 0.0 || rate.is_some_and(|rate| rate / (1.0 - rate) * dy_norm < tol) {
            converged = true;
            break;
        }

        dy_norm_old = Some(dy_norm);
    }

    Ok(NewtonOutcome {
        converged,
        iterations,
        y,
        d,
    })
}

#[allow(clippy::too_many_arguments)]
fn select_initial_step<S: OdeSystem + ?Sized>(
    system: &S,
    t0: f64,
    y0: &DVector<f64>,
    f0: &DVector<f64>,
    t_bound: f64,
    max_step: f64,
    rtol: f64,
    atol: f64,
    stats: &mut BdfStats,
) -> OdeResult<f64> {
    let interval = t_bound - t0;
    let scale = y0.map(|v| atol + v.abs() * rtol);
    let d0 = rms_norm(&y0.component_div(&scale));
    let d1 = rms_norm(&f0.component_div(&scale));

    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    let h0 = h0.min(interval);

    let y1 = y0 + f0 * h0;
    let f1 = eval_rhs(system, t0 + h0, &y1, stats)?;
    let d2 = rms_norm(&(f1 - f0).component_div(&scale)) / h0;

    // First order: exponent 1 / (order + 1)
    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        1e-6_f64.max(h0 * 1e-3)
    } else {
        (0.01 / d1.max(d2)).sqrt()
    };

    Ok((100.0 * h0).min(h1).min(interval).min(max_step))
}
