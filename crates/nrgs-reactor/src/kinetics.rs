//! Point-kinetics model and transient driver.
//!
//! State layout: `[P, C1..C6, Tf, Tc]`.

use nrgs_core::{ensure_finite, linspace};
use nrgs_ode::{DMatrix, DVector, OdeOptions, OdeResult, OdeSystem, solve_ivp};
use tracing::{debug, info, warn};

use crate::error::{ReactorError, ReactorResult};
use crate::feedback::ThermalFeedback;
use crate::params::{
    DelayedNeutronGroups, NUM_GROUPS, ReactorCatalog, ReactorKind, ReactorTypeConfig,
};
use crate::reactivity::ReactivityProfile;
use crate::transient::{TransientResult, TransientSample};

/// Length of the kinetics state vector.
pub const STATE_DIM: usize = NUM_GROUPS + 3;

const IDX_TF: usize = NUM_GROUPS + 1;
const IDX_TC: usize = NUM_GROUPS + 2;

/// Initial precursor inventory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitialPrecursors {
    /// All groups start empty.
    #[default]
    Zero,
    /// Groups in equilibrium with `P0`: `C_i = beta_i / (lambda_i * Lambda) * P0`.
    Equilibrium,
}

/// Options for a transient run.
#[derive(Clone, Copy, Debug)]
pub struct TransientOptions {
    /// Initial normalized power
    pub p0: f64,
    /// Number of uniformly spaced output samples (>= 2)
    pub samples: usize,
    pub initial_precursors: InitialPrecursors,
    pub ode: OdeOptions,
}

impl Default for TransientOptions {
    fn default() -> Self {
        Self {
            p0: 1.0,
            samples: 1000,
            initial_precursors: InitialPrecursors::Zero,
            ode: OdeOptions::default(),
        }
    }
}

/// Point-kinetics equations with lumped thermal feedback.
pub struct PointKinetics<'a, P: ?Sized> {
    groups: &'a DelayedNeutronGroups,
    lambda_prompt: f64,
    beta_total: f64,
    feedback: ThermalFeedback,
    profile: &'a P,
}

impl<'a, P: ReactivityProfile + ?Sized> PointKinetics<'a, P> {
    pub fn new(
        groups: &'a DelayedNeutronGroups,
        config: &ReactorTypeConfig,
        profile: &'a P,
    ) -> Self {
        Self {
            groups,
            lambda_prompt: config.lambda_prompt,
            beta_total: groups.beta_total(),
            feedback: ThermalFeedback::from(config),
            profile,
        }
    }

    pub fn feedback(&self) -> &ThermalFeedback {
        &self.feedback
    }

    /// Initial state from `p0` and the configured reference temperatures.
    pub fn initial_state(&self, p0: f64, precursors: InitialPrecursors) -> DVector<f64> {
        let mut y = DVector::zeros(STATE_DIM);
        y[0] = p0;
        if precursors == InitialPrecursors::Equilibrium {
            for i in 0..NUM_GROUPS {
                y[1 + i] = self.groups.beta[i] / (self.groups.lambda[i] * self.lambda_prompt) * p0;
            }
        }
        y[IDX_TF] = self.feedback.t_fuel0;
        y[IDX_TC] = self.feedback.t_coolant0;
        y
    }

    /// External, feedback and total reactivity at `(t, y)`.
    pub fn reactivity(&self, t: f64, y: &DVector<f64>) -> (f64, f64, f64) {
        let rho_ext = self.profile.rho(t);
        let rho_fb = self.feedback.reactivity(y[IDX_TF], y[IDX_TC]);
        (rho_ext, rho_fb, rho_ext + rho_fb)
    }
}

impl<P: ReactivityProfile + ?Sized> OdeSystem for PointKinetics<'_, P> {
    fn dim(&self) -> usize {
        STATE_DIM
    }

    fn rhs(&self, t: f64, y: &DVector<f64>) -> OdeResult<DVector<f64>> {
        let p = y[0];
        let (tf, tc) = (y[IDX_TF], y[IDX_TC]);
        let (_, _, rho) = self.reactivity(t, y);
        let g = self.groups;

        let mut dy = DVector::zeros(STATE_DIM);
        let mut delayed_source = 0.0;
        for i in 0..NUM_GROUPS {
            let c = y[1 + i];
            delayed_source += g.lambda[i] * c;
            dy[1 + i] = g.beta[i] / self.lambda_prompt * p - g.lambda[i] * c;
        }
        dy[0] = (rho - self.beta_total) / self.lambda_prompt * p + delayed_source;
        dy[IDX_TF] = self.feedback.dtf_dt(p, tf, tc);
        dy[IDX_TC] = self.feedback.dtc_dt(tf, tc);
        Ok(dy)
    }

    fn jacobian(&self, t: f64, y: &DVector<f64>) -> OdeResult<DMatrix<f64>> {
        let p = y[0];
        let (_, _, rho) = self.reactivity(t, y);
        let g = self.groups;
        let lp = self.lambda_prompt;
        let fb = &self.feedback;
        let th = &fb.thermal;

        let mut jac = DMatrix::zeros(STATE_DIM, STATE_DIM);
        jac[(0, 0)] = (rho - self.beta_total) / lp;
        for i in 0..NUM_GROUPS {
            jac[(0, 1 + i)] = g.lambda[i];
            jac[(1 + i, 0)] = g.beta[i] / lp;
            jac[(1 + i, 1 + i)] = -g.lambda[i];
        }
        jac[(0, IDX_TF)] = fb.alpha_fuel * p / lp;
        jac[(0, IDX_TC)] = fb.alpha_coolant * p / lp;

        jac[(IDX_TF, 0)] = th.k_power / th.c_fuel;
        jac[(IDX_TF, IDX_TF)] = -th.h / th.c_fuel;
        jac[(IDX_TF, IDX_TC)] = th.h / th.c_fuel;

        jac[(IDX_TC, IDX_TF)] = th.h / th.c_coolant;
        jac[(IDX_TC, IDX_TC)] = -th.h / th.c_coolant;
        Ok(jac)
    }
}

fn validate_run(time_span: (f64, f64), opts: &TransientOptions) -> ReactorResult<()> {
    let (t0, t1) = time_span;
    if !t0.is_finite() || !t1.is_finite() {
        return Err(ReactorError::validation(format!(
            "time span must be finite (got {t0} .. {t1})"
        )));
    }
    if t1 <= t0 {
        return Err(ReactorError::validation(format!(
            "time span end must be greater than start (got {t0} .. {t1})"
        )));
    }
    let p0 = ensure_finite(opts.p0, "initial power")?;
    if p0 <= 0.0 {
        return Err(ReactorError::validation(format!(
            "initial power must be > 0 (got {p0})"
        )));
    }
    if opts.samples < 2 {
        return Err(ReactorError::validation(format!(
            "at least 2 samples are required (got {})",
            opts.samples
        )));
    }
    Ok(())
}

/// Integrate a reactor transient and sample it uniformly over `time_span`.
///
/// Fails without a partial trajectory if the solver does not reach `t_end`.
pub fn simulate<P: ReactivityProfile + ?Sized>(
    catalog: &ReactorCatalog,
    kind: ReactorKind,
    profile: &P,
    time_span: (f64, f64),
    opts: &TransientOptions,
) -> ReactorResult<TransientResult> {
    validate_run(time_span, opts)?;
    let config = catalog.get(kind)?;
    let model = PointKinetics::new(catalog.groups(), config, profile);

    info!(
        reactor = %kind,
        profile = %profile.describe(),
        t_start = time_span.0,
        t_end = time_span.1,
        "Running reactor transient"
    );

    let y0 = model.initial_state(opts.p0, opts.initial_precursors);
    let t_eval = linspace(time_span.0, time_span.1, opts.samples);
    let solution = solve_ivp(&model, time_span, y0, &t_eval, &opts.ode)
        .inspect_err(|e| warn!(reactor = %kind, error = %e, "Transient failed"))?;

    debug!(
        accepted = solution.stats.accepted_steps,
        rejected = solution.stats.rejected_steps,
        jacobians = solution.stats.jacobian_evals,
        "Transient integration finished"
    );

    let samples = solution
        .t
        .iter()
        .zip(&solution.y)
        .map(|(&t, y)| {
            let (rho_ext, rho_fb, rho_total) = model.reactivity(t, y);
            TransientSample {
                t,
                power: y[0],
                rho_ext,
                rho_fb,
                rho_total,
                t_fuel: y[IDX_TF],
                t_coolant: y[IDX_TC],
            }
        })
        .collect();

    Ok(TransientResult::new(kind, samples))
}

/// [`simulate`] with the reactor resolved from an identifier or label.
pub fn simulate_named<P: ReactivityProfile + ?Sized>(
    catalog: &ReactorCatalog,
    reactor: &str,
    profile: &P,
    time_span: (f64, f64),
    opts: &TransientOptions,
) -> ReactorResult<TransientResult> {
    let (kind, _) = catalog.lookup(reactor)?;
    simulate(catalog, kind, profile, time_span, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::KEEPIN_U235;
    use crate::reactivity::{ConstantReactivity, StepInsertion};
    use nrgs_ode::{DEFAULT_FD_EPSILON, central_difference_jacobian};

    #[test]
    fn equilibrium_state_has_zero_derivative() {
        let cfg = ReactorTypeConfig {
            alpha_fuel: 0.0,
            alpha_coolant: 0.0,
            ..ReactorTypeConfig::SMR
        };
        let profile = ConstantReactivity(0.0);
        let model = PointKinetics::new(&KEEPIN_U235, &cfg, &profile);
        let y = model.initial_state(1.0, InitialPrecursors::Equilibrium);
        let dy = model.rhs(0.0, &y).unwrap();
        for i in 0..=NUM_GROUPS {
            assert!(dy[i].abs() < 1e-9, "component {i}: {}", dy[i]);
        }
    }

    #[test]
    fn zero_precursor_start() {
        let profile = ConstantReactivity(0.0);
        let model = PointKinetics::new(&KEEPIN_U235, &ReactorTypeConfig::PWR, &profile);
        let y = model.initial_state(1.0, InitialPrecursors::Zero);
        assert_eq!(y.len(), STATE_DIM);
        assert_eq!(y[0], 1.0);
        assert!((1..=NUM_GROUPS).all(|i| y[i] == 0.0));
        assert_eq!(y[IDX_TF], 850.0);
        assert_eq!(y[IDX_TC], 580.0);
        assert_eq!(model.reactivity(0.0, &y), (0.0, 0.0, 0.0));
    }

    #[test]
    fn analytic_jacobian_matches_finite_difference() {
        let profile = StepInsertion::default();
        let model = PointKinetics::new(&KEEPIN_U235, &ReactorTypeConfig::SMR, &profile);
        let mut y = model.initial_state(1.2, InitialPrecursors::Equilibrium);
        y[IDX_TF] += 15.0;
        y[IDX_TC] -= 4.0;

        let t = 6.0;
        let analytic = model.jacobian(t, &y).unwrap();
        let numeric =
            central_difference_jacobian(&y, |x| model.rhs(t, x), DEFAULT_FD_EPSILON).unwrap();

        for r in 0..STATE_DIM {
            for c in 0..STATE_DIM {
                let a = analytic[(r, c)];
                let n = numeric[(r, c)];
                let scale = a.abs().max(1.0);
                assert!(
                    (a - n).abs() <= 1e-4 * scale,
                    "J[{r},{c}]: analytic {a}, numeric {n}"
                );
            }
        }
    }

    #[test]
    fn run_validation() {
        let cat = ReactorCatalog::builtin();
        let profile = ConstantReactivity(0.0);
        let opts = TransientOptions::default();

        let err = simulate(&cat, ReactorKind::Smr, &profile, (5.0, 5.0), &opts).unwrap_err();
        assert!(matches!(err, ReactorError::Validation { .. }));

        let err = simulate(
            &cat,
            ReactorKind::Smr,
            &profile,
            (0.0, f64::INFINITY),
            &opts,
        )
        .unwrap_err();
        assert!(matches!(err, ReactorError::Validation { .. }));

        let bad = TransientOptions { samples: 1, ..opts };
        let err = simulate(&cat, ReactorKind::Smr, &profile, (0.0, 1.0), &bad).unwrap_err();
        assert!(matches!(err, ReactorError::Validation { .. }));

        for p0 in [-1.0, 0.0, f64::NAN] {
            let bad = TransientOptions { p0, ..opts };
            let err = simulate(&cat, ReactorKind::Smr, &profile, (0.0, 1.0), &bad).unwrap_err();
            assert!(matches!(err, ReactorError::Validation { .. }), "p0 = {p0}");
        }
    }
}
