//! Integration tests: BDF solver on reference problems.
//!
//! - linear decay (exact solution, dense sampling)
//! - harmonic oscillator (non-stiff, oscillatory)
//! - Robertson chemical kinetics (classic stiff benchmark)
//! - failure reporting (step budget, bad sample times)

use nalgebra::DVector;
use nrgs_core::linspace;
use nrgs_ode::{FnSystem, OdeError, OdeOptions, solve_ivp};

#[test]
fn linear_decay_matches_exact_solution_at_samples() {
    let k = 0.5;
    let sys = FnSystem::new(1, move |_t: f64, y: &DVector<f64>| y * -k);
    let t_eval = linspace(0.0, 10.0, 101);

    let sol = solve_ivp(
        &sys,
        (0.0, 10.0),
        DVector::from_element(1, 2.0),
        &t_eval,
        &OdeOptions::default(),
    )
    .unwrap();

    assert_eq!(sol.t.len(), 101);
    assert_eq!(sol.y[0][0], 2.0);
    for (t, y) in sol.t.iter().zip(&sol.y) {
        let exact = 2.0 * (-k * t).exp();
        assert!(
            (y[0] - exact).abs() < 1e-6,
            "t={t}: got {}, expected {exact}",
            y[0]
        );
    }
}

#[test]
fn harmonic_oscillator_returns_after_one_period() {
    let sys = FnSystem::new(2, |_t: f64, y: &DVector<f64>| {
        DVector::from_vec(vec![y[1], -y[0]])
    });
    let period = 2.0 * std::f64::consts::PI;

    let sol = solve_ivp(
        &sys,
        (0.0, period),
        DVector::from_vec(vec![1.0, 0.0]),
        &[period / 2.0, period],
        &OdeOptions::default(),
    )
    .unwrap();

    let half = &sol.y[0];
    assert!((half[0] + 1.0).abs() < 1e-4);
    let end = &sol.y[1];
    assert!((end[0] - 1.0).abs() < 1e-4);
    assert!(end[1].abs() < 1e-4);
}

#[test]
fn robertson_stiff_system() {
    let sys = FnSystem::new(3, |_t: f64, y: &DVector<f64>| {
        DVector::from_vec(vec![
            -0.04 * y[0] + 1e4 * y[1] * y[2],
            0.04 * y[0] - 1e4 * y[1] * y[2] - 3e7 * y[1] * y[1],
            3e7 * y[1] * y[1],
        ])
    });
    let opts = OdeOptions {
        rtol: 1e-6,
        atol: 1e-10,
        ..OdeOptions::default()
    };

    let sol = solve_ivp(
        &sys,
        (0.0, 40.0),
        DVector::from_vec(vec![1.0, 0.0, 0.0]),
        &[40.0],
        &opts,
    )
    .unwrap();

    let y = &sol.y[0];
    assert!((y[0] - 0.715_827_1).abs() < 1e-4, "y1 = {}", y[0]);
    assert!((y[1] - 9.185_5e-6).abs() < 1e-7, "y2 = {}", y[1]);
    assert!((y[2] - 0.284_163_7).abs() < 1e-4, "y3 = {}", y[2]);
    assert!((y.sum() - 1.0).abs() < 1e-5);

    // A stiff problem should need far fewer steps than an explicit method would.
    assert!(sol.stats.accepted_steps < 5_000);
}

#[test]
fn step_budget_exhaustion_is_an_error() {
    let sys = FnSystem::new(1, |_t: f64, y: &DVector<f64>| -y);
    let opts = OdeOptions {
        max_step: 0.01,
        max_steps: 3,
        ..OdeOptions::default()
    };

    let err = solve_ivp(
        &sys,
        (0.0, 1.0),
        DVector::from_element(1, 1.0),
        &[1.0],
        &opts,
    )
    .unwrap_err();

    match err {
        OdeError::MaxStepsExceeded { t, max_steps } => {
            assert_eq!(max_steps, 3);
            assert!(t > 0.0 && t < 1.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_samples_outside_span() {
    let sys = FnSystem::new(1, |_t: f64, y: &DVector<f64>| -y);

    let err = solve_ivp(
        &sys,
        (0.0, 1.0),
        DVector::from_element(1, 1.0),
        &[0.5, 1.5],
        &OdeOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, OdeError::InvalidArg { .. }));

    let err = solve_ivp(
        &sys,
        (1.0, 1.0),
        DVector::from_element(1, 1.0),
        &[],
        &OdeOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, OdeError::InvalidArg { .. }));
}

#[test]
fn non_finite_derivative_is_reported_with_time() {
    let sys = FnSystem::new(1, |_t: f64, _y: &DVector<f64>| {
        DVector::from_element(1, f64::NAN)
    });

    let err = solve_ivp(
        &sys,
        (0.0, 1.0),
        DVector::from_element(1, 1.0),
        &[1.0],
        &OdeOptions::default(),
    )
    .unwrap_err();

    assert_eq!(err, OdeError::NonFinite { t: 0.0 });
    assert_eq!(err.failing_time(), Some(0.0));
}
