//! Integration tests: reactor transients end to end.
//!
//! - step insertion and load-following scenarios on the built-in variants
//! - critical core at equilibrium holds power
//! - prompt jump under a small positive step without feedback
//! - lookup and validation failures

use nrgs_reactor::{
    ConstantReactivity, InitialPrecursors, LoadFollowingRamp, ReactorCatalog, ReactorError,
    ReactorKind, ReactorTypeConfig, StepInsertion, TransientOptions, load_following, simulate,
    simulate_named, step_reactivity_insertion,
};

fn catalog_without_feedback() -> ReactorCatalog {
    let cfg = ReactorTypeConfig {
        alpha_fuel: 0.0,
        alpha_coolant: 0.0,
        ..ReactorTypeConfig::SMR
    };
    ReactorCatalog::builtin()
        .with_reactor(ReactorKind::Smr, cfg)
        .unwrap()
}

#[test]
fn step_insertion_on_smr() {
    let cat = ReactorCatalog::builtin();
    let result = step_reactivity_insertion(
        &cat,
        ReactorKind::Smr,
        StepInsertion::default(),
        &TransientOptions::default(),
    )
    .unwrap();

    assert_eq!(result.len(), 1000);
    assert_eq!(result.reactor(), ReactorKind::Smr);
    let samples = result.samples();
    assert_eq!(samples[0].t, 0.0);
    assert_eq!(samples[999].t, 30.0);
    assert_eq!(samples[0].power, 1.0);
    assert_eq!(samples[0].rho_fb, 0.0);

    for s in samples {
        assert!(
            s.power.is_finite() && s.power > 0.0,
            "P({}) = {}",
            s.t, s.power
        );
        let expected = if s.t < 5.0 { 0.0 } else { 0.005 };
        assert_eq!(s.rho_ext, expected, "rho_ext at t = {}", s.t);
        assert!((s.rho_total - (s.rho_ext + s.rho_fb)).abs() < 1e-15);
    }

    let before = samples.iter().rev().find(|s| s.t < 5.0).unwrap();
    let after = result.sample_near(5.5).unwrap();
    assert!(
        after.power > before.power,
        "power should rise after insertion: {} -> {}",
        before.power,
        after.power
    );
}

#[test]
fn load_following_on_pwr() {
    let cat = ReactorCatalog::builtin();
    let result = load_following(
        &cat,
        ReactorKind::Pwr,
        LoadFollowingRamp::default(),
        &TransientOptions::default(),
    )
    .unwrap();

    let samples = result.samples();
    assert_eq!(samples.len(), 1000);
    assert_eq!(samples[999].t, 120.0);
    assert!((samples[999].rho_ext - 0.003 * (0.8 - 1.0)).abs() < 1e-15);
    assert!(
        samples
            .iter()
            .all(|s| s.power.is_finite() && s.power > 0.0)
    );
    assert!(
        samples
            .iter()
            .all(|s| s.t_fuel.is_finite() && s.t_coolant.is_finite())
    );
}

#[test]
fn critical_core_holds_steady_power() {
    let cat = catalog_without_feedback();
    let opts = TransientOptions {
        samples: 101,
        initial_precursors: InitialPrecursors::Equilibrium,
        ..TransientOptions::default()
    };

    let result = simulate(
        &cat,
        ReactorKind::Smr,
        &ConstantReactivity(0.0),
        (0.0, 10.0),
        &opts,
    )
    .unwrap();

    for s in result.samples() {
        assert!((s.power - 1.0).abs() < 1e-6, "P({}) = {}", s.t, s.power);
    }
}

#[test]
fn small_positive_step_shows_prompt_jump_then_slow_rise() {
    let cat = catalog_without_feedback();
    let opts = TransientOptions {
        samples: 201,
        initial_precursors: InitialPrecursors::Equilibrium,
        ..TransientOptions::default()
    };

    // rho = 0.0005 against beta ~ 0.0065: prompt jump ~ beta / (beta - rho) ~ 1.08
    let result = simulate(
        &cat,
        ReactorKind::Smr,
        &ConstantReactivity(0.0005),
        (0.0, 20.0),
        &opts,
    )
    .unwrap();

    let at_one = result.sample_near(1.0).unwrap();
    assert!(
        at_one.power > 1.05 && at_one.power < 1.2,
        "P(1) = {}",
        at_one.power
    );
    let end = result.samples().last().unwrap();
    assert!(end.power > at_one.power);
}

#[test]
fn negative_step_drops_power() {
    let cat = catalog_without_feedback();
    let opts = TransientOptions {
        samples: 101,
        initial_precursors: InitialPrecursors::Equilibrium,
        ..TransientOptions::default()
    };

    let result = simulate(
        &cat,
        ReactorKind::Smr,
        &ConstantReactivity(-0.005),
        (0.0, 10.0),
        &opts,
    )
    .unwrap();

    let m = result.metrics();
    assert_eq!(m.peak_power, 1.0);
    assert_eq!(m.peak_overshoot_pct, 0.0);
    assert!(
        m.final_power > 0.0 && m.final_power < 0.6,
        "final P = {}",
        m.final_power
    );
}

#[test]
fn closures_and_labels_resolve() {
    let cat = ReactorCatalog::builtin();
    let opts = TransientOptions {
        samples: 11,
        ..TransientOptions::default()
    };
    let ramp = |t: f64| 1e-4 * t.min(1.0);

    let by_label = simulate_named(&cat, "SMR (demo-friendly)", &ramp, (0.0, 2.0), &opts).unwrap();
    let by_id = simulate_named(&cat, "SMR", &ramp, (0.0, 2.0), &opts).unwrap();
    assert_eq!(by_label, by_id);

    let pwr = simulate_named(&cat, "PWR", &ramp, (0.0, 2.0), &opts).unwrap();
    assert_ne!(pwr.samples()[10].t_fuel, by_id.samples()[10].t_fuel);
}

#[test]
fn unknown_reactor_is_rejected() {
    let err = simulate_named(
        &ReactorCatalog::builtin(),
        "RBMK",
        &ConstantReactivity(0.0),
        (0.0, 1.0),
        &TransientOptions::default(),
    )
    .unwrap_err();

    match err {
        ReactorError::UnknownReactor { name, valid } => {
            assert_eq!(name, "RBMK");
            assert!(valid.contains("PWR") && valid.contains("SMR"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn exhausted_step_budget_is_an_integration_error() {
    let mut opts = TransientOptions::default();
    opts.ode.max_steps = 5;

    let err = step_reactivity_insertion(
        &ReactorCatalog::builtin(),
        ReactorKind::Smr,
        StepInsertion::default(),
        &opts,
    )
    .unwrap_err();

    match err {
        ReactorError::Integration { t, .. } => assert!(t.is_some()),
        other => panic!("unexpected error: {other}"),
    }
}
