//! Canned reactor transients.

use crate::error::{ReactorError, ReactorResult};
use crate::kinetics::{TransientOptions, simulate};
use crate::params::{ReactorCatalog, ReactorKind};
use crate::reactivity::{LoadFollowingRamp, StepInsertion};
use crate::transient::TransientResult;

/// Time span of the step-insertion transient (s).
pub const STEP_INSERTION_SPAN: (f64, f64) = (0.0, 30.0);

/// Time span of the load-following transient (s).
pub const LOAD_FOLLOWING_SPAN: (f64, f64) = (0.0, 120.0);

/// Step reactivity insertion of `rho_step` at `t_insert`.
pub fn step_reactivity_insertion(
    catalog: &ReactorCatalog,
    kind: ReactorKind,
    step: StepInsertion,
    opts: &TransientOptions,
) -> ReactorResult<TransientResult> {
    if !step.rho_step.is_finite() || !step.t_insert.is_finite() {
        return Err(ReactorError::validation(format!(
            "step insertion parameters must be finite (rho = {}, t = {})",
            step.rho_step, step.t_insert
        )));
    }
    simulate(catalog, kind, &step, STEP_INSERTION_SPAN, opts)
}

/// Ramp reactivity toward a new power level over `ramp_time`.
pub fn load_following(
    catalog: &ReactorCatalog,
    kind: ReactorKind,
    ramp: LoadFollowingRamp,
    opts: &TransientOptions,
) -> ReactorResult<TransientResult> {
    if !ramp.ramp_time.is_finite() || ramp.ramp_time <= 0.0 {
        return Err(ReactorError::validation(format!(
            "ramp time must be finite and > 0 (got {})",
            ramp.ramp_time
        )));
    }
    if !ramp.target_power_ratio.is_finite() {
        return Err(ReactorError::validation(format!(
            "target power ratio must be finite (got {})",
            ramp.target_power_ratio
        )));
    }
    simulate(catalog, kind, &ramp, LOAD_FOLLOWING_SPAN, opts)
}
