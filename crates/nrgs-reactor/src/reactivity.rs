//! External reactivity insertion profiles.

/// Time-dependent external reactivity (absolute units, Δk/k).
pub trait ReactivityProfile: Send + Sync {
    fn rho(&self, t: f64) -> f64;

    /// Short description for logs and reports.
    fn describe(&self) -> String {
        "custom reactivity profile".to_string()
    }
}

impl<F> ReactivityProfile for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn rho(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Constant reactivity for the whole transient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantReactivity(pub f64);

impl ReactivityProfile for ConstantReactivity {
    fn rho(&self, _t: f64) -> f64 {
        self.0
    }

    fn describe(&self) -> String {
        format!("constant rho = {:.5}", self.0)
    }
}

/// Zero before `t_insert`, `rho_step` from `t_insert` on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepInsertion {
    pub rho_step: f64,
    pub t_insert: f64,
}

impl Default for StepInsertion {
    fn default() -> Self {
        Self {
            rho_step: 0.005,
            t_insert: 5.0,
        }
    }
}

impl ReactivityProfile for StepInsertion {
    fn rho(&self, t: f64) -> f64 {
        if t < self.t_insert { 0.0 } else { self.rho_step }
    }

    fn describe(&self) -> String {
        format!("step rho = {:.5} at t = {} s", self.rho_step, self.t_insert)
    }
}

/// Linear reactivity ramp that saturates at `ramp_time`.
///
/// `rho(t) = GAIN * min(t / ramp_time, 1) * (target_power_ratio - 1)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadFollowingRamp {
    pub target_power_ratio: f64,
    pub ramp_time: f64,
}

impl LoadFollowingRamp {
    /// Reactivity per unit of requested power change.
    pub const GAIN: f64 = 0.003;
}

impl Default for LoadFollowingRamp {
    fn default() -> Self {
        Self {
            target_power_ratio: 0.8,
            ramp_time: 30.0,
        }
    }
}

impl ReactivityProfile for LoadFollowingRamp {
    fn rho(&self, t: f64) -> f64 {
        let progress = (t / self.ramp_time).min(1.0);
        Self::GAIN * progress * (self.target_power_ratio - 1.0)
    }

    fn describe(&self) -> String {
        format!(
            "load-follow to {:.0}% over {} s",
            self.target_power_ratio * 100.0,
            self.ramp_time
        )
    }
}
