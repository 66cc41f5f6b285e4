//! Lumped thermal feedback model.

use crate::params::{ReactorTypeConfig, ThermalParams};

/// Fuel/coolant temperature feedback and heat balance for one reactor variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermalFeedback {
    pub alpha_fuel: f64,
    pub alpha_coolant: f64,
    pub t_fuel0: f64,
    pub t_coolant0: f64,
    pub thermal: ThermalParams,
}

impl From<&ReactorTypeConfig> for ThermalFeedback {
    fn from(cfg: &ReactorTypeConfig) -> Self {
        Self {
            alpha_fuel: cfg.alpha_fuel,
            alpha_coolant: cfg.alpha_coolant,
            t_fuel0: cfg.t_fuel0,
            t_coolant0: cfg.t_coolant0,
            thermal: cfg.thermal,
        }
    }
}

impl ThermalFeedback {
    /// Feedback reactivity; exactly zero at the reference temperatures.
    pub fn reactivity(&self, t_fuel: f64, t_coolant: f64) -> f64 {
        self.alpha_fuel * (t_fuel - self.t_fuel0)
            + self.alpha_coolant * (t_coolant - self.t_coolant0)
    }

    /// Fuel heats from power deposition and cools into the coolant.
    pub fn dtf_dt(&self, power: f64, t_fuel: f64, t_coolant: f64) -> f64 {
        let ThermalParams { k_power, h, c_fuel, .. } = self.thermal;
        (power * k_power - h * (t_fuel - t_coolant)) / c_fuel
    }

    /// Coolant warms only from fuel heat transfer.
    pub fn dtc_dt(&self, t_fuel: f64, t_coolant: f64) -> f64 {
        let ThermalParams { h, c_coolant, .. } = self.thermal;
        h * (t_fuel - t_coolant) / c_coolant
    }
}
