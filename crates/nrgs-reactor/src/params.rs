//! Reactor parameter sets: delayed-neutron data and per-variant configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReactorError, ReactorResult};

/// Number of delayed-neutron precursor groups.
pub const NUM_GROUPS: usize = 6;

/// Six-group delayed-neutron fractions and decay constants.
///
/// `beta_total` is always derived from `beta`, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DelayedNeutronGroups {
    /// Delayed-neutron fraction per group (absolute reactivity units).
    pub beta: [f64; NUM_GROUPS],
    /// Precursor decay constant per group (1/s).
    pub lambda: [f64; NUM_GROUPS],
}

/// Keepin six-group data for thermal fission of U-235.
pub const KEEPIN_U235: DelayedNeutronGroups = DelayedNeutronGroups {
    beta: [0.000215, 0.001424, 0.001274, 0.002568, 0.000748, 0.000273],
    lambda: [0.0124, 0.0305, 0.111, 0.301, 1.14, 3.01],
};

impl Default for DelayedNeutronGroups {
    fn default() -> Self {
        KEEPIN_U235
    }
}

impl DelayedNeutronGroups {
    pub fn beta_total(&self) -> f64 {
        self.beta.iter().sum()
    }

    pub fn validate(&self) -> ReactorResult<()> {
        for (i, (&b, &l)) in self.beta.iter().zip(&self.lambda).enumerate() {
            if !b.is_finite() || b < 0.0 {
                return Err(ReactorError::configuration(format!(
                    "delayed-neutron fraction of group {} must be finite and >= 0 (got {b})",
                    i + 1
                )));
            }
            if !l.is_finite() || l <= 0.0 {
                return Err(ReactorError::configuration(format!(
                    "decay constant of group {} must be finite and > 0 (got {l})",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

/// Reactor variant identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReactorKind {
    #[serde(rename = "PWR")]
    Pwr,
    #[default]
    #[serde(rename = "SMR")]
    Smr,
}

impl ReactorKind {
    pub const ALL: [ReactorKind; 2] = [ReactorKind::Pwr, ReactorKind::Smr];

    /// Short identifier used in configuration files and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            ReactorKind::Pwr => "PWR",
            ReactorKind::Smr => "SMR",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ReactorKind::Pwr => "PWR (typical 1000 MW)",
            ReactorKind::Smr => "SMR (demo-friendly)",
        }
    }

    fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|k| k.id())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ReactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ReactorKind {
    type Err = ReactorError;

    /// Accepts the short id (case-insensitive) or the full label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let matches = |k: &ReactorKind| {
            trimmed.eq_ignore_ascii_case(k.id()) || trimmed == k.label()
        };
        Self::ALL
            .into_iter()
            .find(matches)
            .ok_or_else(|| ReactorError::UnknownReactor {
                name: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}

/// Lumped heat-balance constants.
///
/// - `k_power`: heat deposited in fuel per unit normalized power (W)
/// - `h`: fuel-to-coolant heat transfer coefficient (W/°C)
/// - `c_fuel`, `c_coolant`: heat capacities (J/°C)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThermalParams {
    pub k_power: f64,
    pub h: f64,
    pub c_fuel: f64,
    pub c_coolant: f64,
}

impl Default for ThermalParams {
    fn default() -> Self {
        Self {
            k_power: 1e9,
            h: 1.5e7,
            c_fuel: 1e7,
            c_coolant: 5e6,
        }
    }
}

impl ThermalParams {
    pub fn validate(&self) -> ReactorResult<()> {
        if !self.k_power.is_finite() || self.k_power < 0.0 {
            return Err(ReactorError::configuration(format!(
                "k_power must be finite and >= 0 (got {})",
                self.k_power
            )));
        }
        if !self.h.is_finite() || self.h < 0.0 {
            return Err(ReactorError::configuration(format!(
                "heat transfer coefficient must be finite and >= 0 (got {})",
                self.h
            )));
        }
        for (what, v) in [("c_fuel", self.c_fuel), ("c_coolant", self.c_coolant)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(ReactorError::configuration(format!(
                    "{what} must be finite and > 0 (got {v})"
                )));
            }
        }
        Ok(())
    }
}

/// Parameters of one reactor variant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactorTypeConfig {
    /// Prompt neutron generation time (s)
    pub lambda_prompt: f64,
    /// Fuel temperature coefficient (reactivity per °C)
    pub alpha_fuel: f64,
    /// Coolant temperature coefficient (reactivity per °C)
    pub alpha_coolant: f64,
    /// Reference and initial fuel temperature (°C)
    pub t_fuel0: f64,
    /// Reference and initial coolant temperature (°C)
    pub t_coolant0: f64,
    #[serde(default)]
    pub thermal: ThermalParams,
}

impl ReactorTypeConfig {
    pub const PWR: ReactorTypeConfig = ReactorTypeConfig {
        lambda_prompt: 1e-4,
        alpha_fuel: -2.5e-5,
        alpha_coolant: -2.0e-5,
        t_fuel0: 850.0,
        t_coolant0: 580.0,
        thermal: ThermalParams {
            k_power: 1e9,
            h: 1.5e7,
            c_fuel: 1e7,
            c_coolant: 5e6,
        },
    };

    pub const SMR: ReactorTypeConfig = ReactorTypeConfig {
        lambda_prompt: 5e-5,
        alpha_fuel: -1.2e-5,
        alpha_coolant: -1.0e-5,
        t_fuel0: 750.0,
        t_coolant0: 550.0,
        thermal: ThermalParams {
            k_power: 1e9,
            h: 1.5e7,
            c_fuel: 1e7,
            c_coolant: 5e6,
        },
    };

    pub fn builtin(kind: ReactorKind) -> Self {
        match kind {
            ReactorKind::Pwr => Self::PWR,
            ReactorKind::Smr => Self::SMR,
        }
    }

    pub fn validate(&self) -> ReactorResult<()> {
        if !self.lambda_prompt.is_finite() || self.lambda_prompt <= 0.0 {
            return Err(ReactorError::configuration(format!(
                "prompt neutron generation time must be finite and > 0 (got {})",
                self.lambda_prompt
            )));
        }
        for (what, v) in [
            ("alpha_fuel", self.alpha_fuel),
            ("alpha_coolant", self.alpha_coolant),
            ("t_fuel0", self.t_fuel0),
            ("t_coolant0", self.t_coolant0),
        ] {
            if !v.is_finite() {
                return Err(ReactorError::configuration(format!(
                    "{what} must be finite (got {v})"
                )));
            }
        }
        self.thermal.validate()
    }
}

/// Immutable reactor configuration store.
///
/// Built once (from the built-in data or a project file) and passed by
/// reference into the kinetics engine.
#[derive(Clone, Debug, PartialEq)]
pub struct ReactorCatalog {
    groups: DelayedNeutronGroups,
    reactors: BTreeMap<ReactorKind, ReactorTypeConfig>,
}

impl Default for ReactorCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReactorCatalog {
    /// Keepin U-235 data with the PWR and SMR reference variants.
    pub fn builtin() -> Self {
        let reactors = ReactorKind::ALL
            .into_iter()
            .map(|k| (k, ReactorTypeConfig::builtin(k)))
            .collect();
        Self {
            groups: KEEPIN_U235,
            reactors,
        }
    }

    pub fn with_groups(mut self, groups: DelayedNeutronGroups) -> ReactorResult<Self> {
        groups.validate()?;
        self.groups = groups;
        Ok(self)
    }

    /// Replace the parameters of one variant.
    pub fn with_reactor(
        mut self,
        kind: ReactorKind,
        config: ReactorTypeConfig,
    ) -> ReactorResult<Self> {
        config.validate()?;
        self.reactors.insert(kind, config);
        Ok(self)
    }

    pub fn groups(&self) -> &DelayedNeutronGroups {
        &self.groups
    }

    pub fn kinds(&self) -> impl Iterator<Item = ReactorKind> + '_ {
        self.reactors.keys().copied()
    }

    pub fn get(&self, kind: ReactorKind) -> ReactorResult<&ReactorTypeConfig> {
        self.reactors
            .get(&kind)
            .ok_or_else(|| {
                ReactorError::configuration(format!("no parameters for reactor {kind}"))
            })
    }

    /// Resolve a reactor identifier or label.
    pub fn lookup(&self, name: &str) -> ReactorResult<(ReactorKind, &ReactorTypeConfig)> {
        let kind: ReactorKind = name.parse()?;
        Ok((kind, self.get(kind)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beta_total_is_sum_of_groups() {
        let g = KEEPIN_U235;
        let manual: f64 = g.beta.iter().sum();
        assert_eq!(g.beta_total(), manual);
        assert!((g.beta_total() - 0.006502).abs() < 1e-12);
    }

    #[test]
    fn beta_total_tracks_modified_groups() {
        let mut g = KEEPIN_U235;
        g.beta[0] += 0.001;
        assert!((g.beta_total() - 0.007502).abs() < 1e-12);
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("PWR".parse::<ReactorKind>().unwrap(), ReactorKind::Pwr);
        assert_eq!("smr".parse::<ReactorKind>().unwrap(), ReactorKind::Smr);
        assert_eq!(
            "SMR (demo-friendly)".parse::<ReactorKind>().unwrap(),
            ReactorKind::Smr
        );
        assert_eq!(
            "PWR (typical 1000 MW)".parse::<ReactorKind>().unwrap(),
            ReactorKind::Pwr
        );
        assert_eq!(ReactorKind::default(), ReactorKind::Smr);
    }

    #[test]
    fn unknown_kind_lists_choices() {
        let err = "BWR".parse::<ReactorKind>().unwrap_err();
        match err {
            ReactorError::UnknownReactor { name, valid } => {
                assert_eq!(name, "BWR");
                assert_eq!(valid, "PWR, SMR");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn builtin_catalog_holds_reference_data() {
        let cat = ReactorCatalog::builtin();
        let (kind, pwr) = cat.lookup("PWR").unwrap();
        assert_eq!(kind, ReactorKind::Pwr);
        assert_eq!(pwr.lambda_prompt, 1e-4);
        assert_eq!(pwr.t_fuel0, 850.0);
        let smr = cat.get(ReactorKind::Smr).unwrap();
        assert_eq!(smr.alpha_coolant, -1.0e-5);
        assert_eq!(smr.thermal, ThermalParams::default());
        assert_eq!(cat.kinds().count(), 2);
    }

    #[test]
    fn override_is_validated() {
        let bad = ReactorTypeConfig {
            lambda_prompt: 0.0,
            ..ReactorTypeConfig::SMR
        };
        let err = ReactorCatalog::builtin()
            .with_reactor(ReactorKind::Smr, bad)
            .unwrap_err();
        assert!(matches!(err, ReactorError::Configuration { .. }));

        let bad_thermal = ReactorTypeConfig {
            thermal: ThermalParams {
                c_fuel: -1.0,
                ..ThermalParams::default()
            },
            ..ReactorTypeConfig::PWR
        };
        assert!(bad_thermal.validate().is_err());
    }

    #[test]
    fn override_replaces_variant() {
        let custom = ReactorTypeConfig {
            t_fuel0: 900.0,
            ..ReactorTypeConfig::PWR
        };
        let cat = ReactorCatalog::builtin()
            .with_reactor(ReactorKind::Pwr, custom)
            .unwrap();
        assert_eq!(cat.get(ReactorKind::Pwr).unwrap().t_fuel0, 900.0);
        assert_eq!(
            ReactorCatalog::builtin().get(ReactorKind::Pwr).unwrap().t_fuel0,
            850.0
        );
    }
}
