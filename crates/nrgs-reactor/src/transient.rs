//! Sampled transient trajectories and summary metrics.

use serde::Serialize;

use crate::params::ReactorKind;

/// One output sample of a transient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TransientSample {
    /// Time (s)
    pub t: f64,
    /// Normalized power
    pub power: f64,
    pub rho_ext: f64,
    pub rho_fb: f64,
    pub rho_total: f64,
    /// Fuel temperature (°C)
    pub t_fuel: f64,
    /// Coolant temperature (°C)
    pub t_coolant: f64,
}

/// Uniformly sampled reactor trajectory. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransientResult {
    reactor: ReactorKind,
    samples: Vec<TransientSample>,
}

impl TransientResult {
    pub(crate) fn new(reactor: ReactorKind, samples: Vec<TransientSample>) -> Self {
        Self { reactor, samples }
    }

    pub fn reactor(&self) -> ReactorKind {
        self.reactor
    }

    pub fn samples(&self) -> &[TransientSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    pub fn power(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.power).collect()
    }

    /// Sample closest to `t`.
    pub fn sample_near(&self, t: f64) -> Option<&TransientSample> {
        self.samples
            .iter()
            .min_by(|a, b| (a.t - t).abs().total_cmp(&(b.t - t).abs()))
    }

    pub fn metrics(&self) -> TransientMetrics {
        TransientMetrics::from_samples(&self.samples)
    }
}

/// Summary figures of a transient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TransientMetrics {
    pub peak_power: f64,
    pub t_peak_power: f64,
    pub min_power: f64,
    pub final_power: f64,
    /// `(peak_power - 1) * 100` when the peak exceeds nominal, else 0
    pub peak_overshoot_pct: f64,
    pub peak_fuel_temp: f64,
    pub peak_coolant_temp: f64,
}

impl TransientMetrics {
    pub fn from_samples(samples: &[TransientSample]) -> Self {
        let Some(first) = samples.first() else {
            return Self::default();
        };

        let mut m = Self {
            peak_power: first.power,
            t_peak_power: first.t,
            min_power: first.power,
            final_power: first.power,
            peak_overshoot_pct: 0.0,
            peak_fuel_temp: first.t_fuel,
            peak_coolant_temp: first.t_coolant,
        };
        for s in &samples[1..] {
            if s.power > m.peak_power {
                m.peak_power = s.power;
                m.t_peak_power = s.t;
            }
            m.min_power = m.min_power.min(s.power);
            m.peak_fuel_temp = m.peak_fuel_temp.max(s.t_fuel);
            m.peak_coolant_temp = m.peak_coolant_temp.max(s.t_coolant);
            m.final_power = s.power;
        }
        if m.peak_power > 1.0 {
            m.peak_overshoot_pct = (m.peak_power - 1.0) * 100.0;
        }
        m
    }
}
