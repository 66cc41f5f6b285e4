//! Project schema definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current project file version.
pub const PROJECT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridProject {
    pub version: u32,
    pub name: String,
    /// Generation sources in declaration order (merit-order tie-break order)
    #[serde(default)]
    pub sources: Vec<SourceDef>,
    /// Lifecycle emission factors, gCO2eq/kWh, keyed by source name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub emission_factors: BTreeMap<String, f64>,
    /// Overrides for built-in reactor variants
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactors: Vec<ReactorDef>,
    /// CSV with an hourly `load_mw` column, relative to the project file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_profile: Option<String>,
}

impl GridProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: PROJECT_VERSION,
            name: name.into(),
            sources: Vec::new(),
            emission_factors: BTreeMap::new(),
            reactors: Vec::new(),
            load_profile: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceDef {
    pub name: String,
    pub capacity_mw: f64,
    pub variable_cost_usd_per_mwh: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactorDef {
    /// Variant identifier ("PWR", "SMR")
    pub id: String,
    pub lambda_prompt_s: f64,
    pub alpha_fuel_per_c: f64,
    pub alpha_coolant_per_c: f64,
    pub t_fuel0_c: f64,
    pub t_coolant0_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal: Option<ThermalDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThermalDef {
    pub k_power_w: f64,
    pub h_w_per_c: f64,
    pub c_fuel_j_per_c: f64,
    pub c_coolant_j_per_c: f64,
}
