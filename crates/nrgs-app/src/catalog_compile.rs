//! Compilation of a project file into engine catalogs.

use std::collections::BTreeMap;

use nrgs_grid::{EmissionFactors, GenerationSource, SourceCatalog, SourceKind};
use nrgs_project::GridProject;
use nrgs_project::schema::{ReactorDef, ThermalDef};
use nrgs_reactor::{ReactorCatalog, ReactorKind, ReactorTypeConfig, ThermalParams};

use crate::error::{AppError, AppResult};

/// Engine-ready configuration: immutable catalogs shared by every run.
#[derive(Debug, Clone)]
pub struct CompiledProject {
    pub name: String,
    pub sources: SourceCatalog,
    pub emission_factors: EmissionFactors,
    pub reactors: ReactorCatalog,
}

impl CompiledProject {
    /// Built-in Kenyan mix, IPCC emission factors and reference reactors.
    pub fn builtin() -> Self {
        Self {
            name: "Built-in Kenya baseline".to_string(),
            sources: SourceCatalog::kenya_baseline(),
            emission_factors: EmissionFactors::ipcc_median(),
            reactors: ReactorCatalog::builtin(),
        }
    }
}

pub fn compile_project(project: &GridProject) -> AppResult<CompiledProject> {
    Ok(CompiledProject {
        name: project.name.clone(),
        sources: compile_sources(project)?,
        emission_factors: compile_emission_factors(project)?,
        reactors: compile_reactors(project)?,
    })
}

/// Sources keep their declaration order.
pub fn compile_sources(project: &GridProject) -> AppResult<SourceCatalog> {
    let sources = project
        .sources
        .iter()
        .map(|def| {
            let kind = def.name.parse::<SourceKind>().map_err(compile_err)?;
            Ok(GenerationSource::new(
                kind,
                def.capacity_mw,
                def.variable_cost_usd_per_mwh,
            ))
        })
        .collect::<AppResult<Vec<_>>>()?;
    SourceCatalog::new(sources).map_err(compile_err)
}

/// Falls back to the IPCC medians when the project declares no factors.
pub fn compile_emission_factors(project: &GridProject) -> AppResult<EmissionFactors> {
    if project.emission_factors.is_empty() {
        return Ok(EmissionFactors::ipcc_median());
    }
    let mut factors = BTreeMap::new();
    for (name, &g) in &project.emission_factors {
        let kind = name.parse::<SourceKind>().map_err(compile_err)?;
        factors.insert(kind, g);
    }
    EmissionFactors::new(factors).map_err(compile_err)
}

/// Built-in reactors with the project's overrides applied.
pub fn compile_reactors(project: &GridProject) -> AppResult<ReactorCatalog> {
    let mut catalog = ReactorCatalog::builtin();
    for def in &project.reactors {
        let kind = def.id.parse::<ReactorKind>().map_err(compile_err)?;
        catalog = catalog
            .with_reactor(kind, reactor_config(def))
            .map_err(compile_err)?;
    }
    Ok(catalog)
}

fn compile_err(e: impl std::fmt::Display) -> AppError {
    AppError::Compile(e.to_string())
}

fn reactor_config(def: &ReactorDef) -> ReactorTypeConfig {
    ReactorTypeConfig {
        lambda_prompt: def.lambda_prompt_s,
        alpha_fuel: def.alpha_fuel_per_c,
        alpha_coolant: def.alpha_coolant_per_c,
        t_fuel0: def.t_fuel0_c,
        t_coolant0: def.t_coolant0_c,
        thermal: def.thermal.as_ref().map(thermal_params).unwrap_or_default(),
    }
}

fn thermal_params(def: &ThermalDef) -> ThermalParams {
    ThermalParams {
        k_power: def.k_power_w,
        h: def.h_w_per_c,
        c_fuel: def.c_fuel_j_per_c,
        c_coolant: def.c_coolant_j_per_c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrgs_project::schema::SourceDef;

    fn project() -> GridProject {
        let mut p = GridProject::new("Compile");
        p.sources = vec![
            SourceDef {
                name: "Thermal".to_string(),
                capacity_mw: 300.0,
                variable_cost_usd_per_mwh: 150.0,
            },
            SourceDef {
                name: "hydro".to_string(),
                capacity_mw: 500.0,
                variable_cost_usd_per_mwh: 4.0,
            },
        ];
        p
    }

    #[test]
    fn sources_keep_declaration_order() {
        let cat = compile_sources(&project()).unwrap();
        let kinds: Vec<SourceKind> = cat.sources().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SourceKind::Thermal, SourceKind::Hydro]);
    }

    #[test]
    fn unknown_source_is_a_compile_error() {
        let mut p = project();
        p.sources[0].name = "coal".to_string();
        let err = compile_sources(&p).unwrap_err();
        assert!(matches!(err, AppError::Compile(_)));
        assert!(err.to_string().contains("coal"));
    }

    #[test]
    fn default_emission_factors() {
        let f = compile_emission_factors(&project()).unwrap();
        assert_eq!(f, EmissionFactors::ipcc_median());

        let mut p = project();
        p.emission_factors.insert("hydro".to_string(), 4.0);
        let f = compile_emission_factors(&p).unwrap();
        assert_eq!(f.get(SourceKind::Hydro), Some(4.0));
        assert_eq!(f.get(SourceKind::Thermal), None);
    }

    #[test]
    fn reactor_override_applies() {
        let mut p = project();
        p.reactors.push(ReactorDef {
            id: "pwr".to_string(),
            lambda_prompt_s: 2e-4,
            alpha_fuel_per_c: -3e-5,
            alpha_coolant_per_c: -2e-5,
            t_fuel0_c: 900.0,
            t_coolant0_c: 590.0,
            thermal: None,
        });
        let cat = compile_reactors(&p).unwrap();
        let pwr = cat.get(ReactorKind::Pwr).unwrap();
        assert_eq!(pwr.lambda_prompt, 2e-4);
        assert_eq!(pwr.thermal, ThermalParams::default());
        assert_eq!(cat.get(ReactorKind::Smr).unwrap(), &ReactorTypeConfig::SMR);

        p.reactors[0].id = "CANDU".to_string();
        assert!(matches!(compile_reactors(&p), Err(AppError::Compile(_))));
    }
}
