//! Project validation logic.

use std::collections::HashSet;

use crate::schema::{GridProject, PROJECT_VERSION, ReactorDef, SourceDef, ThermalDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing section: {what}")]
    Missing { what: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: String, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn check_non_negative(field: impl FnOnce() -> String, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field(), value, "must be finite and non-negative"));
    }
    Ok(())
}

fn check_positive(field: impl FnOnce() -> String, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field(), value, "must be positive and finite"));
    }
    Ok(())
}

fn check_finite(field: impl FnOnce() -> String, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(invalid(field(), value, "must be finite"));
    }
    Ok(())
}

pub fn validate_project(project: &GridProject) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > PROJECT_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    if project.sources.is_empty() {
        return Err(ValidationError::Missing {
            what: "at least one generation source is required".to_string(),
        });
    }

    let mut source_names = HashSet::new();
    for source in &project.sources {
        if !source_names.insert(source.name.to_ascii_lowercase()) {
            return Err(ValidationError::DuplicateId {
                id: source.name.clone(),
                context: "sources".to_string(),
            });
        }
        validate_source(source)?;
    }

    for (name, &factor) in &project.emission_factors {
        check_non_negative(|| format!("emission factor '{name}'"), factor)?;
    }

    let mut reactor_ids = HashSet::new();
    for reactor in &project.reactors {
        if !reactor_ids.insert(reactor.id.to_ascii_uppercase()) {
            return Err(ValidationError::DuplicateId {
                id: reactor.id.clone(),
                context: "reactors".to_string(),
            });
        }
        validate_reactor(reactor)?;
    }

    if let Some(path) = &project.load_profile
        && path.trim().is_empty()
    {
        return Err(ValidationError::InvalidValue {
            field: "load_profile".to_string(),
            value: path.clone(),
            reason: "path must not be empty".to_string(),
        });
    }

    Ok(())
}

fn validate_source(source: &SourceDef) -> Result<(), ValidationError> {
    if source.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "source name".to_string(),
            value: source.name.clone(),
            reason: "must not be empty".to_string(),
        });
    }
    check_non_negative(
        || format!("source '{}' capacity_mw", source.name),
        source.capacity_mw,
    )?;
    check_non_negative(
        || format!("source '{}' variable_cost_usd_per_mwh", source.name),
        source.variable_cost_usd_per_mwh,
    )
}

fn validate_reactor(reactor: &ReactorDef) -> Result<(), ValidationError> {
    let id = &reactor.id;
    check_positive(
        || format!("reactor '{id}' lambda_prompt_s"),
        reactor.lambda_prompt_s,
    )?;
    check_finite(
        || format!("reactor '{id}' alpha_fuel_per_c"),
        reactor.alpha_fuel_per_c,
    )?;
    check_finite(
        || format!("reactor '{id}' alpha_coolant_per_c"),
        reactor.alpha_coolant_per_c,
    )?;
    check_finite(|| format!("reactor '{id}' t_fuel0_c"), reactor.t_fuel0_c)?;
    check_finite(
        || format!("reactor '{id}' t_coolant0_c"),
        reactor.t_coolant0_c,
    )?;
    if let Some(thermal) = &reactor.thermal {
        validate_thermal(id, thermal)?;
    }
    Ok(())
}

fn validate_thermal(id: &str, thermal: &ThermalDef) -> Result<(), ValidationError> {
    check_non_negative(
        || format!("reactor '{id}' thermal k_power_w"),
        thermal.k_power_w,
    )?;
    check_non_negative(
        || format!("reactor '{id}' thermal h_w_per_c"),
        thermal.h_w_per_c,
    )?;
    check_positive(
        || format!("reactor '{id}' thermal c_fuel_j_per_c"),
        thermal.c_fuel_j_per_c,
    )?;
    check_positive(
        || format!("reactor '{id}' thermal c_coolant_j_per_c"),
        thermal.c_coolant_j_per_c,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> GridProject {
        let mut p = GridProject::new("Test");
        p.sources.push(SourceDef {
            name: "hydro".to_string(),
            capacity_mw: 800.0,
            variable_cost_usd_per_mwh: 5.0,
        });
        p
    }

    #[test]
    fn minimal_project_validates() {
        validate_project(&project()).unwrap();
    }

    #[test]
    fn duplicate_sources_rejected_case_insensitively() {
        let mut p = project();
        p.sources.push(SourceDef {
            name: "Hydro".to_string(),
            capacity_mw: 1.0,
            variable_cost_usd_per_mwh: 1.0,
        });
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn negative_capacity_rejected() {
        let mut p = project();
        p.sources[0].capacity_mw = -5.0;
        let err = validate_project(&p).unwrap_err();
        assert!(err.to_string().contains("capacity_mw"));
    }

    #[test]
    fn version_checked() {
        let mut p = project();
        p.version = PROJECT_VERSION + 1;
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn empty_sources_rejected() {
        let p = GridProject::new("Empty");
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::Missing { .. })
        ));
    }

    #[test]
    fn reactor_overrides_checked() {
        let mut p = project();
        p.reactors.push(ReactorDef {
            id: "SMR".to_string(),
            lambda_prompt_s: 5e-5,
            alpha_fuel_per_c: -1.2e-5,
            alpha_coolant_per_c: -1.0e-5,
            t_fuel0_c: 750.0,
            t_coolant0_c: 550.0,
            thermal: Some(ThermalDef {
                k_power_w: 1e9,
                h_w_per_c: 1.5e7,
                c_fuel_j_per_c: 0.0,
                c_coolant_j_per_c: 5e6,
            }),
        });
        let err = validate_project(&p).unwrap_err();
        assert!(err.to_string().contains("c_fuel_j_per_c"));

        p.reactors[0].thermal = None;
        validate_project(&p).unwrap();

        p.reactors[0].lambda_prompt_s = 0.0;
        assert!(validate_project(&p).is_err());
    }

    #[test]
    fn emission_factor_must_be_non_negative() {
        let mut p = project();
        p.emission_factors.insert("hydro".to_string(), f64::NAN);
        assert!(validate_project(&p).is_err());
    }
}
