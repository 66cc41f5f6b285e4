//! Project loading, saving, validation, and introspection.

use std::path::Path;

use nrgs_project::GridProject;

use crate::error::{AppError, AppResult};

/// One-line view of a project for listings.
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub name: String,
    pub version: u32,
    pub source_count: usize,
    pub total_capacity_mw: f64,
    pub reactor_overrides: Vec<String>,
    pub load_profile: Option<String>,
}

/// Load a project file (YAML or JSON by extension); validated on load.
pub fn load_project(path: &Path) -> AppResult<GridProject> {
    Ok(nrgs_project::load_project(path)?)
}

/// Save project as YAML or JSON by extension.
pub fn save_project(path: &Path, project: &GridProject) -> AppResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => nrgs_project::save_json(path, project)?,
        _ => nrgs_project::save_yaml(path, project)?,
    }
    Ok(())
}

pub fn validate_project(project: &GridProject) -> AppResult<()> {
    nrgs_project::validate_project(project).map_err(|e| AppError::Project(e.to_string()))
}

pub fn summarize(project: &GridProject) -> ProjectSummary {
    ProjectSummary {
        name: project.name.clone(),
        version: project.version,
        source_count: project.sources.len(),
        total_capacity_mw: project.sources.iter().map(|s| s.capacity_mw).sum(),
        reactor_overrides: project.reactors.iter().map(|r| r.id.clone()).collect(),
        load_profile: project.load_profile.clone(),
    }
}

/// Hourly demand from the project's load profile, if one is declared.
pub fn load_demand(project_path: &Path, project: &GridProject) -> AppResult<Option<Vec<f64>>> {
    let Some(path) = nrgs_project::resolve_load_profile(project_path, project) else {
        return Ok(None);
    };
    read_demand_csv(&path).map(Some)
}

/// Hourly demand from a CSV with a `load_mw` column.
pub fn read_demand_csv(path: &Path) -> AppResult<Vec<f64>> {
    nrgs_project::read_load_profile(path).map_err(|e| AppError::LoadProfile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
