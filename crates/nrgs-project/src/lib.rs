//! nrgs-project: project file format, validation and load profiles.

pub mod load_profile;
pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

pub use load_profile::{read_load_profile, write_load_profile};
pub use schema::*;
pub use validate::{ValidationError, validate_project};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Load profile row {row}: {what}")]
    LoadProfile { row: usize, what: String },

    #[error("Unsupported project file extension: {path}")]
    UnknownFormat { path: String },
}

pub fn load_yaml(path: &Path) -> ProjectResult<GridProject> {
    let content = std::fs::read_to_string(path)?;
    let project: GridProject = serde_yaml::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &Path, project: &GridProject) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<GridProject> {
    let content = std::fs::read_to_string(path)?;
    let project: GridProject = serde_json::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &Path, project: &GridProject) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, `.yaml`/`.yml` as YAML.
pub fn load_project(path: &Path) -> ProjectResult<GridProject> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        Some("yaml") | Some("yml") => load_yaml(path),
        _ => Err(ProjectError::UnknownFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Load-profile path resolved against the project file's directory.
pub fn resolve_load_profile(project_path: &Path, project: &GridProject) -> Option<PathBuf> {
    let rel = project.load_profile.as_ref()?;
    let rel = Path::new(rel);
    if rel.is_absolute() {
        return Some(rel.to_path_buf());
    }
    let base = project_path.parent().unwrap_or_else(|| Path::new("."));
    Some(base.join(rel))
}
