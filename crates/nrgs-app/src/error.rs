//! Error types for the nrgs-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the engine and project
/// crates behind one interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read load profile: {path}: {message}")]
    LoadProfile { path: PathBuf, message: String },

    #[error("Catalog compilation failed: {0}")]
    Compile(String),

    #[error("Dispatch error: {0}")]
    Grid(String),

    #[error("Reactor error: {0}")]
    Reactor(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for nrgs-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<nrgs_project::ProjectError> for AppError {
    fn from(err: nrgs_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<nrgs_grid::GridError> for AppError {
    fn from(err: nrgs_grid::GridError) -> Self {
        AppError::Grid(err.to_string())
    }
}

impl From<nrgs_reactor::ReactorError> for AppError {
    fn from(err: nrgs_reactor::ReactorError) -> Self {
        AppError::Reactor(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Export(err.to_string())
    }
}
