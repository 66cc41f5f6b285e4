//! Error types for ODE integration.

use thiserror::Error;

/// Errors encountered while integrating an initial value problem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OdeError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("State dimension mismatch: system has {expected} states, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Non-finite derivative at t = {t}")]
    NonFinite { t: f64 },

    #[error("Required step size fell below the minimum at t = {t}")]
    StepTooSmall { t: f64 },

    #[error("Step budget of {max_steps} exhausted at t = {t}")]
    MaxStepsExceeded { t: f64, max_steps: usize },

    #[error("Right-hand side failed at t = {t}: {message}")]
    Rhs { t: f64, message: String },
}

impl OdeError {
    /// Time at which integration failed, when known.
    pub fn failing_time(&self) -> Option<f64> {
        match self {
            OdeError::NonFinite { t }
            | OdeError::StepTooSmall { t }
            | OdeError::MaxStepsExceeded { t, .. }
            | OdeError::Rhs { t, .. } => Some(*t),
            OdeError::InvalidArg { .. } | OdeError::DimensionMismatch { .. } => None,
        }
    }
}

pub type OdeResult<T> = Result<T, OdeError>;
