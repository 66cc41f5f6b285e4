//! Error types for reactor transient operations.

use nrgs_ode::OdeError;
use thiserror::Error;

/// Errors encountered while configuring or running a reactor transient.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReactorError {
    #[error("Reactor configuration error: {what}")]
    Configuration { what: String },

    #[error("Invalid parameter: {what}")]
    Validation { what: String },

    #[error("Unknown reactor type '{name}'. Choose from: {valid}")]
    UnknownReactor { name: String, valid: String },

    #[error("Integration failed: {what}")]
    Integration { t: Option<f64>, what: String },
}

pub type ReactorResult<T> = Result<T, ReactorError>;

impl ReactorError {
    pub(crate) fn validation(what: impl Into<String>) -> Self {
        ReactorError::Validation { what: what.into() }
    }

    pub(crate) fn configuration(what: impl Into<String>) -> Self {
        ReactorError::Configuration { what: what.into() }
    }
}

impl From<OdeError> for ReactorError {
    fn from(e: OdeError) -> Self {
        ReactorError::Integration {
            t: e.failing_time(),
            what: e.to_string(),
        }
    }
}

impl From<nrgs_core::CoreError> for ReactorError {
    fn from(e: nrgs_core::CoreError) -> Self {
        ReactorError::Validation {
            what: e.to_string(),
        }
    }
}
