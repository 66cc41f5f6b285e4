use thiserror::Error;

pub type GridResult<T> = Result<T, GridError>;

/// Errors raised by dispatch and its scenario modifiers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Source configuration error: {what}")]
    Configuration { what: String },

    #[error("Invalid input: {what}")]
    Validation { what: String },

    #[error("Dispatch computation failed: {what}")]
    Computation { what: String },
}

impl GridError {
    pub(crate) fn configuration(what: impl Into<String>) -> Self {
        GridError::Configuration { what: what.into() }
    }

    pub(crate) fn validation(what: impl Into<String>) -> Self {
        GridError::Validation { what: what.into() }
    }

    pub(crate) fn computation(what: impl Into<String>) -> Self {
        GridError::Computation { what: what.into() }
    }
}
