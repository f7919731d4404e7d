//! Error types for control-space construction.

use fp_core::CoreError;
use thiserror::Error;

/// Result type for control-space construction.
pub type ControlSpaceResult<T> = Result<T, ControlSpaceError>;

/// Why a control space could not be constructed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlSpaceError {
    /// A supplied scalar lies outside its declared range.
    #[error("Invalid argument: {what}")]
    InvalidArgument { what: String },

    /// A required field is missing or a paired-field rule is broken.
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: String },
}

impl ControlSpaceError {
    pub(crate) fn missing(field: &str) -> Self {
        ControlSpaceError::InvalidConfiguration {
            what: format!("{field} is required"),
        }
    }
}

impl From<CoreError> for ControlSpaceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArgument { what } => ControlSpaceError::InvalidArgument { what },
            other => ControlSpaceError::InvalidArgument {
                what: other.to_string(),
            },
        }
    }
}
