use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArgument { what: String },
}

impl CoreError {
    pub fn invalid_argument(what: impl Into<String>) -> Self {
        CoreError::InvalidArgument { what: what.into() }
    }
}
