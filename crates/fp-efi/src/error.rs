//! Error types for the running-mode engine.

use fp_core::CoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type EfiResult<T> = Result<T, EfiError>;

/// Errors raised while installing a mode graph or answering queries against it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EfiError {
    /// Not enough messages have arrived to answer the query.
    #[error("Not yet known: {what}")]
    NotYetKnown { what: &'static str },

    /// A caller- or message-supplied scalar is out of its declared range.
    #[error("Invalid argument: {what}")]
    InvalidArgument { what: String },

    /// The mode graph sent by the device is structurally broken.
    #[error("Invalid mode graph: {what}")]
    InvalidGraph { what: String },

    /// Engine state contradicts itself; indicates a bug in this crate.
    #[error("Internal inconsistency: {what}")]
    InternalInconsistency { what: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EfiError {
    pub(crate) fn invalid_graph(what: impl Into<String>) -> Self {
        EfiError::InvalidGraph { what: what.into() }
    }
}
