//! Error types for the agent layer.

use fp_control::ControlSpaceError;
use fp_core::ResourceId;
use fp_efi::EfiError;
use thiserror::Error;

use crate::device::DeviceKind;
use crate::validate::ValidationError;

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors raised while routing messages, answering queries or loading scenarios.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Efi(#[from] EfiError),

    #[error(transparent)]
    ControlSpace(#[from] ControlSpaceError),

    #[error("Unknown resource: {0}")]
    UnknownResource(ResourceId),

    #[error("Resource already registered: {0}")]
    AlreadyRegistered(ResourceId),

    #[error("Resource {resource_id} is a {found} device, expected {expected}")]
    KindMismatch {
        resource_id: ResourceId,
        expected: DeviceKind,
        found: DeviceKind,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
