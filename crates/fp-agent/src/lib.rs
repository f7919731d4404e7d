//! fp-agent: per-device actors, message routing and scenario files.
//!
//! Contains:
//! - handle (single-writer / multi-reader access to one actuator)
//! - device (buffer and unconstrained device actors)
//! - registry (routing of decoded messages by resource id)
//! - control (control-space derivation from live state)
//! - schema / validate / convert (scenario files and their domain mapping)
//! - replay (running a scenario end to end)
//! - logging (tracing subscriber setup)

pub mod control;
pub mod convert;
pub mod device;
pub mod error;
pub mod handle;
pub mod logging;
pub mod registry;
pub mod replay;
pub mod schema;
pub mod validate;

pub use control::{BufferConfig, StorageConfig, derive_control_space};
pub use device::{DeviceActor, DeviceKind};
pub use error::{AgentError, AgentResult};
pub use handle::ActuatorHandle;
pub use registry::{DeviceMessage, DeviceRegistry, Dispatched};
pub use replay::{QueryAnswer, ReplayReport, ReplaySummary, replay};
pub use schema::*;
pub use validate::{ValidationError, validate_scenario};

/// Newest scenario format version this crate reads.
pub const LATEST_VERSION: u32 = 1;

pub fn load_yaml(path: &std::path::Path) -> AgentResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_yaml(path: &std::path::Path, scenario: &Scenario) -> AgentResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> AgentResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

/// Load by extension: `.json` is JSON, anything else YAML.
pub fn load_scenario(path: &std::path::Path) -> AgentResult<Scenario> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
