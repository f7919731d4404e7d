//! Structural scenario validation.
//!
//! Catches what can be seen without running anything: duplicate ids, references
//! to undeclared devices, and modes shaped for the wrong device family. Graph
//! semantics (dangling transitions, contiguity) are left to the engine.

use std::collections::{HashMap, HashSet};

use crate::LATEST_VERSION;
use crate::device::DeviceKind;
use crate::schema::{MessageDef, RunningModeDef, Scenario};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Missing field: {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let mut kinds: HashMap<&str, DeviceKind> = HashMap::new();
    for device in &scenario.devices {
        if kinds.insert(device.id.as_str(), device.kind).is_some() {
            return Err(ValidationError::DuplicateId {
                id: device.id.clone(),
                context: "devices".to_string(),
            });
        }
        if device.buffer.is_some() && device.kind != DeviceKind::Buffer {
            return Err(ValidationError::InvalidValue {
                field: format!("devices.{}.buffer", device.id),
                value: device.kind.to_string(),
                reason: "control-space parameters need a buffer device".to_string(),
            });
        }
    }

    for (index, message) in scenario.messages.iter().enumerate() {
        let context = format!("messages[{index}]");
        let Some(kind) = kinds.get(message.resource_id()) else {
            return Err(ValidationError::MissingReference {
                id: message.resource_id().to_string(),
                context,
            });
        };
        if let MessageDef::SystemDescription { running_modes, .. } = message {
            validate_modes(running_modes, *kind, &context)?;
        }
        if let MessageDef::StateUpdate {
            fill_level: Some(level),
            ..
        } = message
        {
            if !level.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: format!("{context}.fill_level"),
                    value: level.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
        }
    }

    for (index, query) in scenario.queries.iter().enumerate() {
        if !kinds.contains_key(query.resource_id.as_str()) {
            return Err(ValidationError::MissingReference {
                id: query.resource_id.clone(),
                context: format!("queries[{index}]"),
            });
        }
    }

    Ok(())
}

fn validate_modes(
    modes: &[RunningModeDef],
    kind: DeviceKind,
    context: &str,
) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    for mode in modes {
        let mode_context = format!("{context}.running_modes.{}", mode.id);
        if !ids.insert(mode.id) {
            return Err(ValidationError::DuplicateId {
                id: mode.id.to_string(),
                context: format!("{context}.running_modes"),
            });
        }
        match kind {
            DeviceKind::Buffer if mode.fill_level_function.is_none() => {
                return Err(ValidationError::MissingField {
                    field: "fill_level_function".to_string(),
                    context: mode_context,
                });
            }
            DeviceKind::Unconstrained if mode.behavior.is_none() => {
                return Err(ValidationError::MissingField {
                    field: "behavior".to_string(),
                    context: mode_context,
                });
            }
            _ => {}
        }
        for timer in mode
            .transitions
            .iter()
            .flat_map(|t| t.blocking_timers.iter().chain(&t.start_timers))
        {
            if !(timer.duration_s.is_finite() && timer.duration_s >= 0.0) {
                return Err(ValidationError::InvalidValue {
                    field: format!("{mode_context}.timers.{}.duration_s", timer.id),
                    value: timer.duration_s.to_string(),
                    reason: "must be a non-negative number of seconds".to_string(),
                });
            }
        }
    }
    Ok(())
}
