//! The two device families the agent manages.

use std::collections::BTreeSet;
use std::fmt;

use fp_core::{Instant, ModeId, Power, ResourceId};
use fp_efi::{
    Allocation, Behavior, BufferActuator, EfiError, FillLevelFunction, Registration, StateUpdate,
    UnconstrainedActuator, UpdateOutcome,
};
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, AgentResult};
use crate::handle::ActuatorHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Behavior depends on a reported fill level.
    Buffer,
    /// One behavior per running mode.
    Unconstrained,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Buffer => f.write_str("buffer"),
            DeviceKind::Unconstrained => f.write_str("unconstrained"),
        }
    }
}

/// A registered device's actor, whatever its family.
#[derive(Debug, Clone)]
pub enum DeviceActor {
    Buffer(ActuatorHandle<FillLevelFunction<Behavior>>),
    Unconstrained(ActuatorHandle<Behavior>),
}

impl DeviceActor {
    pub fn new(kind: DeviceKind, registration: &Registration) -> Self {
        match kind {
            DeviceKind::Buffer => {
                DeviceActor::Buffer(ActuatorHandle::new(BufferActuator::new(registration)))
            }
            DeviceKind::Unconstrained => DeviceActor::Unconstrained(ActuatorHandle::new(
                UnconstrainedActuator::new(registration),
            )),
        }
    }

    pub fn kind(&self) -> DeviceKind {
        match self {
            DeviceActor::Buffer(_) => DeviceKind::Buffer,
            DeviceActor::Unconstrained(_) => DeviceKind::Unconstrained,
        }
    }

    pub fn resource_id(&self) -> ResourceId {
        match self {
            DeviceActor::Buffer(h) => h.read(|a| a.resource_id().clone()),
            DeviceActor::Unconstrained(h) => h.read(|a| a.resource_id().clone()),
        }
    }

    pub fn apply_state_update(&self, update: StateUpdate) -> AgentResult<UpdateOutcome> {
        let outcome = match self {
            DeviceActor::Buffer(h) => h.apply_state_update(update)?,
            DeviceActor::Unconstrained(h) => h.apply_state_update(update)?,
        };
        Ok(outcome)
    }

    pub fn record_allocation(&self, allocation: Allocation) {
        match self {
            DeviceActor::Buffer(h) => h.record_allocation(allocation),
            DeviceActor::Unconstrained(h) => h.record_allocation(allocation),
        }
    }

    pub fn reachable_mode_ids(&self, now: Instant) -> BTreeSet<ModeId> {
        match self {
            DeviceActor::Buffer(h) => h.reachable_mode_ids(now),
            DeviceActor::Unconstrained(h) => h.reachable_mode_ids(now),
        }
    }

    /// Electrical demand of each reachable mode.
    ///
    /// Buffer devices are evaluated at `fill_level`, falling back to the last
    /// reported level; unconstrained devices ignore it.
    pub fn possible_demands(&self, now: Instant, fill_level: Option<f64>) -> AgentResult<Vec<Power>> {
        match self {
            DeviceActor::Buffer(h) => h.read(|a: &BufferActuator| -> AgentResult<Vec<Power>> {
                match fill_level.or_else(|| a.fill_level()) {
                    Some(level) => Ok(a.possible_demands(now, level)?),
                    None if a.reachable_mode_ids(now).is_empty() => Ok(Vec::new()),
                    None => Err(EfiError::NotYetKnown {
                        what: "fill level before any state update",
                    }
                    .into()),
                }
            }),
            DeviceActor::Unconstrained(h) => Ok(h.possible_demands(now)?),
        }
    }

    pub fn as_buffer(&self) -> AgentResult<&ActuatorHandle<FillLevelFunction<Behavior>>> {
        match self {
            DeviceActor::Buffer(h) => Ok(h),
            DeviceActor::Unconstrained(_) => Err(self.mismatch(DeviceKind::Buffer)),
        }
    }

    pub fn as_unconstrained(&self) -> AgentResult<&ActuatorHandle<Behavior>> {
        match self {
            DeviceActor::Unconstrained(h) => Ok(h),
            DeviceActor::Buffer(_) => Err(self.mismatch(DeviceKind::Unconstrained)),
        }
    }

    fn mismatch(&self, expected: DeviceKind) -> AgentError {
        AgentError::KindMismatch {
            resource_id: self.resource_id(),
            expected,
            found: self.kind(),
        }
    }
}
