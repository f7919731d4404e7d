//! Routing of protocol messages to per-device actors.
//!
//! The registry lock only guards the id → actor map and is held just long
//! enough to look up or insert a handle. Message application then happens on
//! the device's own lock, so two devices never contend with each other.

use std::collections::BTreeMap;

use fp_core::{Instant, ResourceId};
use fp_efi::{Allocation, Behavior, FillLevelFunction, Registration, StateUpdate, SystemDescription, UpdateOutcome};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::control::{BufferConfig, derive_control_space};
use crate::device::{DeviceActor, DeviceKind};
use crate::error::{AgentError, AgentResult};
use fp_control::ControlSpace;

/// A protocol message, already decoded into domain types.
#[derive(Debug, Clone)]
pub enum DeviceMessage {
    Register {
        kind: DeviceKind,
        registration: Registration,
    },
    BufferDescription(SystemDescription<FillLevelFunction<Behavior>>),
    UnconstrainedDescription(SystemDescription<Behavior>),
    StateUpdate(StateUpdate),
    Allocation(Allocation),
    Deregister(ResourceId),
}

impl DeviceMessage {
    pub fn resource_id(&self) -> &ResourceId {
        match self {
            DeviceMessage::Register { registration, .. } => &registration.resource_id,
            DeviceMessage::BufferDescription(d) => &d.resource_id,
            DeviceMessage::UnconstrainedDescription(d) => &d.resource_id,
            DeviceMessage::StateUpdate(u) => &u.resource_id,
            DeviceMessage::Allocation(a) => &a.resource_id,
            DeviceMessage::Deregister(id) => id,
        }
    }
}

/// What applying one message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Registered,
    Deregistered,
    DescriptionInstalled,
    StateUpdate(UpdateOutcome),
    AllocationRecorded,
}

#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: RwLock<BTreeMap<ResourceId, DeviceActor>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty actor for a newly announced device.
    pub fn register(&self, kind: DeviceKind, registration: &Registration) -> AgentResult<DeviceActor> {
        let mut devices = self.devices.write();
        if devices.contains_key(&registration.resource_id) {
            return Err(AgentError::AlreadyRegistered(registration.resource_id.clone()));
        }
        let actor = DeviceActor::new(kind, registration);
        devices.insert(registration.resource_id.clone(), actor.clone());
        info!(resource_id = %registration.resource_id, %kind, "registered device");
        Ok(actor)
    }

    /// Drop a device's actor and everything it tracked.
    pub fn deregister(&self, resource_id: &ResourceId) -> AgentResult<()> {
        match self.devices.write().remove(resource_id) {
            Some(_) => {
                info!(%resource_id, "deregistered device");
                Ok(())
            }
            None => Err(AgentError::UnknownResource(resource_id.clone())),
        }
    }

    /// The actor of `resource_id`.
    pub fn device(&self, resource_id: &ResourceId) -> AgentResult<DeviceActor> {
        self.devices
            .read()
            .get(resource_id)
            .cloned()
            .ok_or_else(|| AgentError::UnknownResource(resource_id.clone()))
    }

    pub fn contains(&self, resource_id: &ResourceId) -> bool {
        self.devices.read().contains_key(resource_id)
    }

    pub fn resource_ids(&self) -> Vec<ResourceId> {
        self.devices.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    /// Apply one message to the device it names.
    pub fn dispatch(&self, message: DeviceMessage) -> AgentResult<Dispatched> {
        if !matches!(message, DeviceMessage::Register { .. })
            && !self.contains(message.resource_id())
        {
            warn!(resource_id = %message.resource_id(), "message for unknown resource; rejecting");
        }
        match message {
            DeviceMessage::Register { kind, registration } => {
                self.register(kind, &registration)?;
                Ok(Dispatched::Registered)
            }
            DeviceMessage::Deregister(resource_id) => {
                self.deregister(&resource_id)?;
                Ok(Dispatched::Deregistered)
            }
            DeviceMessage::BufferDescription(description) => {
                let device = self.device(&description.resource_id)?;
                device.as_buffer()?.install_system_description(description)?;
                Ok(Dispatched::DescriptionInstalled)
            }
            DeviceMessage::UnconstrainedDescription(description) => {
                let device = self.device(&description.resource_id)?;
                device.as_unconstrained()?.install_system_description(description)?;
                Ok(Dispatched::DescriptionInstalled)
            }
            DeviceMessage::StateUpdate(update) => {
                let device = self.device(&update.resource_id)?;
                let outcome = device.apply_state_update(update)?;
                Ok(Dispatched::StateUpdate(outcome))
            }
            DeviceMessage::Allocation(allocation) => {
                let device = self.device(&allocation.resource_id)?;
                debug!(
                    resource_id = %allocation.resource_id,
                    mode_id = %allocation.running_mode_id,
                    "recording allocation"
                );
                device.record_allocation(allocation);
                Ok(Dispatched::AllocationRecorded)
            }
        }
    }

    /// Build a fresh control space for a buffer device.
    pub fn control_space(
        &self,
        resource_id: &ResourceId,
        config: &BufferConfig,
        now: Instant,
    ) -> AgentResult<ControlSpace> {
        let device = self.device(resource_id)?;
        derive_control_space(device.as_buffer()?, config, now)
    }
}
