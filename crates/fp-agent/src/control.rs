//! Control-space derivation from live device state.
//!
//! Capacity, speeds and efficiencies are configuration; the state of charge
//! comes from the actuator. A fresh control space is built on every call.

use fp_control::{ControlSpace, ControlSpaceBuilder, PowerConstraintList};
use fp_core::{Energy, Instant, Power, Time, instant_after, normalize_clamped};
use fp_efi::{Behavior, EfiError, FillLevelFunction};
use tracing::debug;

use crate::error::AgentResult;
use crate::handle::ActuatorHandle;

/// Configured parameters of a buffer (or storage) device.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferConfig {
    pub total_capacity: Energy,
    pub charge_speed: PowerConstraintList,
    pub self_discharge: Power,
    pub min_on_period: Time,
    pub min_off_period: Time,
    /// Length of the validity window starting at the derivation instant.
    pub validity: Time,
    pub target_time: Option<Instant>,
    pub target_state_of_charge: Option<f64>,
    pub storage: Option<StorageConfig>,
}

/// Extra parameters of a device that can also discharge.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub discharge_speed: PowerConstraintList,
    pub charge_efficiency: f64,
    pub discharge_efficiency: f64,
}

/// Build the control space of a buffer device at `now`.
///
/// The state of charge is the last reported fill level normalised over the
/// graph's `[minimum, maximum]` fill level.
///
/// # Errors
///
/// `NotYetKnown` before a system description and a fill level have arrived;
/// any validation failure of the resulting control space.
pub fn derive_control_space(
    handle: &ActuatorHandle<FillLevelFunction<Behavior>>,
    config: &BufferConfig,
    now: Instant,
) -> AgentResult<ControlSpace> {
    let (resource_id, min, max, level) = handle.read(|a| -> AgentResult<_> {
        let min = a.minimum_fill_level()?;
        let max = a.maximum_fill_level()?;
        let level = a.fill_level().ok_or(EfiError::NotYetKnown {
            what: "state of charge before any fill level was reported",
        })?;
        Ok((a.resource_id().clone(), min, max, level))
    })?;
    let state_of_charge = normalize_clamped(level, min, max);
    debug!(%resource_id, state_of_charge, "deriving control space");

    let mut builder = ControlSpaceBuilder::new(resource_id)
        .validity(now, instant_after(now, config.validity))
        .total_capacity(config.total_capacity)
        .state_of_charge(state_of_charge)
        .charge_speed(config.charge_speed.clone())
        .self_discharge(config.self_discharge)
        .min_on_period(config.min_on_period)
        .min_off_period(config.min_off_period);
    if let Some(at) = config.target_time {
        builder = builder.target_time(at);
    }
    if let Some(soc) = config.target_state_of_charge {
        builder = builder.target_state_of_charge(soc);
    }

    match &config.storage {
        None => Ok(ControlSpace::Buffer(builder.build_buffer()?)),
        Some(storage) => {
            let builder = builder
                .discharge_speed(storage.discharge_speed.clone())
                .charge_efficiency(storage.charge_efficiency)
                .discharge_efficiency(storage.discharge_efficiency);
            Ok(ControlSpace::Storage(builder.build_storage()?))
        }
    }
}
