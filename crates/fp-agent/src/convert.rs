//! Conversion from scenario definitions into domain types.
//!
//! This is the only place unit-suffixed scalars are interpreted.

use std::collections::BTreeSet;

use fp_control::{PowerConstraint, PowerConstraintList};
use fp_core::{ActuatorId, FlowRate, ModeId, ResourceId, TimerId, kwh, m3ps, s, watts};
use fp_efi::{
    Allocation, Behavior, FillLevelFunction, RangeElement, Registration, RunningMode, StateUpdate,
    SystemDescription, Timer, TimerUpdate, Transition,
};

use crate::control::{BufferConfig, StorageConfig};
use crate::device::DeviceKind;
use crate::error::{AgentError, AgentResult};
use crate::registry::DeviceMessage;
use crate::schema::{
    BehaviorDef, BufferDef, DeviceDef, MessageDef, PowerRangeDef, RunningModeDef, Scenario,
    TimerDef, TransitionDef,
};
use crate::validate::ValidationError;

pub fn registration(device: &DeviceDef) -> Registration {
    Registration {
        resource_id: ResourceId::new(device.id.clone()),
        actuator_id: ActuatorId(device.actuator_id),
        label: device.label.clone(),
        supported_commodities: device.commodities.iter().copied().collect::<BTreeSet<_>>(),
    }
}

/// Registration messages for every declared device, in declaration order.
pub fn registrations(scenario: &Scenario) -> Vec<DeviceMessage> {
    scenario
        .devices
        .iter()
        .map(|d| DeviceMessage::Register {
            kind: d.kind,
            registration: registration(d),
        })
        .collect()
}

pub fn behavior(def: &BehaviorDef) -> Behavior {
    let mut behavior = Behavior::new(def.running_costs).with_filling_rate(def.filling_rate);
    if let Some(p) = def.power_w {
        behavior = behavior.with_consumption(FlowRate::Power(watts(p)));
    }
    if let Some(q) = def.gas_m3ps {
        behavior = behavior.with_consumption(FlowRate::VolumeRate(m3ps(q)));
    }
    behavior
}

fn timer(def: &TimerDef) -> Timer {
    Timer::new(TimerId(def.id), def.label.clone(), s(def.duration_s))
}

fn transition(def: &TransitionDef) -> Transition {
    let mut transition = Transition::new(ModeId(def.to))
        .with_costs(def.transition_costs)
        .with_duration(s(def.transition_duration_s));
    for t in &def.blocking_timers {
        transition = transition.blocked_by(timer(t));
    }
    for t in &def.start_timers {
        transition = transition.starts(timer(t));
    }
    transition
}

fn running_mode<B>(def: &RunningModeDef, behavior: B) -> RunningMode<B> {
    def.transitions
        .iter()
        .map(transition)
        .fold(RunningMode::new(ModeId(def.id), def.label.clone(), behavior), |mode, t| {
            mode.with_transition(t)
        })
}

fn missing(field: &str, mode: &RunningModeDef) -> AgentError {
    ValidationError::MissingField {
        field: field.to_string(),
        context: format!("running mode {}", mode.id),
    }
    .into()
}

pub fn buffer_mode(def: &RunningModeDef) -> AgentResult<RunningMode<FillLevelFunction<Behavior>>> {
    let ranges = def
        .fill_level_function
        .as_ref()
        .ok_or_else(|| missing("fill_level_function", def))?;
    let function = FillLevelFunction::new(
        ranges
            .iter()
            .map(|r| RangeElement::new(r.lower, r.upper, behavior(&r.behavior)))
            .collect(),
    )?;
    Ok(running_mode(def, function))
}

pub fn unconstrained_mode(def: &RunningModeDef) -> AgentResult<RunningMode<Behavior>> {
    let b = def.behavior.as_ref().ok_or_else(|| missing("behavior", def))?;
    Ok(running_mode(def, behavior(b)))
}

fn power_constraints(defs: &[PowerRangeDef]) -> AgentResult<PowerConstraintList> {
    let constraints = defs
        .iter()
        .map(|r| PowerConstraint::new(watts(r.lower_w), watts(r.upper_w)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PowerConstraintList::new(constraints)?)
}

pub fn buffer_config(def: &BufferDef) -> AgentResult<BufferConfig> {
    let storage = match &def.storage {
        Some(st) => Some(StorageConfig {
            discharge_speed: power_constraints(&st.discharge_speed)?,
            charge_efficiency: st.charge_efficiency,
            discharge_efficiency: st.discharge_efficiency,
        }),
        None => None,
    };
    Ok(BufferConfig {
        total_capacity: kwh(def.capacity_kwh),
        charge_speed: power_constraints(&def.charge_speed)?,
        self_discharge: watts(def.self_discharge_w),
        min_on_period: s(def.min_on_s),
        min_off_period: s(def.min_off_s),
        validity: s(def.validity_s),
        target_time: def.target_time,
        target_state_of_charge: def.target_state_of_charge,
        storage,
    })
}

/// Decode one scenario message for the device it names.
pub fn message(scenario: &Scenario, def: &MessageDef) -> AgentResult<DeviceMessage> {
    let device = scenario
        .devices
        .iter()
        .find(|d| d.id == def.resource_id())
        .ok_or_else(|| AgentError::UnknownResource(ResourceId::new(def.resource_id())))?;
    let resource_id = ResourceId::new(device.id.clone());

    let message = match def {
        MessageDef::SystemDescription {
            valid_from,
            valid_thru,
            leakage_rate,
            running_modes,
            ..
        } => match device.kind {
            DeviceKind::Buffer => DeviceMessage::BufferDescription(SystemDescription {
                resource_id,
                valid_from: *valid_from,
                valid_thru: *valid_thru,
                running_modes: running_modes
                    .iter()
                    .map(buffer_mode)
                    .collect::<AgentResult<_>>()?,
                leakage_rate: *leakage_rate,
            }),
            DeviceKind::Unconstrained => DeviceMessage::UnconstrainedDescription(SystemDescription {
                resource_id,
                valid_from: *valid_from,
                valid_thru: *valid_thru,
                running_modes: running_modes
                    .iter()
                    .map(unconstrained_mode)
                    .collect::<AgentResult<_>>()?,
                leakage_rate: *leakage_rate,
            }),
        },
        MessageDef::StateUpdate {
            valid_from,
            valid_thru,
            current_running_mode_id,
            timer_updates,
            fill_level,
            ..
        } => DeviceMessage::StateUpdate(StateUpdate {
            resource_id,
            valid_from: *valid_from,
            valid_thru: *valid_thru,
            current_running_mode_id: ModeId(*current_running_mode_id),
            timer_updates: timer_updates
                .iter()
                .map(|u| TimerUpdate::new(TimerId(u.timer_id), u.finished_at))
                .collect(),
            fill_level: *fill_level,
        }),
        MessageDef::Allocation {
            running_mode_id,
            start_time,
            ..
        } => DeviceMessage::Allocation(Allocation {
            resource_id,
            actuator_id: ActuatorId(device.actuator_id),
            running_mode_id: ModeId(*running_mode_id),
            start_time: *start_time,
        }),
        MessageDef::Deregister { .. } => DeviceMessage::Deregister(resource_id),
    };
    Ok(message)
}
