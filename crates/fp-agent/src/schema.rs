//! Scenario schema definitions.
//!
//! A scenario declares the devices up front and then lists the messages they
//! send in delivery order. Scalars carry their unit in the field name; times
//! are RFC 3339 strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::device::DeviceKind;
use fp_core::Commodity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingDef>,
    #[serde(default)]
    pub devices: Vec<DeviceDef>,
    #[serde(default)]
    pub messages: Vec<MessageDef>,
    #[serde(default)]
    pub queries: Vec<QueryDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingDef {
    /// `tracing` filter directive, e.g. `info,fp_efi=debug`.
    pub filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceDef {
    pub id: String,
    #[serde(default)]
    pub actuator_id: u32,
    pub label: String,
    pub kind: DeviceKind,
    #[serde(default = "default_commodities")]
    pub commodities: Vec<Commodity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer: Option<BufferDef>,
}

fn default_commodities() -> Vec<Commodity> {
    vec![Commodity::Electricity]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerRangeDef {
    pub lower_w: f64,
    pub upper_w: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BufferDef {
    pub capacity_kwh: f64,
    pub charge_speed: Vec<PowerRangeDef>,
    pub self_discharge_w: f64,
    pub min_on_s: f64,
    pub min_off_s: f64,
    pub validity_s: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_state_of_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageDef {
    pub discharge_speed: Vec<PowerRangeDef>,
    pub charge_efficiency: f64,
    pub discharge_efficiency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageDef {
    SystemDescription {
        resource_id: String,
        valid_from: DateTime<Utc>,
        valid_thru: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        leakage_rate: Option<f64>,
        running_modes: Vec<RunningModeDef>,
    },
    StateUpdate {
        resource_id: String,
        valid_from: DateTime<Utc>,
        valid_thru: DateTime<Utc>,
        current_running_mode_id: u32,
        #[serde(default)]
        timer_updates: Vec<TimerUpdateDef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill_level: Option<f64>,
    },
    Allocation {
        resource_id: String,
        running_mode_id: u32,
        start_time: DateTime<Utc>,
    },
    Deregister {
        resource_id: String,
    },
}

impl MessageDef {
    pub fn resource_id(&self) -> &str {
        match self {
            MessageDef::SystemDescription { resource_id, .. }
            | MessageDef::StateUpdate { resource_id, .. }
            | MessageDef::Allocation { resource_id, .. }
            | MessageDef::Deregister { resource_id } => resource_id,
        }
    }
}

/// A running mode. Buffer devices give a `fill_level_function`,
/// unconstrained devices a single `behavior`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunningModeDef {
    pub id: u32,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<BehaviorDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_level_function: Option<Vec<RangeDef>>,
    #[serde(default)]
    pub transitions: Vec<TransitionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeDef {
    pub lower: f64,
    pub upper: f64,
    pub behavior: BehaviorDef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BehaviorDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_m3ps: Option<f64>,
    #[serde(default)]
    pub running_costs: f64,
    #[serde(default)]
    pub filling_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitionDef {
    pub to: u32,
    #[serde(default)]
    pub blocking_timers: Vec<TimerDef>,
    #[serde(default)]
    pub start_timers: Vec<TimerDef>,
    #[serde(default)]
    pub transition_costs: f64,
    #[serde(default)]
    pub transition_duration_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerDef {
    pub id: u32,
    pub label: String,
    pub duration_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerUpdateDef {
    pub timer_id: u32,
    pub finished_at: DateTime<Utc>,
}

/// A question asked after every message has been applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryDef {
    pub resource_id: String,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_level: Option<f64>,
    #[serde(default)]
    pub control_space: bool,
}
