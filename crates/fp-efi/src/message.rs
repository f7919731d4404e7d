//! Protocol messages consumed and recorded by an actuator.
//!
//! These are transport-agnostic: whatever delivers them is responsible for
//! decoding and ordering. Messages for one device arrive in order:
//! registration, then system descriptions and state updates.

use std::collections::BTreeSet;

use fp_core::{ActuatorId, Commodity, Instant, ModeId, ResourceId};

use crate::running_mode::RunningMode;
use crate::timer::TimerUpdate;

/// Identity and capabilities of a newly announced device.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub resource_id: ResourceId,
    pub actuator_id: ActuatorId,
    pub label: String,
    pub supported_commodities: BTreeSet<Commodity>,
}

/// The full mode graph of a device, replacing any earlier one.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemDescription<B> {
    pub resource_id: ResourceId,
    pub valid_from: Instant,
    pub valid_thru: Instant,
    pub running_modes: Vec<RunningMode<B>>,
    /// Fill-level units lost per second, buffer devices only.
    pub leakage_rate: Option<f64>,
}

/// Current mode, timer refreshes and (for buffers) the fill level.
#[derive(Debug, Clone, PartialEq)]
pub struct StateUpdate {
    pub resource_id: ResourceId,
    pub valid_from: Instant,
    pub valid_thru: Instant,
    pub current_running_mode_id: ModeId,
    pub timer_updates: Vec<TimerUpdate>,
    pub fill_level: Option<f64>,
}

/// An instruction from the negotiation counterpart, kept for bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub resource_id: ResourceId,
    pub actuator_id: ActuatorId,
    pub running_mode_id: ModeId,
    pub start_time: Instant,
}

/// Whether a state update changed the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// Arrived before any system description and was dropped.
    Ignored,
}
