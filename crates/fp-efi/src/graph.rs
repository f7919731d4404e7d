//! Validated mode-graph snapshots.
//!
//! A [`ModeGraph`] is built completely off to the side from the running modes
//! of one system description, validated, and only then handed to the actuator,
//! which swaps it in as a unit. Nobody observes a half-replaced graph.

use std::collections::BTreeMap;

use fp_core::{ModeId, TimerId};
use tracing::warn;

use crate::error::{EfiError, EfiResult};
use crate::running_mode::RunningMode;
use crate::timer::ActuatorTimer;

/// Running modes indexed by id, plus one live timer per distinct timer id.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeGraph<B> {
    modes: BTreeMap<ModeId, RunningMode<B>>,
    timers: BTreeMap<TimerId, ActuatorTimer>,
}

impl<B> ModeGraph<B> {
    /// Index `modes` and collect their timers.
    ///
    /// Timers are deduplicated by id, scanning modes in id order; when two
    /// definitions share an id the last one seen wins.
    ///
    /// # Errors
    ///
    /// `InvalidGraph` on a duplicate mode id or a transition whose target is not
    /// among `modes`.
    pub fn build(modes: Vec<RunningMode<B>>) -> EfiResult<Self> {
        let mut indexed = BTreeMap::new();
        for mode in modes {
            let id = mode.id;
            if indexed.insert(id, mode).is_some() {
                return Err(EfiError::invalid_graph(format!(
                    "running mode {id} is declared more than once"
                )));
            }
        }

        validate_targets(&indexed)?;

        let mut timers: BTreeMap<TimerId, ActuatorTimer> = BTreeMap::new();
        for mode in indexed.values() {
            for transition in &mode.transitions {
                for timer in transition.timers() {
                    if let Some(previous) = timers.get(&timer.id) {
                        if previous.definition() != timer {
                            warn!(
                                timer_id = %timer.id,
                                mode_id = %mode.id,
                                "conflicting definitions for timer; keeping the last one"
                            );
                        }
                    }
                    timers.insert(timer.id, ActuatorTimer::new(timer.clone()));
                }
            }
        }

        Ok(Self {
            modes: indexed,
            timers,
        })
    }

    pub fn mode(&self, id: ModeId) -> Option<&RunningMode<B>> {
        self.modes.get(&id)
    }

    pub fn contains_mode(&self, id: ModeId) -> bool {
        self.modes.contains_key(&id)
    }

    pub fn modes(&self) -> impl Iterator<Item = &RunningMode<B>> {
        self.modes.values()
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    pub fn timer(&self, id: TimerId) -> Option<&ActuatorTimer> {
        self.timers.get(&id)
    }

    pub fn timer_mut(&mut self, id: TimerId) -> Option<&mut ActuatorTimer> {
        self.timers.get_mut(&id)
    }

    pub fn timers(&self) -> impl Iterator<Item = &ActuatorTimer> {
        self.timers.values()
    }
}

/// Every transition must point at a mode of the same graph.
fn validate_targets<B>(modes: &BTreeMap<ModeId, RunningMode<B>>) -> EfiResult<()> {
    for mode in modes.values() {
        for transition in &mode.transitions {
            if !modes.contains_key(&transition.to) {
                return Err(EfiError::invalid_graph(format!(
                    "transition from mode {} targets unknown mode {}",
                    mode.id, transition.to
                )));
            }
        }
    }
    Ok(())
}
