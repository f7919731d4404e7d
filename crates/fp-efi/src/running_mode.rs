//! Running modes: the discrete operating states of an actuator.

use fp_core::ModeId;

use crate::transition::Transition;

/// A running mode with its behavior and outgoing transitions.
///
/// `B` is [`crate::Behavior`] for unconstrained devices and
/// [`crate::FillLevelFunction`] of behaviors for buffer devices.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningMode<B> {
    pub id: ModeId,
    pub label: String,
    pub behavior: B,
    pub transitions: Vec<Transition>,
}

impl<B> RunningMode<B> {
    pub fn new(id: ModeId, label: impl Into<String>, behavior: B) -> Self {
        Self {
            id,
            label: label.into(),
            behavior,
            transitions: Vec::new(),
        }
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }
}
