//! Directed edges between running modes.

use fp_core::{ModeId, Time, s};

use crate::timer::Timer;

/// A transition out of the mode that owns it.
///
/// Usable only while none of its blocking timers are running. Taking it starts
/// the timers in `start_timers`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub to: ModeId,
    pub blocking_timers: Vec<Timer>,
    pub start_timers: Vec<Timer>,
    /// One-off cost of taking this transition.
    pub transition_costs: f64,
    /// Minimum time the switch itself takes.
    pub transition_duration: Time,
}

impl Transition {
    pub fn new(to: ModeId) -> Self {
        Self {
            to,
            blocking_timers: Vec::new(),
            start_timers: Vec::new(),
            transition_costs: 0.0,
            transition_duration: s(0.0),
        }
    }

    pub fn blocked_by(mut self, timer: Timer) -> Self {
        self.blocking_timers.push(timer);
        self
    }

    pub fn starts(mut self, timer: Timer) -> Self {
        self.start_timers.push(timer);
        self
    }

    pub fn with_costs(mut self, transition_costs: f64) -> Self {
        self.transition_costs = transition_costs;
        self
    }

    pub fn with_duration(mut self, transition_duration: Time) -> Self {
        self.transition_duration = transition_duration;
        self
    }

    /// Every timer this transition references, blocking ones first.
    pub fn timers(&self) -> impl Iterator<Item = &Timer> {
        self.blocking_timers.iter().chain(self.start_timers.iter())
    }
}
