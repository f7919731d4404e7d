//! Timer definitions and their live state.
//!
//! A [`Timer`] is the static part a device declares in its system description:
//! how long a blocking condition lasts once triggered. An [`ActuatorTimer`] adds
//! the moment that condition ends, as last reported by a state update. No alarms
//! fire here; blocking is always evaluated against an explicit instant.

use chrono::{DateTime, Utc};
use fp_core::{Instant, Time, TimerId};

/// Static timer definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    pub id: TimerId,
    pub label: String,
    /// Minimum span a blocking condition lasts once triggered.
    pub duration: Time,
}

impl Timer {
    pub fn new(id: TimerId, label: impl Into<String>, duration: Time) -> Self {
        Self {
            id,
            label: label.into(),
            duration,
        }
    }
}

/// Live state of a timer.
#[derive(Debug, Clone, PartialEq)]
pub struct ActuatorTimer {
    timer: Timer,
    finished_at: Instant,
}

impl ActuatorTimer {
    /// A fresh timer that blocks nothing until a state update says otherwise.
    pub fn new(timer: Timer) -> Self {
        Self {
            timer,
            finished_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    pub fn id(&self) -> TimerId {
        self.timer.id
    }

    pub fn definition(&self) -> &Timer {
        &self.timer
    }

    pub fn finished_at(&self) -> Instant {
        self.finished_at
    }

    /// Overwrite the moment this timer stops blocking.
    pub fn update_finished_at(&mut self, finished_at: Instant) {
        self.finished_at = finished_at;
    }

    /// True iff `moment` is strictly before `finished_at`.
    pub fn is_blocking_at(&self, moment: Instant) -> bool {
        moment < self.finished_at
    }
}

/// A timer refresh carried by a state update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerUpdate {
    pub timer_id: TimerId,
    pub finished_at: Instant,
}

impl TimerUpdate {
    pub fn new(timer_id: TimerId, finished_at: Instant) -> Self {
        Self {
            timer_id,
            finished_at,
        }
    }
}
