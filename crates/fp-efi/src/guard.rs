//! Pluggable feasibility check for transitions.
//!
//! Besides timers, a transition may be ruled out because taking it would
//! overfill or drain a buffer before the device is allowed to switch back.
//! How to project that balance is device specific, so the actuator delegates
//! the decision to a [`TransitionGuard`]. The default permits everything.

use fp_core::{Instant, ModeId};

use crate::transition::Transition;

/// What a guard gets to look at for one candidate transition.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub from: ModeId,
    pub transition: &'a Transition,
    pub now: Instant,
    /// Last fill level reported by a state update, if any.
    pub fill_level: Option<f64>,
}

/// Decides whether an unblocked transition may be taken.
pub trait TransitionGuard: Send + Sync {
    fn permits(&self, ctx: &TransitionContext<'_>) -> bool;
}

/// Guard that never objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPermit;

impl TransitionGuard for AlwaysPermit {
    fn permits(&self, _ctx: &TransitionContext<'_>) -> bool {
        true
    }
}

impl<F> TransitionGuard for F
where
    F: Fn(&TransitionContext<'_>) -> bool + Send + Sync,
{
    fn permits(&self, ctx: &TransitionContext<'_>) -> bool {
        self(ctx)
    }
}
