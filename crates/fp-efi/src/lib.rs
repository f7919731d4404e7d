//! fp-efi: running-mode reachability and demand projection.
//!
//! Contains:
//! - timer (timer definitions, live timers, timer updates)
//! - behavior (per-mode consumption and the `ModeBehavior` seam)
//! - fill_level (piecewise functions over a buffer's fill level)
//! - transition / running_mode (the mode graph's edges and nodes)
//! - graph (validated, swappable mode-graph snapshots)
//! - guard (pluggable transition feasibility)
//! - message (registration, system description, state update, allocation)
//! - actuator (the per-device engine)
//! - error (engine error taxonomy)
//!
//! The engine is strictly single-writer: nothing here locks. Concurrent access
//! is arranged one layer up, by whoever owns the actuators.

pub mod actuator;
pub mod behavior;
pub mod error;
pub mod fill_level;
pub mod graph;
pub mod guard;
pub mod message;
pub mod running_mode;
pub mod timer;
pub mod transition;

pub use actuator::{Actuator, BufferActuator, UnconstrainedActuator};
pub use behavior::{Behavior, ModeBehavior};
pub use error::{EfiError, EfiResult};
pub use fill_level::{FillLevelFunction, RangeElement};
pub use graph::ModeGraph;
pub use guard::{AlwaysPermit, TransitionContext, TransitionGuard};
pub use message::{Allocation, Registration, StateUpdate, SystemDescription, UpdateOutcome};
pub use running_mode::RunningMode;
pub use timer::{ActuatorTimer, Timer, TimerUpdate};
pub use transition::Transition;
