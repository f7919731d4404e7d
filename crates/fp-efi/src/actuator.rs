//! The actuator engine.
//!
//! An [`Actuator`] owns one device's mode graph, live timers, current mode and
//! allocation history. It is mutated only by the messages of its own device,
//! one at a time, and answers two questions for a given instant:
//! - which running modes can be reached from the current one
//! - what each of those modes would draw
//!
//! Reachability is deliberately forgiving: before the device has described
//! itself and reported a known current mode, nothing is reachable and no error
//! is raised. Structural problems in the graph, on the other hand, are errors.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use fp_core::{ActuatorId, Commodity, FlowRate, Instant, ModeId, Power, ResourceId, TimerId};
use tracing::{debug, warn};

use crate::behavior::{Behavior, ModeBehavior};
use crate::error::{EfiError, EfiResult};
use crate::fill_level::FillLevelFunction;
use crate::graph::ModeGraph;
use crate::guard::{AlwaysPermit, TransitionContext, TransitionGuard};
use crate::message::{Allocation, Registration, StateUpdate, SystemDescription, UpdateOutcome};
use crate::running_mode::RunningMode;
use crate::timer::ActuatorTimer;
use crate::transition::Transition;

/// Actuator of a buffer device: behavior depends on the fill level.
pub type BufferActuator = Actuator<FillLevelFunction<Behavior>>;

/// Actuator of an unconstrained device: one behavior per mode.
pub type UnconstrainedActuator = Actuator<Behavior>;

pub struct Actuator<B: ModeBehavior> {
    resource_id: ResourceId,
    actuator_id: ActuatorId,
    label: String,
    supported_commodities: BTreeSet<Commodity>,
    graph: Option<ModeGraph<B>>,
    leakage_rate: Option<f64>,
    current_mode: Option<ModeId>,
    fill_level: Option<f64>,
    received_state_update: bool,
    allocations: Vec<Allocation>,
    allocated_until: Option<Instant>,
    guard: Arc<dyn TransitionGuard>,
}

impl<B: ModeBehavior> Actuator<B> {
    /// Create an empty actuator from its registration.
    pub fn new(registration: &Registration) -> Self {
        Self {
            resource_id: registration.resource_id.clone(),
            actuator_id: registration.actuator_id,
            label: registration.label.clone(),
            supported_commodities: registration.supported_commodities.clone(),
            graph: None,
            leakage_rate: None,
            current_mode: None,
            fill_level: None,
            received_state_update: false,
            allocations: Vec::new(),
            allocated_until: None,
            guard: Arc::new(AlwaysPermit),
        }
    }

    /// Replace the transition guard.
    pub fn with_guard(mut self, guard: Arc<dyn TransitionGuard>) -> Self {
        self.guard = guard;
        self
    }

    pub fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    pub fn actuator_id(&self) -> ActuatorId {
        self.actuator_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn supported_commodities(&self) -> &BTreeSet<Commodity> {
        &self.supported_commodities
    }

    pub fn current_mode_id(&self) -> Option<ModeId> {
        self.current_mode
    }

    /// Last fill level reported by a state update.
    pub fn fill_level(&self) -> Option<f64> {
        self.fill_level
    }

    pub fn leakage_rate(&self) -> Option<f64> {
        self.leakage_rate
    }

    pub fn has_received_system_description(&self) -> bool {
        self.graph.is_some()
    }

    pub fn has_received_state_update(&self) -> bool {
        self.received_state_update
    }

    pub fn running_mode(&self, id: ModeId) -> Option<&RunningMode<B>> {
        self.graph.as_ref()?.mode(id)
    }

    pub fn running_modes(&self) -> impl Iterator<Item = &RunningMode<B>> {
        self.graph.iter().flat_map(|g| g.modes())
    }

    pub fn timer(&self, id: TimerId) -> Option<&ActuatorTimer> {
        self.graph.as_ref()?.timer(id)
    }

    pub fn timers(&self) -> impl Iterator<Item = &ActuatorTimer> {
        self.graph.iter().flat_map(|g| g.timers())
    }

    /// Install a new mode graph, discarding the previous graph and its timers.
    ///
    /// The graph is validated before anything changes; on error the actuator
    /// keeps its previous graph. The current mode is left as is and only
    /// checked when reachability is queried.
    pub fn install_system_description(&mut self, description: SystemDescription<B>) -> EfiResult<()> {
        if let Some(rate) = description.leakage_rate {
            if !rate.is_finite() {
                return Err(EfiError::InvalidArgument {
                    what: format!("leakage rate must be finite but is {rate}"),
                });
            }
        }
        let graph = ModeGraph::build(description.running_modes)?;
        debug!(
            resource_id = %self.resource_id,
            modes = graph.mode_count(),
            timers = graph.timers().count(),
            "installed system description"
        );
        self.graph = Some(graph);
        self.leakage_rate = description.leakage_rate;
        Ok(())
    }

    /// Apply a state update: current mode, timer refreshes and fill level.
    ///
    /// An update that arrives before any system description is dropped.
    /// Unknown timer ids are skipped. A non-finite fill level rejects the whole
    /// update before anything is changed.
    pub fn apply_state_update(&mut self, update: StateUpdate) -> EfiResult<UpdateOutcome> {
        if let Some(level) = update.fill_level {
            if !level.is_finite() {
                return Err(EfiError::InvalidArgument {
                    what: format!("fill level must be finite but is {level}"),
                });
            }
        }
        let Some(graph) = self.graph.as_mut() else {
            warn!(
                resource_id = %self.resource_id,
                "state update before system description; ignoring"
            );
            return Ok(UpdateOutcome::Ignored);
        };

        if !graph.contains_mode(update.current_running_mode_id) {
            warn!(
                resource_id = %self.resource_id,
                mode_id = %update.current_running_mode_id,
                "current running mode is not part of the installed graph"
            );
        }
        for timer_update in &update.timer_updates {
            match graph.timer_mut(timer_update.timer_id) {
                Some(timer) => timer.update_finished_at(timer_update.finished_at),
                None => warn!(
                    resource_id = %self.resource_id,
                    timer_id = %timer_update.timer_id,
                    "state update refers to unknown timer; skipping"
                ),
            }
        }

        self.current_mode = Some(update.current_running_mode_id);
        if update.fill_level.is_some() {
            self.fill_level = update.fill_level;
        }
        self.received_state_update = true;
        debug!(
            resource_id = %self.resource_id,
            mode_id = %update.current_running_mode_id,
            "applied state update"
        );
        Ok(UpdateOutcome::Applied)
    }

    /// Overwrite the finish time of one timer.
    ///
    /// Returns false if no timer with that id is installed.
    pub fn update_timer(&mut self, timer_id: TimerId, finished_at: Instant) -> bool {
        match self.graph.as_mut().and_then(|g| g.timer_mut(timer_id)) {
            Some(timer) => {
                timer.update_finished_at(finished_at);
                true
            }
            None => false,
        }
    }

    /// Ids of every mode reachable at `now`, always including the current one.
    ///
    /// Empty while the device is not in a known state (no graph yet, or a
    /// current mode that is not part of the graph).
    pub fn reachable_mode_ids(&self, now: Instant) -> BTreeSet<ModeId> {
        let mut targets = BTreeSet::new();
        let (Some(graph), Some(current)) = (self.graph.as_ref(), self.current_mode) else {
            return targets;
        };
        let Some(mode) = graph.mode(current) else {
            return targets;
        };

        for transition in &mode.transitions {
            if self.is_blocked_at(graph, transition, now) {
                continue;
            }
            let ctx = TransitionContext {
                from: current,
                transition,
                now,
                fill_level: self.fill_level,
            };
            if self.guard.permits(&ctx) {
                targets.insert(transition.to);
            }
        }
        targets.insert(current);
        targets
    }

    fn is_blocked_at(&self, graph: &ModeGraph<B>, transition: &Transition, moment: Instant) -> bool {
        transition
            .blocking_timers
            .iter()
            .any(|t| graph.timer(t.id).is_some_and(|at| at.is_blocking_at(moment)))
    }

    /// Reachable modes at `now`, resolved against the installed graph.
    pub fn reachable_modes(&self, now: Instant) -> EfiResult<Vec<&RunningMode<B>>> {
        let ids = self.reachable_mode_ids(now);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let graph = self.graph.as_ref().ok_or_else(|| EfiError::InternalInconsistency {
            what: "reachable modes without an installed graph".to_string(),
        })?;
        ids.into_iter()
            .map(|id| {
                graph.mode(id).ok_or_else(|| EfiError::InternalInconsistency {
                    what: format!("running mode {id} is not known"),
                })
            })
            .collect()
    }

    /// Rate of `commodity` drawn by each reachable mode at `fill_level`.
    ///
    /// One entry per reachable mode, possibly with duplicates; empty iff
    /// nothing is reachable. Fill levels outside a mode's declared range
    /// resolve to the nearest end of that range.
    pub fn possible_demands_for(
        &self,
        commodity: Commodity,
        now: Instant,
        fill_level: f64,
    ) -> EfiResult<Vec<FlowRate>> {
        if fill_level.is_nan() {
            return Err(EfiError::InvalidArgument {
                what: "fill level must not be NaN".to_string(),
            });
        }
        self.reachable_modes(now)?
            .into_iter()
            .map(|mode| {
                mode.behavior
                    .behavior_at(fill_level)
                    .map(|b| b.consumption(commodity))
                    .map_err(|err| match err {
                        EfiError::InvalidGraph { what } => EfiError::InvalidGraph {
                            what: format!("running mode {}: {what}", mode.id),
                        },
                        other => other,
                    })
            })
            .collect()
    }

    fn electricity_demands(&self, now: Instant, fill_level: f64) -> EfiResult<Vec<Power>> {
        Ok(self
            .possible_demands_for(Commodity::Electricity, now, fill_level)?
            .into_iter()
            .filter_map(|rate| rate.as_power())
            .collect())
    }

    /// Keep an allocation for bookkeeping. Nothing is recomputed.
    pub fn record_allocation(&mut self, allocation: Allocation) {
        if !self
            .graph
            .as_ref()
            .is_some_and(|g| g.contains_mode(allocation.running_mode_id))
        {
            warn!(
                resource_id = %self.resource_id,
                mode_id = %allocation.running_mode_id,
                "allocation for a running mode outside the installed graph"
            );
        }
        if self.allocated_until.is_none_or(|until| allocation.start_time > until) {
            self.allocated_until = Some(allocation.start_time);
        }
        self.allocations.push(allocation);
    }

    pub fn allocation_history(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Start time of the latest allocation received.
    pub fn allocated_until(&self) -> Option<Instant> {
        self.allocated_until
    }
}

impl BufferActuator {
    /// Electrical demand of each reachable mode at `fill_level`.
    ///
    /// # Errors
    ///
    /// `InvalidGraph` if a reachable mode has an empty fill-level function.
    pub fn possible_demands(&self, now: Instant, fill_level: f64) -> EfiResult<Vec<Power>> {
        self.electricity_demands(now, fill_level)
    }

    /// Lowest lower bound over every mode of the installed graph.
    pub fn minimum_fill_level(&self) -> EfiResult<f64> {
        self.fill_level_domain().map(|(min, _)| min)
    }

    /// Highest upper bound over every mode of the installed graph.
    pub fn maximum_fill_level(&self) -> EfiResult<f64> {
        self.fill_level_domain().map(|(_, max)| max)
    }

    fn fill_level_domain(&self) -> EfiResult<(f64, f64)> {
        let graph = self.graph.as_ref().ok_or(EfiError::NotYetKnown {
            what: "fill level bounds before a system description",
        })?;
        let mut domain: Option<(f64, f64)> = None;
        for mode in graph.modes() {
            let Some((lo, hi)) = mode.behavior.fill_level_domain()? else {
                continue;
            };
            domain = Some(match domain {
                Some((min, max)) => (min.min(lo), max.max(hi)),
                None => (lo, hi),
            });
        }
        domain.ok_or(EfiError::NotYetKnown {
            what: "fill level bounds of a graph without running modes",
        })
    }
}

impl UnconstrainedActuator {
    /// Electrical demand of each reachable mode.
    pub fn possible_demands(&self, now: Instant) -> EfiResult<Vec<Power>> {
        self.electricity_demands(now, 0.0)
    }
}

impl<B: ModeBehavior> fmt::Debug for Actuator<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actuator")
            .field("resource_id", &self.resource_id)
            .field("actuator_id", &self.actuator_id)
            .field("label", &self.label)
            .field("current_mode", &self.current_mode)
            .field("fill_level", &self.fill_level)
            .field("graph", &self.graph)
            .finish_non_exhaustive()
    }
}
