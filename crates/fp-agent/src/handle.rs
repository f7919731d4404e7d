//! Shared, lock-guarded access to one device's actuator.
//!
//! A handle is the only way anything outside the registry touches an
//! actuator. Message application takes the write lock; queries take the read
//! lock and return owned values, so no caller ever holds a reference into the
//! live state once a call returns.

use std::collections::BTreeSet;
use std::sync::Arc;

use fp_core::{Commodity, FlowRate, Instant, ModeId, Power};
use fp_efi::{
    Actuator, Allocation, BufferActuator, EfiResult, ModeBehavior, RunningMode, StateUpdate,
    SystemDescription, UnconstrainedActuator, UpdateOutcome,
};
use parking_lot::RwLock;

/// Single-writer, multi-reader handle to an [`Actuator`].
#[derive(Debug)]
pub struct ActuatorHandle<B: ModeBehavior> {
    inner: Arc<RwLock<Actuator<B>>>,
}

impl<B: ModeBehavior> Clone for ActuatorHandle<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: ModeBehavior> ActuatorHandle<B> {
    pub fn new(actuator: Actuator<B>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(actuator)),
        }
    }

    /// Run a read-only query under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Actuator<B>) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn install_system_description(&self, description: SystemDescription<B>) -> EfiResult<()> {
        self.inner.write().install_system_description(description)
    }

    pub fn apply_state_update(&self, update: StateUpdate) -> EfiResult<UpdateOutcome> {
        self.inner.write().apply_state_update(update)
    }

    pub fn record_allocation(&self, allocation: Allocation) {
        self.inner.write().record_allocation(allocation);
    }

    pub fn reachable_mode_ids(&self, now: Instant) -> BTreeSet<ModeId> {
        self.inner.read().reachable_mode_ids(now)
    }

    /// Copies of the reachable running modes.
    pub fn reachable_modes(&self, now: Instant) -> EfiResult<Vec<RunningMode<B>>> {
        let actuator = self.inner.read();
        let modes = actuator.reachable_modes(now)?;
        Ok(modes.into_iter().cloned().collect())
    }

    pub fn possible_demands_for(
        &self,
        commodity: Commodity,
        now: Instant,
        fill_level: f64,
    ) -> EfiResult<Vec<FlowRate>> {
        self.inner.read().possible_demands_for(commodity, now, fill_level)
    }

    pub fn current_mode_id(&self) -> Option<ModeId> {
        self.inner.read().current_mode_id()
    }

    pub fn allocation_history(&self) -> Vec<Allocation> {
        self.inner.read().allocation_history().to_vec()
    }
}

impl ActuatorHandle<fp_efi::FillLevelFunction<fp_efi::Behavior>> {
    pub fn possible_demands(&self, now: Instant, fill_level: f64) -> EfiResult<Vec<Power>> {
        self.read(|a: &BufferActuator| a.possible_demands(now, fill_level))
    }

    pub fn minimum_fill_level(&self) -> EfiResult<f64> {
        self.read(|a: &BufferActuator| a.minimum_fill_level())
    }

    pub fn maximum_fill_level(&self) -> EfiResult<f64> {
        self.read(|a: &BufferActuator| a.maximum_fill_level())
    }

    pub fn fill_level(&self) -> Option<f64> {
        self.read(|a: &BufferActuator| a.fill_level())
    }
}

impl ActuatorHandle<fp_efi::Behavior> {
    pub fn possible_demands(&self, now: Instant) -> EfiResult<Vec<Power>> {
        self.read(|a: &UnconstrainedActuator| a.possible_demands(now))
    }
}
