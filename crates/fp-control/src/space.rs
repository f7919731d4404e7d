//! Control-space value objects.
//!
//! A storage control space is a buffer control space plus a
//! [`StorageExtension`]; the two are combined by composition. Both are
//! validated once when built (see [`crate::ControlSpaceBuilder`]) and are
//! immutable afterwards.

use fp_core::{Energy, Instant, Power, ResourceId, Time};

use crate::constraint::PowerConstraintList;

/// Target state of charge to reach by a given time.
///
/// Time and state of charge only exist together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeTarget {
    pub time: Instant,
    /// Fraction of total capacity, in `[0, 1]`.
    pub state_of_charge: f64,
}

/// Parameters shared by buffer and storage devices.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferParameters {
    pub resource_id: ResourceId,
    /// Start of the half-open validity window `[valid_from, valid_thru)`.
    pub valid_from: Instant,
    pub valid_thru: Instant,
    /// After this instant the device acts on its own if no allocation came in.
    pub expiration_time: Option<Instant>,
    pub total_capacity: Energy,
    /// Fraction of total capacity, in `[0, 1]`.
    pub state_of_charge: f64,
    pub charge_speed: PowerConstraintList,
    pub self_discharge: Power,
    pub min_on_period: Time,
    pub min_off_period: Time,
    pub target: Option<ChargeTarget>,
}

/// What a storage device adds on top of a buffer: it can give energy back.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageExtension {
    pub discharge_speed: PowerConstraintList,
    /// 1 means no turnover loss while charging.
    pub charge_efficiency: f64,
    /// 1 means no turnover loss while discharging.
    pub discharge_efficiency: f64,
}

/// Flexibility of a device that can only take energy in.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferControlSpace {
    params: BufferParameters,
}

impl BufferControlSpace {
    pub(crate) fn from_validated(params: BufferParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &BufferParameters {
        &self.params
    }

    pub fn resource_id(&self) -> &ResourceId {
        &self.params.resource_id
    }

    pub fn state_of_charge(&self) -> f64 {
        self.params.state_of_charge
    }

    pub fn total_capacity(&self) -> Energy {
        self.params.total_capacity
    }

    pub fn target(&self) -> Option<ChargeTarget> {
        self.params.target
    }

    /// True iff `moment` lies in `[valid_from, valid_thru)`.
    pub fn is_valid_at(&self, moment: Instant) -> bool {
        self.params.valid_from <= moment && moment < self.params.valid_thru
    }
}

/// Flexibility of a device that can both take and return energy.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageControlSpace {
    buffer: BufferControlSpace,
    storage: StorageExtension,
}

impl StorageControlSpace {
    pub(crate) fn from_validated(params: BufferParameters, storage: StorageExtension) -> Self {
        Self {
            buffer: BufferControlSpace::from_validated(params),
            storage,
        }
    }

    /// The buffer part of this storage space.
    pub fn buffer(&self) -> &BufferControlSpace {
        &self.buffer
    }

    pub fn storage(&self) -> &StorageExtension {
        &self.storage
    }

    pub fn charge_efficiency(&self) -> f64 {
        self.storage.charge_efficiency
    }

    pub fn discharge_efficiency(&self) -> f64 {
        self.storage.discharge_efficiency
    }

    pub fn discharge_speed(&self) -> &PowerConstraintList {
        &self.storage.discharge_speed
    }
}

/// Either kind of control space, as produced for one device.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlSpace {
    Buffer(BufferControlSpace),
    Storage(StorageControlSpace),
}

impl ControlSpace {
    pub fn buffer(&self) -> &BufferControlSpace {
        match self {
            ControlSpace::Buffer(b) => b,
            ControlSpace::Storage(s) => s.buffer(),
        }
    }

    pub fn storage(&self) -> Option<&StorageControlSpace> {
        match self {
            ControlSpace::Buffer(_) => None,
            ControlSpace::Storage(s) => Some(s),
        }
    }
}
