//! Validating construction of control spaces.
//!
//! Every field starts out unset. `build_buffer` / `build_storage` check, in
//! order:
//! - required fields are present, storage fields included (`InvalidConfiguration`)
//! - fractions lie in `[0, 1]` and the validity window is not inverted
//!   (`InvalidArgument`)
//! - target time and target state of charge are set together
//!   (`InvalidConfiguration`)

use fp_core::{Energy, Instant, Power, ResourceId, Time, ensure_unit_interval};
use fp_core::scalar::{as_joules, as_seconds, as_watts};

use crate::constraint::PowerConstraintList;
use crate::error::{ControlSpaceError, ControlSpaceResult};
use crate::space::{
    BufferControlSpace, BufferParameters, ChargeTarget, StorageControlSpace, StorageExtension,
};

#[derive(Debug, Clone, Default)]
pub struct ControlSpaceBuilder {
    resource_id: Option<ResourceId>,
    valid_from: Option<Instant>,
    valid_thru: Option<Instant>,
    expiration_time: Option<Instant>,
    total_capacity: Option<Energy>,
    state_of_charge: Option<f64>,
    charge_speed: Option<PowerConstraintList>,
    self_discharge: Option<Power>,
    min_on_period: Option<Time>,
    min_off_period: Option<Time>,
    target_time: Option<Instant>,
    target_state_of_charge: Option<f64>,
    discharge_speed: Option<PowerConstraintList>,
    charge_efficiency: Option<f64>,
    discharge_efficiency: Option<f64>,
}

impl ControlSpaceBuilder {
    pub fn new(resource_id: impl Into<ResourceId>) -> Self {
        Self {
            resource_id: Some(resource_id.into()),
            ..Self::default()
        }
    }

    pub fn validity(mut self, valid_from: Instant, valid_thru: Instant) -> Self {
        self.valid_from = Some(valid_from);
        self.valid_thru = Some(valid_thru);
        self
    }

    pub fn expiration_time(mut self, at: Instant) -> Self {
        self.expiration_time = Some(at);
        self
    }

    pub fn total_capacity(mut self, capacity: Energy) -> Self {
        self.total_capacity = Some(capacity);
        self
    }

    pub fn state_of_charge(mut self, soc: f64) -> Self {
        self.state_of_charge = Some(soc);
        self
    }

    pub fn charge_speed(mut self, speed: PowerConstraintList) -> Self {
        self.charge_speed = Some(speed);
        self
    }

    pub fn self_discharge(mut self, power: Power) -> Self {
        self.self_discharge = Some(power);
        self
    }

    pub fn min_on_period(mut self, period: Time) -> Self {
        self.min_on_period = Some(period);
        self
    }

    pub fn min_off_period(mut self, period: Time) -> Self {
        self.min_off_period = Some(period);
        self
    }

    pub fn target_time(mut self, at: Instant) -> Self {
        self.target_time = Some(at);
        self
    }

    pub fn target_state_of_charge(mut self, soc: f64) -> Self {
        self.target_state_of_charge = Some(soc);
        self
    }

    pub fn discharge_speed(mut self, speed: PowerConstraintList) -> Self {
        self.discharge_speed = Some(speed);
        self
    }

    pub fn charge_efficiency(mut self, efficiency: f64) -> Self {
        self.charge_efficiency = Some(efficiency);
        self
    }

    pub fn discharge_efficiency(mut self, efficiency: f64) -> Self {
        self.discharge_efficiency = Some(efficiency);
        self
    }

    /// Build a buffer control space. Storage-only fields are ignored.
    pub fn build_buffer(self) -> ControlSpaceResult<BufferControlSpace> {
        self.buffer_parameters().map(BufferControlSpace::from_validated)
    }

    /// Build a storage control space.
    pub fn build_storage(self) -> ControlSpaceResult<StorageControlSpace> {
        let discharge_speed = self
            .discharge_speed
            .clone()
            .ok_or_else(|| ControlSpaceError::missing("discharge speed"))?;
        let charge_efficiency = self
            .charge_efficiency
            .ok_or_else(|| ControlSpaceError::missing("charge efficiency"))?;
        let discharge_efficiency = self
            .discharge_efficiency
            .ok_or_else(|| ControlSpaceError::missing("discharge efficiency"))?;
        let params = self.buffer_parameters()?;

        let storage = StorageExtension {
            discharge_speed,
            charge_efficiency: ensure_unit_interval(charge_efficiency, "charge efficiency")?,
            discharge_efficiency: ensure_unit_interval(
                discharge_efficiency,
                "discharge efficiency",
            )?,
        };
        Ok(StorageControlSpace::from_validated(params, storage))
    }

    fn buffer_parameters(&self) -> ControlSpaceResult<BufferParameters> {
        let resource_id = self
            .resource_id
            .clone()
            .ok_or_else(|| ControlSpaceError::missing("resource id"))?;
        let valid_from = self
            .valid_from
            .ok_or_else(|| ControlSpaceError::missing("valid from"))?;
        let valid_thru = self
            .valid_thru
            .ok_or_else(|| ControlSpaceError::missing("valid thru"))?;
        let total_capacity = self
            .total_capacity
            .ok_or_else(|| ControlSpaceError::missing("total capacity"))?;
        let state_of_charge = self
            .state_of_charge
            .ok_or_else(|| ControlSpaceError::missing("state of charge"))?;
        let charge_speed = self
            .charge_speed
            .clone()
            .ok_or_else(|| ControlSpaceError::missing("charge speed"))?;
        let self_discharge = self
            .self_discharge
            .ok_or_else(|| ControlSpaceError::missing("self discharge"))?;
        let min_on_period = self
            .min_on_period
            .ok_or_else(|| ControlSpaceError::missing("minimum on period"))?;
        let min_off_period = self
            .min_off_period
            .ok_or_else(|| ControlSpaceError::missing("minimum off period"))?;

        if valid_thru < valid_from {
            return Err(ControlSpaceError::InvalidArgument {
                what: format!("valid thru {valid_thru} precedes valid from {valid_from}"),
            });
        }
        ensure_non_negative(as_joules(total_capacity), "total capacity")?;
        ensure_non_negative(as_watts(self_discharge), "self discharge")?;
        ensure_non_negative(as_seconds(min_on_period), "minimum on period")?;
        ensure_non_negative(as_seconds(min_off_period), "minimum off period")?;
        let state_of_charge = ensure_unit_interval(state_of_charge, "state of charge")?;

        let target = match (self.target_time, self.target_state_of_charge) {
            (Some(time), Some(soc)) => Some(ChargeTarget {
                time,
                state_of_charge: ensure_unit_interval(soc, "target state of charge")?,
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ControlSpaceError::InvalidConfiguration {
                    what: "target time is set without a target state of charge".to_string(),
                });
            }
            (None, Some(_)) => {
                return Err(ControlSpaceError::InvalidConfiguration {
                    what: "target state of charge is set without a target time".to_string(),
                });
            }
        };

        Ok(BufferParameters {
            resource_id,
            valid_from,
            valid_thru,
            expiration_time: self.expiration_time,
            total_capacity,
            state_of_charge,
            charge_speed,
            self_discharge,
            min_on_period,
            min_off_period,
            target,
        })
    }
}

fn ensure_non_negative(v: f64, what: &str) -> ControlSpaceResult<()> {
    // NaN fails this comparison too
    if v >= 0.0 {
        Ok(())
    } else {
        Err(ControlSpaceError::InvalidArgument {
            what: format!("{what} must be non-negative but is {v}"),
        })
    }
}
