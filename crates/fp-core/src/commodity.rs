//! Energy carriers and their units.
//!
//! A [`Commodity`] is a closed set of carriers. Each one pairs a billable unit
//! (what a meter accumulates) with a flow unit (the rate a device draws at).
//! Amounts and rates are tagged with the quantity they carry, so a gas volume
//! can never be averaged into an electrical power.

use core::fmt;

use crate::error::{CoreError, CoreResult};
use crate::units::scalar::{as_joules, as_m3, as_m3ps, as_seconds, as_watts};
use crate::units::{Energy, Power, Time, Volume, VolumeRate, m3ps, watts};

/// An energy/resource carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Commodity {
    Electricity,
    Gas,
}

impl Commodity {
    pub const ALL: [Commodity; 2] = [Commodity::Electricity, Commodity::Gas];

    /// Symbol of the unit an accumulated amount is billed in.
    pub fn billable_unit(self) -> &'static str {
        match self {
            Commodity::Electricity => "kWh",
            Commodity::Gas => "m³",
        }
    }

    /// Symbol of the unit a rate of this commodity is expressed in.
    pub fn flow_unit(self) -> &'static str {
        match self {
            Commodity::Electricity => "W",
            Commodity::Gas => "m³/s",
        }
    }

    /// Convert an accumulated amount over `duration` into an average rate.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `duration` is not strictly positive, or if `amount`
    /// belongs to a different commodity.
    pub fn average(self, amount: Amount, duration: Time) -> CoreResult<FlowRate> {
        match (self, amount) {
            (Commodity::Electricity, Amount::Energy(e)) => {
                average_electricity(e, duration).map(FlowRate::Power)
            }
            (Commodity::Gas, Amount::Volume(v)) => average_gas(v, duration).map(FlowRate::VolumeRate),
            (commodity, amount) => Err(CoreError::invalid_argument(format!(
                "cannot average a {} amount as {commodity}",
                amount.commodity()
            ))),
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Commodity::Electricity => f.write_str("electricity"),
            Commodity::Gas => f.write_str("gas"),
        }
    }
}

fn positive_seconds(duration: Time) -> CoreResult<f64> {
    let seconds = as_seconds(duration);
    // NaN fails this comparison too
    if seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(CoreError::invalid_argument(format!(
            "invalid duration: {seconds} seconds"
        )))
    }
}

/// Average electrical power of `amount` delivered over `duration`.
pub fn average_electricity(amount: Energy, duration: Time) -> CoreResult<Power> {
    let seconds = positive_seconds(duration)?;
    Ok(watts(as_joules(amount) / seconds))
}

/// Average volumetric flow of `amount` delivered over `duration`.
pub fn average_gas(amount: Volume, duration: Time) -> CoreResult<VolumeRate> {
    let seconds = positive_seconds(duration)?;
    Ok(m3ps(as_m3(amount) / seconds))
}

/// An accumulated quantity of some commodity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Energy(Energy),
    Volume(Volume),
}

impl Amount {
    pub fn commodity(&self) -> Commodity {
        match self {
            Amount::Energy(_) => Commodity::Electricity,
            Amount::Volume(_) => Commodity::Gas,
        }
    }
}

/// A rate of some commodity in its flow unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowRate {
    Power(Power),
    VolumeRate(VolumeRate),
}

impl FlowRate {
    /// The zero rate of `commodity`.
    pub fn zero(commodity: Commodity) -> Self {
        match commodity {
            Commodity::Electricity => FlowRate::Power(watts(0.0)),
            Commodity::Gas => FlowRate::VolumeRate(m3ps(0.0)),
        }
    }

    pub fn commodity(&self) -> Commodity {
        match self {
            FlowRate::Power(_) => Commodity::Electricity,
            FlowRate::VolumeRate(_) => Commodity::Gas,
        }
    }

    pub fn as_power(&self) -> Option<Power> {
        match self {
            FlowRate::Power(p) => Some(*p),
            FlowRate::VolumeRate(_) => None,
        }
    }

    pub fn as_volume_rate(&self) -> Option<VolumeRate> {
        match self {
            FlowRate::VolumeRate(q) => Some(*q),
            FlowRate::Power(_) => None,
        }
    }

    /// Numeric value in the commodity's flow unit (W or m³/s).
    pub fn value(&self) -> f64 {
        match self {
            FlowRate::Power(p) => as_watts(*p),
            FlowRate::VolumeRate(q) => as_m3ps(*q),
        }
    }
}

impl fmt::Display for FlowRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value(), self.commodity().flow_unit())
    }
}
