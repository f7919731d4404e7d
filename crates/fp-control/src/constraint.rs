//! Power ranges a device can charge or discharge at.

use fp_core::{Power, ensure_finite};
use fp_core::scalar::as_watts;

use crate::error::{ControlSpaceError, ControlSpaceResult};

/// A closed power interval `[lower, upper]`.
///
/// A single admissible power is expressed as `lower == upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerConstraint {
    lower: Power,
    upper: Power,
}

impl PowerConstraint {
    pub fn new(lower: Power, upper: Power) -> ControlSpaceResult<Self> {
        let lo = ensure_finite(as_watts(lower), "power constraint lower bound")?;
        let hi = ensure_finite(as_watts(upper), "power constraint upper bound")?;
        if lo > hi {
            return Err(ControlSpaceError::InvalidArgument {
                what: format!("power constraint lower bound {lo} W exceeds upper bound {hi} W"),
            });
        }
        Ok(Self { lower, upper })
    }

    pub fn exact(power: Power) -> ControlSpaceResult<Self> {
        Self::new(power, power)
    }

    pub fn lower(&self) -> Power {
        self.lower
    }

    pub fn upper(&self) -> Power {
        self.upper
    }

    pub fn contains(&self, power: Power) -> bool {
        self.lower <= power && power <= self.upper
    }
}

/// Non-empty list of power constraints describing a speed curve.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerConstraintList {
    constraints: Vec<PowerConstraint>,
}

impl PowerConstraintList {
    pub fn new(constraints: Vec<PowerConstraint>) -> ControlSpaceResult<Self> {
        if constraints.is_empty() {
            return Err(ControlSpaceError::InvalidArgument {
                what: "power constraint list must not be empty".to_string(),
            });
        }
        Ok(Self { constraints })
    }

    /// A list admitting exactly the given powers.
    pub fn from_powers(powers: impl IntoIterator<Item = Power>) -> ControlSpaceResult<Self> {
        let constraints = powers
            .into_iter()
            .map(PowerConstraint::exact)
            .collect::<ControlSpaceResult<Vec<_>>>()?;
        Self::new(constraints)
    }

    pub fn constraints(&self) -> &[PowerConstraint] {
        &self.constraints
    }

    pub fn contains(&self, power: Power) -> bool {
        self.constraints.iter().any(|c| c.contains(power))
    }

    /// Smallest lower bound over the list.
    pub fn minimum(&self) -> Power {
        self.constraints
            .iter()
            .map(PowerConstraint::lower)
            .fold(self.constraints[0].lower, |acc, p| if p < acc { p } else { acc })
    }

    /// Largest upper bound over the list.
    pub fn maximum(&self) -> Power {
        self.constraints
            .iter()
            .map(PowerConstraint::upper)
            .fold(self.constraints[0].upper, |acc, p| if p > acc { p } else { acc })
    }
}
