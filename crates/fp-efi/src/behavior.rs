//! Operating behavior while a device is in a running mode.

use std::collections::BTreeMap;

use fp_core::{Commodity, FlowRate, Power, watts};

use crate::error::EfiResult;

/// Consumption, cost and buffer effect of operating in a mode.
///
/// For buffer devices one `Behavior` applies to a fill-level range of a mode;
/// for unconstrained devices it applies to the whole mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Behavior {
    commodity_consumption: BTreeMap<Commodity, FlowRate>,
    /// Operating cost per second, in the currency agreed at registration.
    pub running_costs: f64,
    /// Change of fill level per second while in this behavior.
    pub filling_rate: f64,
}

impl Behavior {
    pub fn new(running_costs: f64) -> Self {
        Self {
            commodity_consumption: BTreeMap::new(),
            running_costs,
            filling_rate: 0.0,
        }
    }

    /// Add (or replace) the consumption of the rate's commodity.
    pub fn with_consumption(mut self, rate: FlowRate) -> Self {
        self.commodity_consumption.insert(rate.commodity(), rate);
        self
    }

    pub fn with_filling_rate(mut self, filling_rate: f64) -> Self {
        self.filling_rate = filling_rate;
        self
    }

    /// Declared consumption of `commodity`, zero if none was declared.
    pub fn consumption(&self, commodity: Commodity) -> FlowRate {
        self.commodity_consumption
            .get(&commodity)
            .copied()
            .unwrap_or_else(|| FlowRate::zero(commodity))
    }

    /// Electrical power drawn in this behavior.
    pub fn electricity(&self) -> Power {
        self.consumption(Commodity::Electricity)
            .as_power()
            .unwrap_or_else(|| watts(0.0))
    }

    pub fn commodity_consumption(&self) -> &BTreeMap<Commodity, FlowRate> {
        &self.commodity_consumption
    }
}

/// What a running mode carries as its behavior.
///
/// Implemented by a plain [`Behavior`] (unconstrained devices) and by a
/// fill-level function of behaviors (buffer devices).
pub trait ModeBehavior: Clone + Send + Sync + std::fmt::Debug {
    /// The behavior in effect at `fill_level`.
    ///
    /// Levels outside the declared range resolve to the nearest end.
    fn behavior_at(&self, fill_level: f64) -> EfiResult<&Behavior>;

    /// Declared `(min, max)` fill-level domain, `None` if the behavior does not
    /// depend on a fill level.
    fn fill_level_domain(&self) -> EfiResult<Option<(f64, f64)>>;
}

impl ModeBehavior for Behavior {
    fn behavior_at(&self, _fill_level: f64) -> EfiResult<&Behavior> {
        Ok(self)
    }

    fn fill_level_domain(&self) -> EfiResult<Option<(f64, f64)>> {
        Ok(None)
    }
}
