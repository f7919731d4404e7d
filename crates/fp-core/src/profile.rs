//! Commodity profiles: consecutive slices of time, each with an accumulated amount.

use crate::commodity::{Amount, Commodity, FlowRate};
use crate::error::{CoreError, CoreResult};
use crate::units::{Time, s};

/// One slice of a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileElement {
    pub duration: Time,
    pub amount: Amount,
}

impl ProfileElement {
    pub fn new(duration: Time, amount: Amount) -> Self {
        Self { duration, amount }
    }

    pub fn commodity(&self) -> Commodity {
        self.amount.commodity()
    }

    /// Average rate over this slice.
    pub fn average(&self) -> CoreResult<FlowRate> {
        self.commodity().average(self.amount, self.duration)
    }
}

/// A non-empty sequence of profile elements of a single commodity.
#[derive(Debug, Clone, PartialEq)]
pub struct CommodityProfile {
    elements: Vec<ProfileElement>,
}

impl CommodityProfile {
    /// Build a profile.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `elements` is empty or mixes commodities.
    pub fn new(elements: Vec<ProfileElement>) -> CoreResult<Self> {
        let first = elements
            .first()
            .ok_or_else(|| CoreError::invalid_argument("a commodity profile cannot be empty"))?;
        let commodity = first.commodity();
        if elements.iter().any(|e| e.commodity() != commodity) {
            return Err(CoreError::invalid_argument(
                "a commodity profile can only consist of elements of the same commodity",
            ));
        }
        Ok(Self { elements })
    }

    pub fn commodity(&self) -> Commodity {
        // non-empty by construction
        self.elements[0].commodity()
    }

    pub fn elements(&self) -> &[ProfileElement] {
        &self.elements
    }

    pub fn total_duration(&self) -> Time {
        self.elements.iter().fold(s(0.0), |acc, e| acc + e.duration)
    }

    /// Per-element average rates, in order.
    pub fn averages(&self) -> CoreResult<Vec<FlowRate>> {
        self.elements.iter().map(ProfileElement::average).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::scalar::as_seconds;
    use crate::units::{kwh, m3, minutes};

    #[test]
    fn empty_profile_is_rejected() {
        assert!(CommodityProfile::new(vec![]).is_err());
    }

    #[test]
    fn mixed_commodities_are_rejected() {
        let result = CommodityProfile::new(vec![
            ProfileElement::new(minutes(15.0), Amount::Energy(kwh(1.0))),
            ProfileElement::new(minutes(15.0), Amount::Volume(m3(1.0))),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn averages_follow_elements() {
        let profile = CommodityProfile::new(vec![
            ProfileElement::new(minutes(30.0), Amount::Energy(kwh(1.0))),
            ProfileElement::new(minutes(60.0), Amount::Energy(kwh(1.0))),
        ])
        .unwrap();

        assert_eq!(profile.commodity(), Commodity::Electricity);
        assert!((as_seconds(profile.total_duration()) - 5_400.0).abs() < 1e-9);

        let rates = profile.averages().unwrap();
        assert!((rates[0].value() - 2_000.0).abs() < 1e-9);
        assert!((rates[1].value() - 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn zero_length_element_fails_on_average() {
        let profile =
            CommodityProfile::new(vec![ProfileElement::new(s(0.0), Amount::Volume(m3(1.0)))])
                .unwrap();
        assert!(profile.averages().is_err());
    }
}
