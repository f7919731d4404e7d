//! Piecewise functions over a buffer's fill level.
//!
//! A [`FillLevelFunction`] is an ordered run of contiguous range elements. Every
//! element covers `[lower_bound, upper_bound)` except the last one, which also
//! includes its upper bound so that the declared maximum itself resolves to an
//! element. A fill level exactly on a shared boundary therefore belongs to the
//! element that starts there.

use fp_core::{Tolerances, nearly_equal};

use crate::behavior::{Behavior, ModeBehavior};
use crate::error::{EfiError, EfiResult};

/// One piece of a fill-level function.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeElement<T> {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub value: T,
}

impl<T> RangeElement<T> {
    pub fn new(lower_bound: f64, upper_bound: f64, value: T) -> Self {
        Self {
            lower_bound,
            upper_bound,
            value,
        }
    }
}

/// Ordered, gap-free sequence of range elements.
///
/// An empty function can be represented; every lookup on it fails with
/// `InvalidGraph`, which is how a malformed system description surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct FillLevelFunction<T> {
    elements: Vec<RangeElement<T>>,
}

impl<T> FillLevelFunction<T> {
    /// Build a function, checking that bounds are finite, strictly increasing
    /// within each element and contiguous between neighbours.
    pub fn new(elements: Vec<RangeElement<T>>) -> EfiResult<Self> {
        for (i, e) in elements.iter().enumerate() {
            if !e.lower_bound.is_finite() || !e.upper_bound.is_finite() {
                return Err(EfiError::invalid_graph(format!(
                    "range element {i} has a non-finite bound"
                )));
            }
            if e.lower_bound >= e.upper_bound {
                return Err(EfiError::invalid_graph(format!(
                    "range element {i} has lower bound {} not below upper bound {}",
                    e.lower_bound, e.upper_bound
                )));
            }
        }
        for (i, pair) in elements.windows(2).enumerate() {
            if !nearly_equal(pair[0].upper_bound, pair[1].lower_bound, Tolerances::default()) {
                return Err(EfiError::invalid_graph(format!(
                    "range elements {i} and {} are not contiguous ({} vs {})",
                    i + 1,
                    pair[0].upper_bound,
                    pair[1].lower_bound
                )));
            }
        }
        Ok(Self { elements })
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[RangeElement<T>] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&RangeElement<T>> {
        self.elements.get(index)
    }

    /// Lower bound of the first element.
    pub fn lower_bound(&self) -> Option<f64> {
        self.elements.first().map(|e| e.lower_bound)
    }

    /// Upper bound of the last element.
    pub fn upper_bound(&self) -> Option<f64> {
        self.elements.last().map(|e| e.upper_bound)
    }

    pub fn is_above_maximum(&self, fill_level: f64) -> bool {
        self.upper_bound().is_some_and(|max| fill_level > max)
    }

    pub fn is_below_minimum(&self, fill_level: f64) -> bool {
        self.lower_bound().is_some_and(|min| fill_level < min)
    }

    /// The element whose interval contains `fill_level`, without clamping.
    ///
    /// Neighbours only have to meet within tolerance, so a level falling in the
    /// sliver between one upper bound and the next lower bound belongs to the
    /// following element.
    pub fn range_element_for(&self, fill_level: f64) -> Option<&RangeElement<T>> {
        if self.is_below_minimum(fill_level) {
            return None;
        }
        let last = self.elements.len().checked_sub(1)?;
        self.elements.iter().enumerate().find_map(|(i, e)| {
            let below_upper = if i == last {
                fill_level <= e.upper_bound
            } else {
                fill_level < e.upper_bound
            };
            below_upper.then_some(e)
        })
    }

    /// The element for `fill_level`, clamping to the first/last element outside
    /// the declared domain.
    ///
    /// # Errors
    ///
    /// `InvalidGraph` if the function is empty.
    pub fn clamped_element(&self, fill_level: f64) -> EfiResult<&RangeElement<T>> {
        let (Some(first), Some(last)) = (self.elements.first(), self.elements.last()) else {
            return Err(EfiError::invalid_graph(
                "fill level function was not expected to be empty",
            ));
        };
        if self.is_above_maximum(fill_level) {
            return Ok(last);
        }
        if self.is_below_minimum(fill_level) {
            return Ok(first);
        }
        self.range_element_for(fill_level)
            .ok_or_else(|| EfiError::InternalInconsistency {
                what: format!("no range element covers fill level {fill_level}"),
            })
    }

    /// Clamped lookup of the value at `fill_level`.
    pub fn value_at(&self, fill_level: f64) -> EfiResult<&T> {
        self.clamped_element(fill_level).map(|e| &e.value)
    }
}

impl ModeBehavior for FillLevelFunction<Behavior> {
    fn behavior_at(&self, fill_level: f64) -> EfiResult<&Behavior> {
        self.value_at(fill_level)
    }

    fn fill_level_domain(&self) -> EfiResult<Option<(f64, f64)>> {
        match (self.lower_bound(), self.upper_bound()) {
            (Some(min), Some(max)) => Ok(Some((min, max))),
            _ => Err(EfiError::invalid_graph(
                "fill level function was not expected to be empty",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_piece() -> FillLevelFunction<&'static str> {
        FillLevelFunction::new(vec![
            RangeElement::new(0.0, 0.5, "low"),
            RangeElement::new(0.5, 1.0, "high"),
        ])
        .unwrap()
    }

    #[test]
    fn bounds_come_from_first_and_last() {
        let f = two_piece();
        assert_eq!(f.lower_bound(), Some(0.0));
        assert_eq!(f.upper_bound(), Some(1.0));
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn lookup_is_half_open_with_closed_maximum() {
        let f = two_piece();
        assert_eq!(*f.value_at(0.0).unwrap(), "low");
        assert_eq!(*f.value_at(0.49).unwrap(), "low");
        // shared boundary belongs to the element that starts there
        assert_eq!(*f.value_at(0.5).unwrap(), "high");
        // the declared maximum is covered by the last element
        assert_eq!(*f.value_at(1.0).unwrap(), "high");
    }

    #[test]
    fn out_of_domain_levels_clamp() {
        let f = two_piece();
        assert_eq!(*f.value_at(-0.2).unwrap(), "low");
        assert_eq!(*f.value_at(1.5).unwrap(), "high");
        assert!(f.range_element_for(1.5).is_none());
    }

    #[test]
    fn empty_function_fails_lookup() {
        let f: FillLevelFunction<&str> = FillLevelFunction::new(vec![]).unwrap();
        assert!(f.is_empty());
        assert!(matches!(
            f.value_at(0.3),
            Err(EfiError::InvalidGraph { .. })
        ));
    }

    #[test]
    fn level_between_nearly_touching_elements_resolves_to_the_next() {
        let seam = 0.5 + 1e-13;
        let f = FillLevelFunction::new(vec![
            RangeElement::new(0.0, 0.5, "low"),
            RangeElement::new(seam, 1.0, "high"),
        ])
        .unwrap();

        assert_eq!(*f.value_at(0.5).unwrap(), "high");
        assert_eq!(*f.value_at(0.5 + 5e-14).unwrap(), "high");
        assert_eq!(*f.value_at(seam).unwrap(), "high");
        assert_eq!(*f.value_at(0.5 - 1e-9).unwrap(), "low");
        assert!(f.range_element_for(-1e-9).is_none());
    }

    #[test]
    fn gaps_and_inverted_bounds_are_rejected() {
        let gap = FillLevelFunction::new(vec![
            RangeElement::new(0.0, 0.4, ()),
            RangeElement::new(0.5, 1.0, ()),
        ]);
        assert!(matches!(gap, Err(EfiError::InvalidGraph { .. })));

        let inverted = FillLevelFunction::new(vec![RangeElement::new(1.0, 0.0, ())]);
        assert!(inverted.is_err());

        let nan = FillLevelFunction::new(vec![RangeElement::new(f64::NAN, 1.0, ())]);
        assert!(nan.is_err());
    }
}
