//! Float comparison and range checks shared by the domain crates.

use crate::{CoreError, CoreResult};

/// Absolute and relative slack for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// True if `a` and `b` agree within either tolerance.
pub fn nearly_equal(a: f64, b: f64, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: f64, what: &'static str) -> CoreResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Accept `v` only if it lies in the closed unit interval `[0, 1]`.
///
/// NaN is rejected along with every other out-of-range value.
pub fn ensure_unit_interval(v: f64, what: &'static str) -> CoreResult<f64> {
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(CoreError::InvalidArgument {
            what: format!("{what} should be in [0,1] but is {v}"),
        })
    }
}

/// Normalise `v` over `[min, max]` and clamp the result to `[0, 1]`.
///
/// A degenerate range (`max <= min`) yields 0.
pub fn normalize_clamped(v: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((v - min) / (max - min)).clamp(0.0, 1.0)
}
