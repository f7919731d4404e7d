//! Wall-clock instants.
//!
//! Nothing in flexpower reads the system clock on its own: every query takes an
//! `Instant` argument, which keeps the engine deterministic under test.

use chrono::{DateTime, TimeDelta, Utc};

use crate::units::{Time, scalar::as_seconds};

/// A point in time, UTC.
pub type Instant = DateTime<Utc>;

/// `base` shifted by a physical duration, rounded to whole milliseconds.
///
/// Durations too large for `chrono` saturate at the representable extremes.
pub fn instant_after(base: Instant, duration: Time) -> Instant {
    let millis = (as_seconds(duration) * 1_000.0).round();
    if millis.is_nan() {
        return base;
    }
    // `as` saturates for out-of-range floats
    match TimeDelta::try_milliseconds(millis as i64).and_then(|d| base.checked_add_signed(d)) {
        Some(t) => t,
        None if millis < 0.0 => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}
