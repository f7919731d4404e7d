//! fp-core: stable foundation for flexpower.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (tolerances + range helpers)
//! - ids (typed identifiers for modes, timers, actuators and resources)
//! - time (the `Instant` every query takes explicitly)
//! - commodity (energy carriers and rate averaging)
//! - profile (commodity profiles built from averaged elements)
//! - error (shared error types)

pub mod commodity;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod profile;
pub mod time;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use commodity::{Amount, Commodity, FlowRate};
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use profile::{CommodityProfile, ProfileElement};
pub use time::{Instant, instant_after};
pub use units::*;
