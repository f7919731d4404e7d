//! fp-control: control-space value objects.
//!
//! A control space is a validated snapshot of a device's flexibility, built
//! fresh for every negotiation cycle and handed to the counterpart. Nothing in
//! here changes after construction.

pub mod builder;
pub mod constraint;
pub mod error;
pub mod space;

pub use builder::ControlSpaceBuilder;
pub use constraint::{PowerConstraint, PowerConstraintList};
pub use error::{ControlSpaceError, ControlSpaceResult};
pub use space::{
    BufferControlSpace, BufferParameters, ChargeTarget, ControlSpace, StorageControlSpace,
    StorageExtension,
};
