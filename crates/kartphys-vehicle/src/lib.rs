//! Whole-vehicle aggregation.
//!
//! A `Vehicle` owns its wheels and the steering geometry, fans driver
//! input out to them, and runs the two phases across all wheels against a
//! host body and ground probe. It owns no clock: the host scheduler decides
//! when the fixed phase and the visual phase tick.

mod vehicle;

pub use vehicle::{FollowSample, StepReport, Vehicle, VehicleConfigError, VehicleParams};
