//! Ackermann steering distribution.
//!
//! Maps one driver steering axis onto two front-wheel target angles so the
//! wheels track concentric circles instead of fighting each other.

mod ackermann;

pub use ackermann::{AckermannGeometry, AckermannParams, SteerAngles, SteeringConfigError};
