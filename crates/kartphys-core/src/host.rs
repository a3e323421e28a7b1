//! Boundaries the vehicle core consumes but does not own.
//!
//! The chassis rigid body and the ground query live on the host side of
//! these traits; the wheel/steering code only ever sees the trait surface.

use crate::{Isometry, Scalar, Vec3};

/// Driver axes for one frame, both in [-1, 1].
///
/// Sampling a device is the host's problem; values are clamped where they
/// are applied.
#[derive(Copy, Clone, Debug, Default)]
pub struct DriverInput {
    /// + steers left, - steers right.
    pub steer: Scalar,
    /// + drives forward, - drives backward (or brakes against forward roll).
    pub throttle: Scalar,
}

/// One ground intersection returned by a probe.
#[derive(Copy, Clone, Debug)]
pub struct RayHit {
    /// Distance from the ray origin along the ray direction (m).
    pub distance: Scalar,
    /// Hit point in world space.
    pub point: Vec3,
    /// Surface normal at the hit (unit).
    pub normal: Vec3,
}

/// The chassis rigid body as the wheels see it.
///
/// Forces from different wheels only ever accumulate here, so the order
/// wheels are stepped in cannot matter.
pub trait VehicleBody {
    /// Current chassis placement.
    fn pose(&self) -> Isometry;
    /// Velocity of a world-space point rigidly attached to the body.
    fn point_velocity(&self, point: Vec3) -> Vec3;
    /// Accumulate a force acting at a world-space point for this step.
    fn apply_force_at_point(&mut self, force: Vec3, point: Vec3);
}

/// Ground query used by the suspension.
///
/// A miss is a normal steady state (wheel in the air), not an error.
pub trait GroundProbe {
    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_dist: Scalar) -> Option<RayHit>;
}
