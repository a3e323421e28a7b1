//! Reference chassis rigid body.
//!
//! One free 6-dof body with box inertia, enough to put wheels under in
//! demos and tests. Wheels talk to it through `kartphys_core::VehicleBody`;
//! the host scheduler calls `integrate` once per fixed tick after all
//! wheels have pushed.

use kartphys_core::hash::{hash_quat, hash_vec3};
use kartphys_core::types::{Isometry, Mat3, Vec3, Velocity};
use kartphys_core::{Quat, Scalar, StepHasher, VehicleBody};

/// Input descriptor when creating a chassis.
#[derive(Copy, Clone, Debug)]
pub struct ChassisDesc {
    pub pose: Isometry,
    pub vel: Velocity,
    /// Mass (kg), must be positive and finite.
    pub mass: Scalar,
    /// Box half extents (m) used for the inertia tensor.
    pub half_extents: Vec3,
}

/// A single dynamic rigid body integrating accumulated wheel forces.
#[derive(Clone, Debug)]
pub struct Chassis {
    pose: Isometry,
    vel: Velocity,
    inv_mass: Scalar,
    inv_inertia_local: Mat3,
    force_accum: Vec3,
    torque_accum: Vec3,
}

impl Chassis {
    pub fn new(desc: ChassisDesc) -> Self {
        assert!(
            desc.mass.is_finite() && desc.mass > 0.0,
            "chassis mass must be positive"
        );
        let he = desc.half_extents;
        assert!(
            he.min_element() > 0.0,
            "chassis half extents must be positive"
        );
        // Solid box: I_x = m (b^2 + c^2) / 3 for half extents b, c.
        let m = desc.mass;
        let ix = m * (he.y * he.y + he.z * he.z) / 3.0;
        let iy = m * (he.x * he.x + he.z * he.z) / 3.0;
        let iz = m * (he.x * he.x + he.y * he.y) / 3.0;
        let inv_inertia_local =
            Mat3::from_diagonal(glam::Vec3::new(1.0 / ix, 1.0 / iy, 1.0 / iz));
        Self {
            pose: desc.pose,
            vel: desc.vel,
            inv_mass: 1.0 / m,
            inv_inertia_local,
            force_accum: Vec3::ZERO,
            torque_accum: Vec3::ZERO,
        }
    }

    #[inline] pub fn velocity(&self) -> Velocity { self.vel }
    #[inline] pub fn set_velocity(&mut self, v: Velocity) { self.vel = v; }
    #[inline] pub fn set_pose(&mut self, pose: Isometry) { self.pose = pose; }

    /// World-space inverse inertia: R * I^-1_local * R^T.
    fn inv_inertia_world(&self) -> Mat3 {
        let r = Mat3::from_quat(self.pose.rot);
        r * self.inv_inertia_local * r.transpose()
    }

    /// Semi-implicit Euler: velocities pick up gravity plus the forces the
    /// wheels accumulated this tick, then the pose follows. Accumulators
    /// clear afterwards.
    pub fn integrate(&mut self, gravity: Vec3, dt: Scalar) {
        if dt <= 0.0 {
            self.force_accum = Vec3::ZERO;
            self.torque_accum = Vec3::ZERO;
            return;
        }
        self.vel.lin += (gravity + self.force_accum * self.inv_mass) * dt;
        self.vel.ang += self.inv_inertia_world() * self.torque_accum * dt;

        self.pose.pos += self.vel.lin * dt;
        let dtheta = self.vel.ang * dt;
        if dtheta.length_squared() > 0.0 {
            // Small-angle quaternion: (v*0.5, 1) normalized.
            let dq = Quat::from_xyzw(dtheta.x * 0.5, dtheta.y * 0.5, dtheta.z * 0.5, 1.0)
                .normalize();
            self.pose.rot = (dq * self.pose.rot).normalize();
        }

        self.force_accum = Vec3::ZERO;
        self.torque_accum = Vec3::ZERO;
    }

    /// Fold pose and velocity into a step digest.
    pub fn digest(&self, h: &mut StepHasher) {
        hash_vec3(h, &self.pose.pos);
        hash_quat(h, &self.pose.rot);
        hash_vec3(h, &self.vel.lin);
        hash_vec3(h, &self.vel.ang);
    }
}

impl VehicleBody for Chassis {
    fn pose(&self) -> Isometry {
        self.pose
    }

    fn point_velocity(&self, point: Vec3) -> Vec3 {
        self.vel.lin + self.vel.ang.cross(point - self.pose.pos)
    }

    fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.force_accum += force;
        self.torque_accum += (point - self.pose.pos).cross(force);
    }
}
