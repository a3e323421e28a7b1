use glam::Vec3 as GVec3;
use kartphys_core::hash::hash_scalar;
use kartphys_core::{
    wrap_angle, GroundProbe, Isometry, Quat, Scalar, StepCtx, StepHasher, Vec3, VehicleBody,
};
use thiserror::Error;

/// Suspension, tire and drivetrain parameters for one wheel.
#[derive(Copy, Clone, Debug)]
pub struct WheelParams {
    /// Attach point in chassis space.
    pub mount: Vec3,
    /// Spring length with no load (m).
    pub rest_length: Scalar,
    /// Travel allowed to either side of rest (m).
    pub travel: Scalar,
    /// Spring rate (N/m).
    pub spring_stiffness: Scalar,
    /// Damper rate (N·s/m).
    pub damper_stiffness: Scalar,
    /// Rolling radius (m).
    pub wheel_radius: Scalar,
    /// Lateral grip scale (N of side force per m/s of slip per N of load).
    pub lateral_grip: Scalar,
    /// Whether throttle pushes this wheel.
    pub driven: bool,
    /// Drive force per N of load at full throttle.
    pub engine_power: Scalar,
    /// Brake force per N of load at full pedal.
    pub brake_power: Scalar,
    /// Rate (1/s) at which the visual phase eases toward the steer target.
    pub steer_smoothing: Scalar,
    /// Rate (1/s) at which the remembered roll speed winds down while
    /// airborne. Zero keeps the wheels spinning at their last grounded speed.
    pub spin_decay: Scalar,
}

impl Default for WheelParams {
    /// Small-buggy tune.
    fn default() -> Self {
        Self {
            mount: Vec3::ZERO,
            rest_length: 0.45,
            travel: 0.1,
            spring_stiffness: 40_000.0, // N/m
            damper_stiffness: 4_000.0,  // N·s/m
            wheel_radius: 0.285,
            lateral_grip: 2.0,
            driven: false,
            engine_power: 1.0,
            brake_power: 2.0,
            steer_smoothing: 6.0,
            spin_decay: 2.0,
        }
    }
}

/// Rejected when a wheel is built; the per-tick path never validates.
#[derive(Debug, Error, PartialEq)]
pub enum WheelConfigError {
    /// A length or radius that must be strictly positive is not.
    #[error("wheel {field} must be positive and finite, got {value}")]
    MustBePositive {
        /// Offending parameter.
        field: &'static str,
        /// Value as given.
        value: f32,
    },
    /// A rate or coefficient that may be zero is negative or non-finite.
    #[error("wheel {field} must be non-negative and finite, got {value}")]
    MustBeNonNegative {
        /// Offending parameter.
        field: &'static str,
        /// Value as given.
        value: f32,
    },
    /// The mount point contains NaN or infinity.
    #[error("wheel mount must be finite, got ({0}, {1}, {2})")]
    NonFiniteMount(f32, f32, f32),
}

impl WheelParams {
    /// Check every parameter once, up front.
    pub fn validate(&self) -> Result<(), WheelConfigError> {
        if !self.mount.is_finite() {
            return Err(WheelConfigError::NonFiniteMount(
                self.mount.x,
                self.mount.y,
                self.mount.z,
            ));
        }
        for (field, value) in [
            ("rest_length", self.rest_length),
            ("wheel_radius", self.wheel_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(WheelConfigError::MustBePositive { field, value });
            }
        }
        for (field, value) in [
            ("travel", self.travel),
            ("spring_stiffness", self.spring_stiffness),
            ("damper_stiffness", self.damper_stiffness),
            ("lateral_grip", self.lateral_grip),
            ("engine_power", self.engine_power),
            ("brake_power", self.brake_power),
            ("steer_smoothing", self.steer_smoothing),
            ("spin_decay", self.spin_decay),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WheelConfigError::MustBeNonNegative { field, value });
            }
        }
        Ok(())
    }
}

/// Ground contact measured by the most recent fixed step.
#[derive(Copy, Clone, Debug, Default)]
pub struct ContactSample {
    /// Whether the probe hit within range.
    pub grounded: bool,
    /// Ray distance from the mount to the surface (m); zero when airborne.
    pub distance: Scalar,
    /// Hit point in world space.
    pub point: Vec3,
    /// Surface normal at the hit; telemetry only, forces use chassis up.
    pub normal: Vec3,
    /// Clamped spring length this step (m).
    pub spring_length: Scalar,
    /// Spring + damper magnitude along wheel up (N); signed.
    pub suspension_force: Scalar,
}

/// Mutable per-wheel state. Survives across steps; reset only on respawn.
#[derive(Copy, Clone, Debug)]
pub struct WheelState {
    /// Spring length committed by the last grounded step (m).
    pub prev_spring_length: Scalar,
    /// Smoothed steering angle the tire basis and the meshes use (deg).
    pub steer_deg: Scalar,
    /// Steering angle the smoothing chases (deg).
    pub target_steer_deg: Scalar,
    /// Rolling angle for the visual spin (rad, wrapped).
    pub spin_angle: Scalar,
    /// Longitudinal ground speed remembered from the last grounded step (m/s).
    pub ground_speed: Scalar,
    /// Contact measured by the most recent fixed step.
    pub contact: ContactSample,
}

/// What one wheel did in one fixed step, for vehicle-level telemetry.
#[derive(Copy, Clone, Debug, Default)]
pub struct WheelStepOutput {
    /// Whether the wheel touched ground this step.
    pub grounded: bool,
    /// Signed suspension magnitude (N).
    pub suspension: Scalar,
    /// Signed drive or brake force along the tire forward axis (N).
    pub longitudinal: Scalar,
    /// Signed grip force along the tire right axis (N).
    pub lateral: Scalar,
}

/// Mesh placement for renderers, relative to the mount.
#[derive(Copy, Clone, Debug)]
pub struct WheelPose {
    /// Offset from the mount in chassis space; the hub hangs one spring
    /// length down.
    pub offset: Vec3,
    /// Yaw around chassis up (deg).
    pub steer_deg: Scalar,
    /// Roll around the hub axis (rad).
    pub spin_angle: Scalar,
}

/// One suspension corner: immutable parameters plus running state.
#[derive(Copy, Clone, Debug)]
pub struct Wheel {
    /// Tuning, validated at construction.
    pub params: WheelParams,
    /// Running state.
    pub state: WheelState,
}

impl Wheel {
    /// Build a wheel at rest: spring memory starts at the rest length, as if
    /// the vehicle had been sitting on level ground.
    pub fn new(params: WheelParams) -> Result<Self, WheelConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            state: WheelState {
                prev_spring_length: params.rest_length,
                steer_deg: 0.0,
                target_steer_deg: 0.0,
                spin_angle: 0.0,
                ground_speed: 0.0,
                contact: ContactSample::default(),
            },
        })
    }

    /// Longest ray that can still touch ground: full droop plus the tire.
    #[inline]
    pub fn probe_range(&self) -> Scalar {
        self.params.rest_length + self.params.travel + self.params.wheel_radius
    }

    /// Tire forward/right axes in world space: chassis axes yawed by the
    /// current smoothed steer angle about chassis up. The fixed phase reads
    /// whatever angle the visual phase last produced, so a half-turned wheel
    /// pulls at its half-turned heading.
    fn tire_basis(&self, pose: &Isometry) -> (Vec3, Vec3) {
        let q = pose.rot * Quat::from_axis_angle(GVec3::Y, self.state.steer_deg.to_radians());
        (q * Vec3::X, q * Vec3::Z)
    }

    /// Fixed-rate phase: probe the ground under the mount and accumulate
    /// this wheel's forces on the chassis.
    ///
    /// `throttle` is the driver axis in [-1, 1]; callers clamp. A missed
    /// probe leaves the spring memory untouched and applies nothing. A
    /// non-positive `ctx.dt` skips the damper term (no rate to divide by)
    /// but still resolves the spring and tire forces.
    pub fn advance_physics<B, G>(
        &mut self,
        throttle: Scalar,
        body: &mut B,
        probe: &G,
        ctx: StepCtx,
    ) -> WheelStepOutput
    where
        B: VehicleBody + ?Sized,
        G: GroundProbe + ?Sized,
    {
        let pose = body.pose();
        let mount_w = pose.transform_point(self.params.mount);
        let up_w = pose.transform_vector(Vec3::Y);

        let Some(hit) = probe.cast_ray(mount_w, -up_w, self.probe_range()) else {
            self.state.contact = ContactSample::default();
            if ctx.dt > 0.0 {
                // Remembered roll speed winds down while airborne.
                self.state.ground_speed *=
                    (1.0 - self.params.spin_decay * ctx.dt).max(0.0);
            }
            return WheelStepOutput::default();
        };

        let min_len = self.params.rest_length - self.params.travel;
        let max_len = self.params.rest_length + self.params.travel;
        let spring_length = (hit.distance - self.params.wheel_radius).clamp(min_len, max_len);

        let spring_force =
            self.params.spring_stiffness * (self.params.rest_length - spring_length);
        let damper_force = if ctx.dt > 0.0 {
            self.params.damper_stiffness
                * ((self.state.prev_spring_length - spring_length) / ctx.dt)
        } else {
            0.0
        };
        let suspension = spring_force + damper_force;

        let (fwd_w, right_w) = self.tire_basis(&pose);
        let v = body.point_velocity(hit.point);
        let v_long = v.dot(fwd_w);
        let v_lat = v.dot(right_w);

        // Throttle opposing the rolling direction is braking; otherwise a
        // driven wheel pushes. Never both in one step.
        let longitudinal = if throttle * v_long < 0.0 {
            throttle * suspension * self.params.brake_power
        } else if self.params.driven {
            throttle * suspension * self.params.engine_power
        } else {
            0.0
        };
        let lateral = -v_lat * suspension * self.params.lateral_grip;

        body.apply_force_at_point(
            up_w * suspension + fwd_w * longitudinal + right_w * lateral,
            hit.point,
        );

        self.state.prev_spring_length = spring_length;
        self.state.ground_speed = v_long;
        self.state.contact = ContactSample {
            grounded: true,
            distance: hit.distance,
            point: hit.point,
            normal: hit.normal,
            spring_length,
            suspension_force: suspension,
        };

        WheelStepOutput { grounded: true, suspension, longitudinal, lateral }
    }

    /// Frame-rate phase: ease the steering angle toward its target and roll
    /// the spin angle from the last grounded speed. Purely cosmetic; a
    /// non-positive `dt` is a no-op.
    pub fn advance_visual(&mut self, dt: Scalar) {
        if dt <= 0.0 {
            return;
        }
        let blend = (self.params.steer_smoothing * dt).min(1.0);
        self.state.steer_deg +=
            (self.state.target_steer_deg - self.state.steer_deg) * blend;
        self.state.spin_angle = wrap_angle(
            self.state.spin_angle
                + self.state.ground_speed / self.params.wheel_radius * dt,
        );
    }

    /// Where the wheel mesh sits this frame.
    pub fn pose(&self) -> WheelPose {
        WheelPose {
            offset: Vec3::new(0.0, -self.state.prev_spring_length, 0.0),
            steer_deg: self.state.steer_deg,
            spin_angle: self.state.spin_angle,
        }
    }

    /// Fold the mutable state into a step digest.
    pub fn digest(&self, h: &mut StepHasher) {
        for s in [
            self.state.prev_spring_length,
            self.state.steer_deg,
            self.state.target_steer_deg,
            self.state.spin_angle,
            self.state.ground_speed,
        ] {
            hash_scalar(h, s);
        }
    }
}
