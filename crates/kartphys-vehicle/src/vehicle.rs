use kartphys_core::{DriverInput, GroundProbe, Scalar, StepCtx, StepHasher, Vec3, VehicleBody};
use kartphys_steering::{AckermannGeometry, AckermannParams, SteeringConfigError};
use kartphys_wheel::{Wheel, WheelConfigError, WheelParams, WheelPose};
use thiserror::Error;

/// Static vehicle description: wheel layout plus steering geometry.
#[derive(Clone, Debug)]
pub struct VehicleParams {
    /// Per-wheel parameters (index 0..N).
    pub wheels: Vec<WheelParams>,
    /// Front-axle steering geometry.
    pub steering: AckermannParams,
    /// Index into `wheels` of the left steered wheel.
    pub steer_left: usize,
    /// Index into `wheels` of the right steered wheel.
    pub steer_right: usize,
}

/// Rejected when the vehicle is built; stepping never validates.
#[derive(Debug, Error)]
pub enum VehicleConfigError {
    #[error("vehicle needs at least one wheel")]
    NoWheels,
    #[error("steered wheel index {index} out of range ({wheels} wheels)")]
    SteerIndexOutOfRange { index: usize, wheels: usize },
    #[error("left and right steered wheels must differ, both are {0}")]
    SteerIndicesEqual(usize),
    #[error("wheel {index}: {source}")]
    Wheel { index: usize, source: WheelConfigError },
    #[error(transparent)]
    Steering(#[from] SteeringConfigError),
}

/// Totals accumulated while stepping every wheel once.
#[derive(Copy, Clone, Debug, Default)]
pub struct StepReport {
    pub wheels_grounded: u32,
    /// Summed signed suspension magnitudes (N).
    pub suspension_total: Scalar,
    /// Summed signed drive/brake forces (N).
    pub drive_total: Scalar,
    /// Summed signed lateral grip forces (N).
    pub lateral_total: Scalar,
}

/// Position/speed pair exported over the camera boundary. A chase camera
/// needs nothing else from the dynamics.
#[derive(Copy, Clone, Debug)]
pub struct FollowSample {
    pub position: Vec3,
    pub speed: Scalar,
}

/// A whole car: wheels, steering geometry, and the input it currently holds.
#[derive(Clone, Debug)]
pub struct Vehicle {
    wheels: Vec<Wheel>,
    steering: AckermannGeometry,
    steer_left: usize,
    steer_right: usize,
    input: DriverInput,
}

impl Vehicle {
    pub fn new(params: VehicleParams) -> Result<Self, VehicleConfigError> {
        if params.wheels.is_empty() {
            return Err(VehicleConfigError::NoWheels);
        }
        for index in [params.steer_left, params.steer_right] {
            if index >= params.wheels.len() {
                return Err(VehicleConfigError::SteerIndexOutOfRange {
                    index,
                    wheels: params.wheels.len(),
                });
            }
        }
        if params.steer_left == params.steer_right {
            return Err(VehicleConfigError::SteerIndicesEqual(params.steer_left));
        }
        let steering = AckermannGeometry::new(params.steering)?;
        let mut wheels = Vec::with_capacity(params.wheels.len());
        for (index, &wp) in params.wheels.iter().enumerate() {
            wheels.push(
                Wheel::new(wp).map_err(|source| VehicleConfigError::Wheel { index, source })?,
            );
        }
        Ok(Self {
            wheels,
            steering,
            steer_left: params.steer_left,
            steer_right: params.steer_right,
            input: DriverInput::default(),
        })
    }

    /// Latch driver axes for the steps and frames that follow.
    ///
    /// Both axes clamp to [-1, 1]. The steering targets land on the two
    /// steered wheels as plain values; nothing else reads the geometry.
    pub fn apply_input(&mut self, input: DriverInput) {
        let steer = input.steer.clamp(-1.0, 1.0);
        let throttle = input.throttle.clamp(-1.0, 1.0);
        self.input = DriverInput { steer, throttle };
        let angles = self.steering.steer_angles(steer);
        self.wheels[self.steer_left].state.target_steer_deg = angles.left_deg;
        self.wheels[self.steer_right].state.target_steer_deg = angles.right_deg;
    }

    /// Fixed-rate phase: every wheel probes and pushes on the chassis once.
    /// Wheels only accumulate into the body, so their order cannot matter.
    pub fn advance_physics<B, G>(&mut self, body: &mut B, probe: &G, ctx: StepCtx) -> StepReport
    where
        B: VehicleBody + ?Sized,
        G: GroundProbe + ?Sized,
    {
        let mut report = StepReport::default();
        for w in &mut self.wheels {
            let out = w.advance_physics(self.input.throttle, body, probe, ctx);
            if out.grounded {
                report.wheels_grounded += 1;
            }
            report.suspension_total += out.suspension;
            report.drive_total += out.longitudinal;
            report.lateral_total += out.lateral;
        }
        report
    }

    /// Frame-rate phase: cosmetic steering ease and wheel spin on every wheel.
    pub fn advance_visual(&mut self, dt: Scalar) {
        for w in &mut self.wheels {
            w.advance_visual(dt);
        }
    }

    #[inline] pub fn wheels(&self) -> &[Wheel] { &self.wheels }
    #[inline] pub fn input(&self) -> DriverInput { self.input }
    #[inline] pub fn steering(&self) -> &AckermannGeometry { &self.steering }

    /// Mesh placements in wheel order, for a renderer.
    pub fn wheel_poses(&self) -> impl Iterator<Item = WheelPose> + '_ {
        self.wheels.iter().map(|w| w.pose())
    }

    /// What a chase camera needs: where the body is and how fast it moves.
    pub fn follow_sample<B: VehicleBody + ?Sized>(&self, body: &B) -> FollowSample {
        let pose = body.pose();
        FollowSample {
            position: pose.pos,
            speed: body.point_velocity(pose.pos).length(),
        }
    }

    /// Fold all wheel state into `h`. The chassis digests separately on the
    /// host side.
    pub fn digest(&self, h: &mut StepHasher) {
        for w in &self.wheels {
            w.digest(h);
        }
    }
}
