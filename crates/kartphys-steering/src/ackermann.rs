use kartphys_core::Scalar;
use thiserror::Error;

/// Steering geometry of one front axle (meters).
#[derive(Copy, Clone, Debug)]
pub struct AckermannParams {
    /// Distance between the front and rear axle centers.
    pub wheel_base: Scalar,
    /// Distance between the rear wheels.
    pub rear_track: Scalar,
    /// Turn radius at full lock, measured from the turn center to the
    /// rear axle center.
    pub turn_radius: Scalar,
}

/// Rejected at construction; the per-frame path never validates.
#[derive(Debug, Error, PartialEq)]
pub enum SteeringConfigError {
    #[error("steering dimension {name} must be positive and finite, got {value}")]
    BadDimension { name: &'static str, value: f32 },
    #[error("turn radius {turn_radius} must exceed half the rear track ({rear_track})")]
    DegenerateGeometry { turn_radius: f32, rear_track: f32 },
}

/// Target angles for the steered pair, degrees. Positive steers left.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SteerAngles {
    pub left_deg: Scalar,
    pub right_deg: Scalar,
}

/// Ackermann angle distribution, built once per vehicle.
///
/// The wheel on the inside of the turn runs the smaller circle
/// (`turn_radius - rear_track/2`) and therefore always receives the
/// steeper angle; the outer wheel gets the shallower one. Which side is
/// inner follows the sign of the input.
#[derive(Copy, Clone, Debug)]
pub struct AckermannGeometry {
    params: AckermannParams,
    /// Inner-side magnitude at full lock (deg).
    lock_inner_deg: Scalar,
    /// Outer-side magnitude at full lock (deg).
    lock_outer_deg: Scalar,
}

impl AckermannGeometry {
    pub fn new(params: AckermannParams) -> Result<Self, SteeringConfigError> {
        for (name, value) in [
            ("wheel_base", params.wheel_base),
            ("rear_track", params.rear_track),
            ("turn_radius", params.turn_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SteeringConfigError::BadDimension { name, value });
            }
        }
        let half_track = 0.5 * params.rear_track;
        if params.turn_radius <= half_track {
            return Err(SteeringConfigError::DegenerateGeometry {
                turn_radius: params.turn_radius,
                rear_track: params.rear_track,
            });
        }
        let lock_inner_deg =
            (params.wheel_base / (params.turn_radius - half_track)).atan().to_degrees();
        let lock_outer_deg =
            (params.wheel_base / (params.turn_radius + half_track)).atan().to_degrees();
        Ok(Self { params, lock_inner_deg, lock_outer_deg })
    }

    #[inline] pub fn params(&self) -> AckermannParams { self.params }

    /// Angles at full left lock (`steer = 1`).
    pub fn full_lock(&self) -> SteerAngles {
        SteerAngles {
            left_deg: self.lock_inner_deg,
            right_deg: self.lock_outer_deg,
        }
    }

    /// Map a steering input in [-1, 1] to per-wheel target angles.
    ///
    /// Positive input turns left, which makes the left wheel the inner one;
    /// negative input mirrors the roles. Zero input returns exact zeros so
    /// a centered wheel never creeps.
    pub fn steer_angles(&self, steer: Scalar) -> SteerAngles {
        if steer > 0.0 {
            SteerAngles {
                left_deg: self.lock_inner_deg * steer,
                right_deg: self.lock_outer_deg * steer,
            }
        } else if steer < 0.0 {
            SteerAngles {
                left_deg: self.lock_outer_deg * steer,
                right_deg: self.lock_inner_deg * steer,
            }
        } else {
            SteerAngles::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn buggy() -> AckermannGeometry {
        AckermannGeometry::new(AckermannParams {
            wheel_base: 2.5,
            rear_track: 1.5,
            turn_radius: 5.0,
        })
        .expect("reference geometry is valid")
    }

    #[test]
    fn full_left_lock_matches_geometry() {
        let g = buggy();
        let a = g.steer_angles(1.0);
        assert_relative_eq!(a.left_deg, (2.5f32 / 4.25).atan().to_degrees(), epsilon = 1e-4);
        assert_relative_eq!(a.right_deg, (2.5f32 / 5.75).atan().to_degrees(), epsilon = 1e-4);
    }

    #[test]
    fn inner_wheel_is_always_steeper() {
        let g = buggy();
        for i in 1..=10 {
            let s = i as f32 / 10.0;
            let left_turn = g.steer_angles(s);
            assert!(left_turn.left_deg.abs() >= left_turn.right_deg.abs());
            let right_turn = g.steer_angles(-s);
            assert!(right_turn.right_deg.abs() >= right_turn.left_deg.abs());
        }
    }

    #[test]
    fn negative_input_mirrors_the_sides() {
        let g = buggy();
        let l = g.steer_angles(0.7);
        let r = g.steer_angles(-0.7);
        assert_relative_eq!(l.left_deg, -r.right_deg, epsilon = 1e-5);
        assert_relative_eq!(l.right_deg, -r.left_deg, epsilon = 1e-5);
        assert!(r.left_deg < 0.0 && r.right_deg < 0.0);
    }

    #[test]
    fn centered_input_is_exactly_zero() {
        let a = buggy().steer_angles(0.0);
        assert_eq!(a, SteerAngles::default());
        assert_eq!(a.left_deg.to_bits(), 0.0f32.to_bits());
    }

    #[test]
    fn input_scales_linearly() {
        let g = buggy();
        let full = g.steer_angles(1.0);
        let half = g.steer_angles(0.5);
        assert_relative_eq!(half.left_deg * 2.0, full.left_deg, epsilon = 1e-5);
        assert_relative_eq!(half.right_deg * 2.0, full.right_deg, epsilon = 1e-5);
    }

    #[test]
    fn rejects_degenerate_turn_radius() {
        let err = AckermannGeometry::new(AckermannParams {
            wheel_base: 2.5,
            rear_track: 1.5,
            turn_radius: 0.75,
        })
        .unwrap_err();
        assert_eq!(
            err,
            SteeringConfigError::DegenerateGeometry { turn_radius: 0.75, rear_track: 1.5 }
        );
    }

    #[test]
    fn rejects_nonsense_dimensions() {
        for (wb, rt, tr) in [
            (0.0, 1.5, 5.0),
            (-2.5, 1.5, 5.0),
            (2.5, f32::NAN, 5.0),
            (2.5, 1.5, f32::INFINITY),
        ] {
            let r = AckermannGeometry::new(AckermannParams {
                wheel_base: wb,
                rear_track: rt,
                turn_radius: tr,
            });
            assert!(r.is_err(), "({wb}, {rt}, {tr}) must be rejected");
        }
    }
}
