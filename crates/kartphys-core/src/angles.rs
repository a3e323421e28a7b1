use crate::Scalar;
use std::f32::consts::{PI, TAU};

/// Wrap an angle in radians to (-PI, PI].
#[inline]
pub fn wrap_angle(a: Scalar) -> Scalar {
    let mut a = a % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_preserves_angle_modulo_turns() {
        for k in -12..=12 {
            let a = wrap_angle(0.37 + k as f32 * TAU);
            assert!((a - 0.37).abs() < 1e-4);
        }
        assert_eq!(wrap_angle(0.0), 0.0);
    }

    #[test]
    fn wrap_lands_in_half_open_range() {
        for i in -100..=100 {
            let w = wrap_angle(i as f32 * 0.77);
            assert!(w > -PI - 1e-6 && w <= PI + 1e-6);
        }
        assert!((wrap_angle(3.0 * PI).abs() - PI).abs() < 1e-4);
        assert!((wrap_angle(-3.0 * PI).abs() - PI).abs() < 1e-4);
    }
}
