//! Frame rotations and angle helpers used by the leg solver.
use std::f64::consts::{PI, TAU};

use nalgebra::{Rotation3, Vector3};

/// Rotate `v` about the body x-axis by `angle` radians (right-hand rule).
#[must_use]
pub fn rotate_x(angle: f64, v: &Vector3<f64>) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle) * v
}

/// Angle of the 2D vector `(a, b)` measured from the positive `a` axis, in `[0, 2π)`.
///
/// The zero vector has no direction, it is mapped to `3π/2` (straight down).
#[must_use]
pub fn full_circle_angle(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 1.5 * PI;
    }

    wrap_full_turn(b.atan2(a))
}

/// Wrap an angle into `[0, 2π)`.
#[must_use]
pub fn wrap_full_turn(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Wrap an angle into `(-π, π]`.
#[must_use]
pub fn wrap_signed(angle: f64) -> f64 {
    let wrapped = wrap_full_turn(angle);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}
