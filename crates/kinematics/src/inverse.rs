//! Closed-form inverse kinematics of a single 3-DOF leg.
//!
//! The leg consists of a hip link `l1` rotating about the body x-axis, followed by an upper link
//! `l2` and a lower link `l3` that move in a plane at a fixed angle `φ` to the hip link. The
//! solve is split in two planar triangle problems:
//!
//! 1. In the plane perpendicular to the x-axis, the triangle between the hip axis, the upper leg
//!    joint and the foot gives the hip angle `θ1`.
//! 2. After moving the origin to the upper leg joint and rotating the leg plane onto the x-z
//!    plane, the law of cosines gives the upper and lower angles `θ2` and `θ3`.
//!
//! Right and left legs are mirror images of each other, solving `(x, y, z)` for a right leg and
//! `(x, -y, z)` for a left leg gives `θ1_left = π - θ1_right` and identical `θ2` and `θ3`.
use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Vector3;

use crate::config::GeometryConfig;
use crate::error::{Degeneracy, SolveError};
use crate::rotation::{full_circle_angle, rotate_x, wrap_full_turn};
use crate::types::{Handedness, JointAngles};
use crate::warning::{DegenerateGeometryWarning, SolveStage, SolveWarnings};
use crate::workspace::{Clamped, WorkspaceClamp};

/// Distances below this are treated as zero, in meters.
pub const DEGENERATE_LENGTH: f64 = 1e-9;

/// Result of a successful leg solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegSolution {
    /// Joint angles in radians, hip in `[0, 2π)`.
    pub angles: JointAngles,
    /// Distance between the upper leg joint and the foot used by the planar solve.
    ///
    /// Equals the true distance unless the target was clamped.
    pub reach: f64,
    pub warnings: SolveWarnings,
}

impl LegSolution {
    /// Whether the target was outside the workspace and the reach was clamped.
    #[must_use]
    pub fn is_clamped(&self) -> bool {
        self.warnings.unreachable().is_some()
    }
}

/// Solve the joint angles of one leg.
///
/// `foot_offset` is the target foot position relative to the leg origin, in body frame axes.
/// Targets beyond the reach of the leg are clamped and reported in [`LegSolution::warnings`].
pub fn solve_leg(
    foot_offset: &Vector3<f64>,
    handedness: Handedness,
    geometry: &GeometryConfig,
) -> Result<LegSolution, SolveError> {
    if !foot_offset.iter().all(|c| c.is_finite()) {
        return Err(SolveError::DegenerateGeometry(Degeneracy::NonFiniteTarget));
    }

    let phi = geometry.phi();
    let (l1, l2, l3) = (geometry.l1(), geometry.l2(), geometry.l3());
    let sign = handedness.sign();
    let mut warnings = SolveWarnings::default();

    // the gait layer uses the opposite y-axis direction
    let target = Vector3::new(foot_offset.x, -foot_offset.y, foot_offset.z);

    // align the frame with the hip link
    let hip_frame = rotate_x(-sign * (FRAC_PI_2 - phi), &target);

    let len_a = hip_frame.y.hypot(hip_frame.z);
    if len_a < DEGENERATE_LENGTH {
        return Err(SolveError::DegenerateGeometry(Degeneracy::FootOnHipAxis {
            distance: len_a,
        }));
    }

    // a1: direction of the foot around the hip axis
    // a2: angle at the foot between the hip axis and the upper leg joint
    // a3: angle at the hip axis between the foot and the upper leg joint
    let a1 = full_circle_angle(hip_frame.y, hip_frame.z);
    let a2 = clamped_unit(SolveStage::HipTriangle, phi.sin() * l1 / len_a, &mut warnings).asin();
    let a3 = PI - a2 - phi;
    let theta_1 = wrap_full_turn(a1 + sign * a3);

    let hip_to_upper = Vector3::new(0.0, l1 * theta_1.cos(), l1 * theta_1.sin());
    let upper_frame = hip_frame - hip_to_upper;

    // rotate the plane of the upper and lower links onto the x-z plane
    let leg_plane = theta_1 + sign * phi - FRAC_PI_2;
    let planar = rotate_x(-leg_plane, &upper_frame);

    // the foot lies at least l1·cos(φ) below the upper leg joint, so len_b is never zero
    let len_b = planar.x.hypot(planar.z);

    let Clamped { reach, warning } = WorkspaceClamp::new(l2, l3).apply(len_b, *foot_offset);
    if let Some(warning) = warning {
        warnings.set_unreachable(warning);
    }

    // b1: direction of the foot in the leg plane
    // b2: angle between the reach line and the upper link
    // b3: angle between the upper and the lower link
    let b1 = full_circle_angle(planar.x, planar.z);
    let b2 = clamped_unit(
        SolveStage::UpperLink,
        (l2.powi(2) + reach.powi(2) - l3.powi(2)) / (2.0 * l2 * reach),
        &mut warnings,
    )
    .acos();
    let b3 = clamped_unit(
        SolveStage::Knee,
        (l2.powi(2) + l3.powi(2) - reach.powi(2)) / (2.0 * l2 * l3),
        &mut warnings,
    )
    .acos();

    Ok(LegSolution {
        angles: JointAngles::new(theta_1, b1 - b2, PI - b3),
        reach,
        warnings,
    })
}

/// Clamp an inverse trigonometric argument into `[-1, 1]`, recording a warning if needed.
fn clamped_unit(stage: SolveStage, argument: f64, warnings: &mut SolveWarnings) -> f64 {
    if (-1.0..=1.0).contains(&argument) {
        return argument;
    }

    warnings.set_degenerate(DegenerateGeometryWarning { stage, argument });
    argument.clamp(-1.0, 1.0)
}
