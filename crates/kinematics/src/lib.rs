//! Closed-form inverse kinematics for a four-legged robot with three revolute joints per leg.
//!
//! Foot targets are given in the body frame (x forward, y left, z up, meters), the solver
//! returns hip, upper and lower leg angles per leg in radians. An [`AngleConvention`] maps those
//! to the zero points of the servos.
use std::path::Path;

pub mod config;
pub mod convention;
pub mod inverse;
pub mod quadruped;
pub mod rotation;
pub mod types;
pub mod warning;
pub mod workspace;

mod error;
pub use error::{ConfigError, Degeneracy, Error, Result, SolveError};

pub use config::{GeometryConfig, KinematicsConfig};
pub use convention::{AngleConvention, JointTransform};
pub use inverse::LegSolution;
pub use quadruped::{QuadrupedSolution, QuadrupedSolver};
pub use types::{
    FootTargetMatrix, Handedness, JointAngleMatrix, JointAngleResults, JointAngles, LegId,
    LegJoints, Legs,
};
pub use warning::{CollectingSink, NullSink, SolveWarning, TracingSink, WarningSink};

/// Solver and angle convention loaded from a [`KinematicsConfig`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kinematics {
    solver: QuadrupedSolver,
    convention: AngleConvention,
}

impl Kinematics {
    pub fn new(config: KinematicsConfig) -> Result<Self> {
        config.convention.validate()?;

        let geometry = &config.geometry;
        tracing::info!(
            hip_offset_angle = geometry.phi().to_degrees(),
            l1 = geometry.l1(),
            l2 = geometry.l2(),
            l3 = geometry.l3(),
            max_reach = geometry.max_reach(),
            "loaded leg geometry"
        );
        for (leg, origin) in geometry.leg_origins().iter() {
            tracing::debug!(%leg, origin = ?[origin.x, origin.y, origin.z], "leg origin");
        }

        Ok(Self {
            solver: QuadrupedSolver::new(config.geometry),
            convention: config.convention,
        })
    }

    /// Load `kinematics.toml` from `root`, with an optional overlay directory.
    pub fn load(root: impl AsRef<Path>, overlay: Option<&Path>) -> Result<Self> {
        use odal::Config;

        let config = match overlay {
            Some(overlay) => KinematicsConfig::load_with_overlay(root, overlay)?,
            None => KinematicsConfig::load(root)?,
        };
        Self::new(config)
    }

    #[must_use]
    pub fn solver(&self) -> &QuadrupedSolver {
        &self.solver
    }

    #[must_use]
    pub fn convention(&self) -> &AngleConvention {
        &self.convention
    }

    /// Solve every leg, report its warnings to `sink` and apply the angle convention.
    ///
    /// A leg that fails to solve keeps its error, the other legs are unaffected. Angles are in
    /// radians, see [`Kinematics::solve_degrees`] for the servo layer.
    #[must_use]
    pub fn solve(&self, targets: &FootTargetMatrix, sink: &dyn WarningSink) -> JointAngleResults {
        let solution = self.solver.solve(targets);
        solution.report(sink);

        Legs::from_fn(|leg| {
            solution.legs[leg].map(|solved| self.convention.apply_leg(leg, solved.angles))
        })
    }

    /// Same as [`Kinematics::solve`], with the angles in degrees.
    #[must_use]
    pub fn solve_degrees(
        &self,
        targets: &FootTargetMatrix,
        sink: &dyn WarningSink,
    ) -> JointAngleResults {
        self.solve(targets, sink)
            .map(|result| result.map(JointAngles::to_degrees))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use std::fs;

    use approx::assert_relative_eq;
    use nalgebra::vector;

    use super::*;

    fn stance(kinematics: &Kinematics) -> FootTargetMatrix {
        let geometry = kinematics.solver().geometry();
        Legs::from_fn(|leg| geometry.leg_origin(leg) + vector![0.0, 0.0, -0.22])
    }

    #[test]
    fn solve_applies_the_convention() {
        let kinematics = Kinematics::default();
        let targets = stance(&kinematics);

        let raw = kinematics.solver().solve(&targets).angles().unwrap();
        let mapped = kinematics.solve(&targets, &NullSink).transpose().unwrap();

        for leg in LegId::ALL {
            assert_relative_eq!(mapped[leg].upper, raw[leg].upper - PI, epsilon = 1e-12);
            assert!(mapped[leg].iter().all(|angle| angle.abs() <= PI));
        }
    }

    #[test]
    fn solve_reports_warnings() {
        let kinematics = Kinematics::default();
        let mut targets = stance(&kinematics);
        targets.front_right.z = -1.0;

        let sink = CollectingSink::default();
        let angles = kinematics.solve(&targets, &sink);

        assert!(angles.transpose().is_ok());
        let warnings = sink.take();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].0, LegId::FrontRight);
    }

    #[test]
    fn failed_leg_keeps_the_other_legs() {
        let kinematics = Kinematics::default();
        let mut targets = stance(&kinematics);
        let expected = kinematics.solve(&targets, &NullSink);
        targets.back_left = kinematics.solver().geometry().leg_origin(LegId::BackLeft);

        let angles = kinematics.solve(&targets, &NullSink);

        assert!(matches!(
            angles.back_left,
            Err(SolveError::DegenerateGeometry(Degeneracy::FootOnHipAxis { .. }))
        ));
        for leg in [LegId::FrontRight, LegId::FrontLeft, LegId::BackRight] {
            assert_eq!(angles[leg], expected[leg]);
        }
        assert!(matches!(
            angles.transpose(),
            Err(Error::Solve {
                leg: LegId::BackLeft,
                ..
            })
        ));
    }

    #[test]
    fn solve_degrees_converts_at_the_boundary() {
        let kinematics = Kinematics::default();
        let mut targets = stance(&kinematics);
        targets.front_left.x = f64::NAN;

        let radians = kinematics.solve(&targets, &NullSink);
        let degrees = kinematics.solve_degrees(&targets, &NullSink);

        assert_eq!(degrees.front_left, radians.front_left);
        for leg in [LegId::FrontRight, LegId::BackRight, LegId::BackLeft] {
            let radians = radians[leg].unwrap();
            let degrees = degrees[leg].unwrap();
            assert_relative_eq!(degrees.upper, radians.upper.to_degrees());
            assert_relative_eq!(degrees.lower, radians.lower.to_degrees());
        }
    }

    #[test]
    fn load_reads_config_and_overlay() {
        let root = tempfile::tempdir().unwrap();
        let overlay = tempfile::tempdir().unwrap();

        fs::write(
            root.path().join("kinematics.toml"),
            r"
            [geometry]
            hip_offset_angle = 73.17
            l1 = 0.04973
            l2 = 0.140
            l3 = 0.1631477

            [geometry.leg_origins]
            front_right = [0.11165, -0.061, 0.0]
            front_left = [0.11165, 0.061, 0.0]
            back_right = [-0.11165, -0.061, 0.0]
            back_left = [-0.11165, 0.061, 0.0]
            ",
        )
        .unwrap();
        fs::write(
            overlay.path().join("kinematics.toml"),
            "[geometry]\nl2 = 0.15\n",
        )
        .unwrap();

        let base = Kinematics::load(root.path(), None).unwrap();
        let tuned = Kinematics::load(root.path(), Some(overlay.path())).unwrap();

        assert_relative_eq!(base.solver().geometry().l2(), 0.14);
        assert_relative_eq!(tuned.solver().geometry().l2(), 0.15);
        assert_eq!(tuned.convention(), &AngleConvention::default());
    }

    #[test]
    fn load_rejects_invalid_geometry() {
        let root = tempfile::tempdir().unwrap();
        fs::write(
            root.path().join("kinematics.toml"),
            r"
            [geometry]
            hip_offset_angle = 95.0
            l1 = 0.04973
            l2 = 0.140
            l3 = 0.1631477

            [geometry.leg_origins]
            front_right = [0.11165, -0.061, 0.0]
            front_left = [0.11165, 0.061, 0.0]
            back_right = [-0.11165, -0.061, 0.0]
            back_left = [-0.11165, 0.061, 0.0]
            ",
        )
        .unwrap();

        assert!(matches!(
            Kinematics::load(root.path(), None),
            Err(Error::Load(odal::Error::Deserialize { .. }))
        ));
    }
}
