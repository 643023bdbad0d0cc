//! Inverse kinematics for all four legs.
use nalgebra::Vector3;

use crate::config::GeometryConfig;
use crate::error::{Result, SolveError};
use crate::inverse::{LegSolution, solve_leg};
use crate::types::{FootTargetMatrix, JointAngleMatrix, JointAngleResults, LegId, Legs};
use crate::warning::{SolveWarning, WarningSink};

/// Solves the joint angles of every leg from body-frame foot targets.
///
/// The legs are solved independently, a failure of one leg does not affect the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadrupedSolver {
    geometry: GeometryConfig,
}

impl QuadrupedSolver {
    #[must_use]
    pub fn new(geometry: GeometryConfig) -> Self {
        Self { geometry }
    }

    #[must_use]
    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// Solve a single leg from a body-frame foot target.
    pub fn solve_leg(
        &self,
        leg: LegId,
        target: &Vector3<f64>,
    ) -> std::result::Result<LegSolution, SolveError> {
        let foot_offset = target - self.geometry.leg_origin(leg);
        solve_leg(&foot_offset, leg.handedness(), &self.geometry)
    }

    /// Solve every leg from body-frame foot targets.
    #[must_use]
    pub fn solve(&self, targets: &FootTargetMatrix) -> QuadrupedSolution {
        QuadrupedSolution {
            legs: Legs::from_fn(|leg| self.solve_leg(leg, &targets[leg])),
        }
    }
}

/// Per-leg results of a [`QuadrupedSolver::solve`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadrupedSolution {
    pub legs: Legs<std::result::Result<LegSolution, SolveError>>,
}

impl QuadrupedSolution {
    /// Joint angles in radians per leg, failed legs keep their error.
    #[must_use]
    pub fn leg_angles(&self) -> JointAngleResults {
        self.legs.map(|result| result.map(|solution| solution.angles))
    }

    /// Joint angles in radians of every leg, or the first leg that failed to solve.
    pub fn angles(&self) -> Result<JointAngleMatrix> {
        self.leg_angles().transpose()
    }

    /// Whether the target of `leg` was outside its workspace.
    #[must_use]
    pub fn is_clamped(&self, leg: LegId) -> bool {
        self.legs[leg].as_ref().is_ok_and(LegSolution::is_clamped)
    }

    /// All warnings of the legs that were solved.
    pub fn warnings(&self) -> impl Iterator<Item = (LegId, SolveWarning)> {
        self.legs.iter().flat_map(|(leg, result)| {
            result
                .iter()
                .flat_map(move |solution| solution.warnings.iter().map(move |w| (leg, w)))
        })
    }

    /// Forward all warnings to `sink`.
    pub fn report(&self, sink: &dyn WarningSink) {
        for (leg, warning) in self.warnings() {
            sink.warn(leg, &warning);
        }
    }
}
