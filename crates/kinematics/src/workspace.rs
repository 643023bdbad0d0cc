//! Reachability clamp for the two-link upper/lower leg sub-chain.
use nalgebra::Vector3;

use crate::warning::ReachabilityWarning;

/// Fraction of the maximum reach used for targets outside the workspace.
///
/// Staying just below the full reach keeps the law-of-cosines arguments inside `[-1, 1]`.
pub const REACH_CLAMP_FACTOR: f64 = 0.99999;

/// Limits the planar reach of the upper and lower leg links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkspaceClamp {
    max_reach: f64,
}

/// Reach to use for the planar solve, and the warning if it was clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    pub reach: f64,
    pub warning: Option<ReachabilityWarning>,
}

impl WorkspaceClamp {
    #[must_use]
    pub fn new(l2: f64, l3: f64) -> Self {
        Self { max_reach: l2 + l3 }
    }

    #[must_use]
    pub fn max_reach(&self) -> f64 {
        self.max_reach
    }

    /// Clamp `reach` when it is at or beyond the maximum reach.
    ///
    /// `target` is only carried into the warning.
    #[must_use]
    pub fn apply(&self, reach: f64, target: Vector3<f64>) -> Clamped {
        if reach < self.max_reach {
            return Clamped {
                reach,
                warning: None,
            };
        }

        let clamped = self.max_reach * REACH_CLAMP_FACTOR;
        Clamped {
            reach: clamped,
            warning: Some(ReachabilityWarning {
                requested: reach,
                clamped,
                target,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_reachable_distances() {
        let clamp = WorkspaceClamp::new(0.14, 0.16);

        let result = clamp.apply(0.2, Vector3::zeros());

        assert_eq!(result.reach, 0.2);
        assert!(result.warning.is_none());
    }

    #[test]
    fn clamps_at_the_boundary() {
        let clamp = WorkspaceClamp::new(0.14, 0.16);
        let boundary = clamp.max_reach();

        let result = clamp.apply(boundary, Vector3::zeros());

        assert_eq!(result.reach, boundary * REACH_CLAMP_FACTOR);
        assert!(result.warning.is_some());
    }

    #[test]
    fn clamp_does_not_depend_on_distance() {
        let clamp = WorkspaceClamp::new(0.14, 0.16);
        let target = Vector3::new(0.0, 0.0, -1.0);

        let near = clamp.apply(0.31, target);
        let far = clamp.apply(12.0, target);

        assert_eq!(near.reach, far.reach);
        let warning = far.warning.unwrap();
        assert_eq!(warning.requested, 12.0);
        assert_eq!(warning.clamped, clamp.max_reach() * REACH_CLAMP_FACTOR);
        assert_eq!(warning.target, target);
    }
}
