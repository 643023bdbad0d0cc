//! Non-fatal solver warnings and the sinks that consume them.
//!
//! The solver never logs by itself. Warnings are returned alongside each solution and can be
//! forwarded to a [`WarningSink`], which keeps the solver a pure function that can be evaluated
//! for several legs in parallel.
use std::fmt;
use std::sync::{Mutex, PoisonError};

use nalgebra::Vector3;

use crate::types::LegId;

/// The target was further away than the two-link sub-chain can reach, the reach was clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReachabilityWarning {
    /// Distance between the upper leg joint and the requested foot position.
    pub requested: f64,
    /// Distance actually used by the planar solve.
    pub clamped: f64,
    /// The unclamped foot target that was passed to the leg solver.
    pub target: Vector3<f64>,
}

/// Step of the leg solve whose inverse trigonometric argument left `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolveStage {
    /// `asin` of the hip triangle, the foot is closer to the hip axis than the hip link allows.
    HipTriangle,
    /// `acos` of the angle between the reach line and the upper link.
    UpperLink,
    /// `acos` of the knee angle.
    Knee,
}

impl SolveStage {
    const fn index(self) -> usize {
        match self {
            SolveStage::HipTriangle => 0,
            SolveStage::UpperLink => 1,
            SolveStage::Knee => 2,
        }
    }
}

impl fmt::Display for SolveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolveStage::HipTriangle => "hip triangle",
            SolveStage::UpperLink => "upper link",
            SolveStage::Knee => "knee",
        })
    }
}

/// An inverse trigonometric argument was clamped into `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DegenerateGeometryWarning {
    pub stage: SolveStage,
    /// The argument before clamping.
    pub argument: f64,
}

/// Any warning produced by a leg solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SolveWarning {
    Unreachable(ReachabilityWarning),
    DegenerateGeometry(DegenerateGeometryWarning),
}

/// Warnings of a single leg solve.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SolveWarnings {
    unreachable: Option<ReachabilityWarning>,
    degenerate: [Option<DegenerateGeometryWarning>; 3],
}

impl SolveWarnings {
    pub(crate) fn set_unreachable(&mut self, warning: ReachabilityWarning) {
        self.unreachable = Some(warning);
    }

    pub(crate) fn set_degenerate(&mut self, warning: DegenerateGeometryWarning) {
        self.degenerate[warning.stage.index()] = Some(warning);
    }

    /// The reachability warning, if the reach was clamped.
    #[must_use]
    pub fn unreachable(&self) -> Option<&ReachabilityWarning> {
        self.unreachable.as_ref()
    }

    /// The clamp applied in `stage`, if any.
    #[must_use]
    pub fn degenerate(&self, stage: SolveStage) -> Option<&DegenerateGeometryWarning> {
        self.degenerate[stage.index()].as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unreachable.is_none() && self.degenerate.iter().all(Option::is_none)
    }

    /// All warnings, reachability first.
    pub fn iter(&self) -> impl Iterator<Item = SolveWarning> {
        self.unreachable
            .into_iter()
            .map(SolveWarning::Unreachable)
            .chain(
                self.degenerate
                    .into_iter()
                    .flatten()
                    .map(SolveWarning::DegenerateGeometry),
            )
    }
}

/// Consumer of solver warnings, such as a logger or a telemetry stream.
pub trait WarningSink {
    fn warn(&self, leg: LegId, warning: &SolveWarning);
}

/// Logs warnings as structured [`tracing`] events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, leg: LegId, warning: &SolveWarning) {
        match warning {
            SolveWarning::Unreachable(ReachabilityWarning {
                requested,
                clamped,
                target,
            }) => tracing::warn!(
                %leg,
                requested,
                clamped,
                target = ?[target.x, target.y, target.z],
                "target too far away, clamping reach"
            ),
            SolveWarning::DegenerateGeometry(DegenerateGeometryWarning { stage, argument }) => {
                tracing::warn!(
                    %leg,
                    %stage,
                    argument,
                    "degenerate geometry, clamping trigonometric argument"
                );
            }
        }
    }
}

/// Discards all warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl WarningSink for NullSink {
    fn warn(&self, _leg: LegId, _warning: &SolveWarning) {}
}

/// Records warnings, so they can be inspected or forwarded later.
#[derive(Debug, Default)]
pub struct CollectingSink {
    warnings: Mutex<Vec<(LegId, SolveWarning)>>,
}

impl CollectingSink {
    /// Take all warnings recorded so far.
    pub fn take(&self) -> Vec<(LegId, SolveWarning)> {
        std::mem::take(
            &mut *self
                .warnings
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, leg: LegId, warning: &SolveWarning) {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((leg, *warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachability() -> ReachabilityWarning {
        ReachabilityWarning {
            requested: 0.4,
            clamped: 0.3,
            target: Vector3::new(0.0, 0.0, -0.5),
        }
    }

    #[test]
    fn empty_by_default() {
        let warnings = SolveWarnings::default();

        assert!(warnings.is_empty());
        assert_eq!(warnings.iter().count(), 0);
    }

    #[test]
    fn iterates_reachability_first() {
        let mut warnings = SolveWarnings::default();
        let knee = DegenerateGeometryWarning {
            stage: SolveStage::Knee,
            argument: 1.2,
        };
        warnings.set_degenerate(knee);
        warnings.set_unreachable(reachability());

        let all: Vec<_> = warnings.iter().collect();

        assert_eq!(
            all,
            vec![
                SolveWarning::Unreachable(reachability()),
                SolveWarning::DegenerateGeometry(knee),
            ]
        );
        assert_eq!(warnings.degenerate(SolveStage::Knee), Some(&knee));
        assert_eq!(warnings.degenerate(SolveStage::HipTriangle), None);
    }

    #[test]
    fn collecting_sink_drains() {
        let sink = CollectingSink::default();
        sink.warn(LegId::FrontLeft, &SolveWarning::Unreachable(reachability()));

        assert_eq!(sink.take().len(), 1);
        assert!(sink.take().is_empty());
    }
}
