//! Result and Error types for the crate.
use miette::Diagnostic;
use thiserror::Error;

use crate::types::LegId;

/// Result containing an error variant from this module.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors at the crate boundary.
///
/// [`Error::InvalidConfiguration`] is fatal and only produced while constructing or loading a
/// configuration, [`Error::Solve`] concerns a single leg in a single control tick.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidConfiguration(#[from] ConfigError),

    #[error("failed to solve leg {leg}")]
    Solve {
        leg: LegId,
        #[source]
        source: SolveError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] odal::Error),
}

/// Rejected geometry or angle convention.
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("link {link} must have a positive length, got {value} m")]
    NonPositiveLink { link: &'static str, value: f64 },

    #[error("hip offset angle must lie strictly between 0 and 90 degrees, got {} degrees", .0.to_degrees())]
    HipAngleOutOfRange(f64),

    #[error("leg origin of {0} is not finite")]
    NonFiniteLegOrigin(LegId),

    #[error("{joint} joint of leg {leg} has scale {scale}, expected 1 or -1")]
    #[diagnostic(help("angle conventions may only flip the sign of a joint"))]
    InvalidJointScale {
        leg: LegId,
        joint: &'static str,
        scale: f64,
    },
}

/// Failure of a single leg solve.
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq)]
pub enum SolveError {
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(Degeneracy),
}

/// Target positions for which the closed-form solution has no defined answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Degeneracy {
    /// The target contains NaN or infinite coordinates.
    NonFiniteTarget,
    /// The foot lies on the hip rotation axis, so the hip angle is undefined.
    FootOnHipAxis { distance: f64 },
}

impl std::fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degeneracy::NonFiniteTarget => write!(f, "target is not finite"),
            Degeneracy::FootOnHipAxis { distance } => {
                write!(f, "foot is {distance} m from the hip axis")
            }
        }
    }
}
