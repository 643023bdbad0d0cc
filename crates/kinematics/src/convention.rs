//! Mapping from solver angles to the zero points and signs expected by the servo layer.
//!
//! The mapping is a fixed table with one affine transform per joint per leg, so a hand-tuned
//! convention can be written down, reviewed and tested on its own.
use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rotation::wrap_signed;
use crate::types::{Handedness, JointAngleMatrix, JointAngles, LegId, LegJoints, Legs};

/// `angle -> scale * angle + offset`, with `scale` either `1` or `-1`.
///
/// Offsets are written in degrees in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransformFile", into = "TransformFile")]
pub struct JointTransform {
    scale: f64,
    offset: f64,
}

impl JointTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: 0.0,
    };

    /// Shift the angle by `offset` radians.
    #[must_use]
    pub const fn offset(offset: f64) -> Self {
        Self { scale: 1.0, offset }
    }

    /// Negate the angle, then shift it by `offset` radians.
    #[must_use]
    pub const fn flipped(offset: f64) -> Self {
        Self {
            scale: -1.0,
            offset,
        }
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Offset in radians.
    #[must_use]
    pub fn offset_radians(&self) -> f64 {
        self.offset
    }

    #[must_use]
    pub fn apply(&self, angle: f64) -> f64 {
        self.scale * angle + self.offset
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TransformFile {
    #[serde(default = "default_scale")]
    scale: f64,
    /// Offset in degrees.
    #[serde(default)]
    offset: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl TryFrom<TransformFile> for JointTransform {
    type Error = String;

    fn try_from(file: TransformFile) -> Result<Self, Self::Error> {
        if file.scale.abs() != 1.0 {
            return Err(format!("joint scale must be 1 or -1, got {}", file.scale));
        }

        Ok(Self {
            scale: file.scale,
            offset: file.offset.to_radians(),
        })
    }
}

impl From<JointTransform> for TransformFile {
    fn from(transform: JointTransform) -> Self {
        Self {
            scale: transform.scale,
            offset: transform.offset.to_degrees(),
        }
    }
}

/// Per-leg joint transforms applied to the solver output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AngleConvention {
    /// Normalise every mapped angle into `(-π, π]`.
    #[serde(default = "default_wrap")]
    pub wrap: bool,
    pub legs: Legs<LegJoints<JointTransform>>,
}

fn default_wrap() -> bool {
    true
}

/// Servo zero points: upper leg pointing backwards, lower leg at a right angle to it.
const SERVO_ZERO: LegJoints<JointTransform> = LegJoints::new(
    JointTransform::IDENTITY,
    JointTransform::offset(-PI),
    JointTransform::offset(-FRAC_PI_2),
);

impl Default for AngleConvention {
    fn default() -> Self {
        Self {
            wrap: true,
            legs: Legs::from_fn(|_| SERVO_ZERO),
        }
    }
}

impl AngleConvention {
    /// A convention that passes the solver angles through unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            wrap: false,
            legs: Legs::from_fn(|_| LegJoints::new(
                JointTransform::IDENTITY,
                JointTransform::IDENTITY,
                JointTransform::IDENTITY,
            )),
        }
    }

    /// Replace the hip transform `f` of the left legs with `θ1 -> π - f(θ1)`.
    ///
    /// The solver reports a left hip angle that is the reflection of the right hip angle, with
    /// this transform mirrored poses command identical hip angles on both sides.
    #[must_use]
    pub fn with_mirrored_hips(mut self) -> Self {
        for leg in LegId::ALL {
            if leg.handedness() == Handedness::Left {
                let hip = &mut self.legs[leg].hip;
                *hip = JointTransform {
                    scale: -hip.scale,
                    offset: PI - hip.offset,
                };
            }
        }
        self
    }

    /// Check that every transform only flips signs.
    ///
    /// Transforms built in code bypass the check done when deserializing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (leg, joints) in self.legs.iter() {
            for (joint, transform) in ["hip", "upper", "lower"].into_iter().zip(joints.iter()) {
                if transform.scale.abs() != 1.0 {
                    return Err(ConfigError::InvalidJointScale {
                        leg,
                        joint,
                        scale: transform.scale,
                    });
                }
            }
        }
        Ok(())
    }

    /// Map the angles of a single leg.
    #[must_use]
    pub fn apply_leg(&self, leg: LegId, angles: JointAngles) -> JointAngles {
        self.legs[leg]
            .zip(angles)
            .map(|(transform, angle)| self.finish(transform.apply(angle)))
    }

    /// Map the angles of every leg.
    #[must_use]
    pub fn apply(&self, angles: &JointAngleMatrix) -> JointAngleMatrix {
        Legs::from_fn(|leg| self.apply_leg(leg, angles[leg]))
    }

    fn finish(&self, angle: f64) -> f64 {
        if self.wrap { wrap_signed(angle) } else { angle }
    }
}
