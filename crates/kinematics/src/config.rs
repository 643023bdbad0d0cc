//! Physical constants of the robot and the kinematics configuration file.
use std::f64::consts::FRAC_PI_2;

use nalgebra::{Vector3, vector};
use serde::{Deserialize, Serialize};

use crate::convention::AngleConvention;
use crate::error::ConfigError;
use crate::types::{LegId, Legs};

/// Front-back distance from the body center to each hip axis, in meters.
const DINGO_LEG_FB: f64 = 0.11165;
/// Left-right distance from the body center to each leg plane, in meters.
const DINGO_LEG_LR: f64 = 0.061;

/// Immutable leg geometry, validated on construction.
///
/// The body frame has x pointing forward, y pointing left and z pointing up. All lengths are in
/// meters and all angles in radians.
///
/// In the config file the hip offset angle is written in degrees:
///
/// ```toml
/// hip_offset_angle = 73.17
/// l1 = 0.04973
/// l2 = 0.140
/// l3 = 0.1631477
///
/// [leg_origins]
/// front_right = [0.11165, -0.061, 0.0]
/// front_left = [0.11165, 0.061, 0.0]
/// back_right = [-0.11165, -0.061, 0.0]
/// back_left = [-0.11165, 0.061, 0.0]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeometryFile", into = "GeometryFile")]
pub struct GeometryConfig {
    phi: f64,
    l1: f64,
    l2: f64,
    l3: f64,
    leg_origins: Legs<Vector3<f64>>,
}

impl GeometryConfig {
    /// Create a new geometry.
    ///
    /// `phi` is the fixed angle between the hip link `l1` and the plane of the upper and lower
    /// leg links `l2` and `l3`.
    pub fn new(
        phi: f64,
        l1: f64,
        l2: f64,
        l3: f64,
        leg_origins: Legs<Vector3<f64>>,
    ) -> Result<Self, ConfigError> {
        for (link, value) in [("l1", l1), ("l2", l2), ("l3", l3)] {
            // written this way so NaN is rejected as well
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositiveLink { link, value });
            }
        }

        if !(phi > 0.0 && phi < FRAC_PI_2) {
            return Err(ConfigError::HipAngleOutOfRange(phi));
        }

        if let Some((leg, _)) = leg_origins
            .iter()
            .find(|(_, origin)| !origin.iter().all(|c| c.is_finite()))
        {
            return Err(ConfigError::NonFiniteLegOrigin(leg));
        }

        Ok(Self {
            phi,
            l1,
            l2,
            l3,
            leg_origins,
        })
    }

    /// Geometry of the Dingo quadruped.
    #[must_use]
    pub fn dingo() -> Self {
        Self {
            phi: 73.17_f64.to_radians(),
            l1: 0.04973,
            l2: 0.140,
            l3: 0.163_147_7,
            leg_origins: Legs {
                front_right: vector![DINGO_LEG_FB, -DINGO_LEG_LR, 0.0],
                front_left: vector![DINGO_LEG_FB, DINGO_LEG_LR, 0.0],
                back_right: vector![-DINGO_LEG_FB, -DINGO_LEG_LR, 0.0],
                back_left: vector![-DINGO_LEG_FB, DINGO_LEG_LR, 0.0],
            },
        }
    }

    /// Angle φ between the hip link and the leg plane, in radians.
    #[must_use]
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Length of the hip offset link.
    #[must_use]
    pub fn l1(&self) -> f64 {
        self.l1
    }

    /// Length of the upper leg link.
    #[must_use]
    pub fn l2(&self) -> f64 {
        self.l2
    }

    /// Length of the lower leg link.
    #[must_use]
    pub fn l3(&self) -> f64 {
        self.l3
    }

    /// Maximum distance between the upper leg joint and the foot.
    #[must_use]
    pub fn max_reach(&self) -> f64 {
        self.l2 + self.l3
    }

    /// Mounting offset of `leg` in the body frame.
    #[must_use]
    pub fn leg_origin(&self, leg: LegId) -> Vector3<f64> {
        self.leg_origins[leg]
    }

    #[must_use]
    pub fn leg_origins(&self) -> &Legs<Vector3<f64>> {
        &self.leg_origins
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self::dingo()
    }
}

/// On-disk representation of [`GeometryConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeometryFile {
    /// Hip offset angle in degrees.
    hip_offset_angle: f64,
    l1: f64,
    l2: f64,
    l3: f64,
    leg_origins: Legs<[f64; 3]>,
}

impl TryFrom<GeometryFile> for GeometryConfig {
    type Error = ConfigError;

    fn try_from(file: GeometryFile) -> Result<Self, Self::Error> {
        GeometryConfig::new(
            file.hip_offset_angle.to_radians(),
            file.l1,
            file.l2,
            file.l3,
            file.leg_origins.map(Vector3::from),
        )
    }
}

impl From<GeometryConfig> for GeometryFile {
    fn from(config: GeometryConfig) -> Self {
        GeometryFile {
            hip_offset_angle: config.phi.to_degrees(),
            l1: config.l1,
            l2: config.l2,
            l3: config.l3,
            leg_origins: config.leg_origins.map(Into::into),
        }
    }
}

/// Contents of `kinematics.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KinematicsConfig {
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub convention: AngleConvention,
}

impl odal::Config for KinematicsConfig {
    const PATH: &'static str = "kinematics.toml";
}
