//! Per-leg and per-joint containers.
//!
//! The robot has four legs with three joints each. Values are grouped per leg in [`Legs`] and per
//! joint in [`LegJoints`], which replaces the 3×4 "column per leg" matrices used by the gait and
//! servo layers. Conversions to and from that layout are provided by [`FootTargetMatrix`] and
//! [`JointAngleMatrix`].
use std::fmt;
use std::ops::{Index, IndexMut};

use nalgebra::{Matrix3x4, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, SolveError};

/// Identifier of a single leg.
///
/// The declaration order matches the column order of the 3×4 matrices exchanged with the gait and
/// servo layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegId {
    FrontRight,
    FrontLeft,
    BackRight,
    BackLeft,
}

impl LegId {
    /// All legs, in column order.
    pub const ALL: [LegId; 4] = [
        LegId::FrontRight,
        LegId::FrontLeft,
        LegId::BackRight,
        LegId::BackLeft,
    ];

    /// Column index of this leg in a 3×4 matrix.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            LegId::FrontRight => 0,
            LegId::FrontLeft => 1,
            LegId::BackRight => 2,
            LegId::BackLeft => 3,
        }
    }

    /// Whether this leg is built mirrored (left) or not (right).
    #[must_use]
    pub const fn handedness(self) -> Handedness {
        match self {
            LegId::FrontRight | LegId::BackRight => Handedness::Right,
            LegId::FrontLeft | LegId::BackLeft => Handedness::Left,
        }
    }

    /// Short name used on the command line and in logs.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            LegId::FrontRight => "fr",
            LegId::FrontLeft => "fl",
            LegId::BackRight => "br",
            LegId::BackLeft => "bl",
        }
    }
}

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Mechanical handedness of a leg, fixing the sign conventions of the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Right,
    Left,
}

impl Handedness {
    /// `1.0` for right legs, `-1.0` for left legs.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }
}

/// One value per leg.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Legs<T> {
    pub front_right: T,
    pub front_left: T,
    pub back_right: T,
    pub back_left: T,
}

impl<T> Legs<T> {
    /// Build a [`Legs`] by calling `f` for every leg, in column order.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(LegId) -> T,
    {
        Legs {
            front_right: f(LegId::FrontRight),
            front_left: f(LegId::FrontLeft),
            back_right: f(LegId::BackRight),
            back_left: f(LegId::BackLeft),
        }
    }

    /// Transforms each element in the [`Legs`] using the provided closure `f`.
    pub fn map<F, U>(self, mut f: F) -> Legs<U>
    where
        F: FnMut(T) -> U,
    {
        Legs {
            front_right: f(self.front_right),
            front_left: f(self.front_left),
            back_right: f(self.back_right),
            back_left: f(self.back_left),
        }
    }

    /// Zips two [`Legs`] element-wise.
    pub fn zip<U>(self, other: Legs<U>) -> Legs<(T, U)> {
        Legs {
            front_right: (self.front_right, other.front_right),
            front_left: (self.front_left, other.front_left),
            back_right: (self.back_right, other.back_right),
            back_left: (self.back_left, other.back_left),
        }
    }

    /// Iterate over `(leg, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (LegId, &T)> {
        LegId::ALL.into_iter().map(move |leg| (leg, &self[leg]))
    }
}

impl<T> Index<LegId> for Legs<T> {
    type Output = T;

    fn index(&self, leg: LegId) -> &T {
        match leg {
            LegId::FrontRight => &self.front_right,
            LegId::FrontLeft => &self.front_left,
            LegId::BackRight => &self.back_right,
            LegId::BackLeft => &self.back_left,
        }
    }
}

impl<T> IndexMut<LegId> for Legs<T> {
    fn index_mut(&mut self, leg: LegId) -> &mut T {
        match leg {
            LegId::FrontRight => &mut self.front_right,
            LegId::FrontLeft => &mut self.front_left,
            LegId::BackRight => &mut self.back_right,
            LegId::BackLeft => &mut self.back_left,
        }
    }
}

/// One value per joint of a leg.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegJoints<T> {
    /// Hip joint, rotating the whole leg about the body x-axis.
    pub hip: T,
    /// Upper leg joint.
    pub upper: T,
    /// Lower leg (knee) joint.
    pub lower: T,
}

impl<T> LegJoints<T> {
    #[must_use]
    pub const fn new(hip: T, upper: T, lower: T) -> Self {
        Self { hip, upper, lower }
    }

    /// Transforms each element in the [`LegJoints`] using the provided closure `f`.
    pub fn map<F, U>(self, mut f: F) -> LegJoints<U>
    where
        F: FnMut(T) -> U,
    {
        LegJoints {
            hip: f(self.hip),
            upper: f(self.upper),
            lower: f(self.lower),
        }
    }

    /// Zips two [`LegJoints`] element-wise.
    pub fn zip<U>(self, other: LegJoints<U>) -> LegJoints<(T, U)> {
        LegJoints {
            hip: (self.hip, other.hip),
            upper: (self.upper, other.upper),
            lower: (self.lower, other.lower),
        }
    }

    /// Iterate over the joints in hip, upper, lower order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.hip, &self.upper, &self.lower].into_iter()
    }
}

/// Joint angles of one leg: hip θ1, upper θ2, lower θ3.
///
/// Radians inside this crate, degrees only once converted with [`LegJoints::to_degrees`].
pub type JointAngles = LegJoints<f64>;

impl LegJoints<f64> {
    #[must_use]
    pub fn to_degrees(self) -> Self {
        self.map(f64::to_degrees)
    }
}

/// Desired body-frame foot position of every leg for one control tick, in meters.
pub type FootTargetMatrix = Legs<Vector3<f64>>;

/// Joint angles of every leg for one control tick.
pub type JointAngleMatrix = Legs<JointAngles>;

/// Joint angles of every leg, or the reason a leg could not be solved.
pub type JointAngleResults = Legs<Result<JointAngles, SolveError>>;

impl Legs<Vector3<f64>> {
    /// Read foot targets from a 3×4 matrix with one column per leg.
    #[must_use]
    pub fn from_matrix(matrix: &Matrix3x4<f64>) -> Self {
        Legs::from_fn(|leg| matrix.column(leg.index()).into_owned())
    }

    /// Write the foot targets to a 3×4 matrix with one column per leg.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3x4<f64> {
        let mut matrix = Matrix3x4::zeros();
        for (leg, position) in self.iter() {
            matrix.set_column(leg.index(), position);
        }
        matrix
    }
}

impl<T> Legs<Result<T, SolveError>> {
    /// The values of all legs, or the error of the first failed leg in column order.
    pub fn transpose(self) -> crate::Result<Legs<T>> {
        let solved = |leg, result: Result<T, SolveError>| {
            result.map_err(|source| Error::Solve { leg, source })
        };

        Ok(Legs {
            front_right: solved(LegId::FrontRight, self.front_right)?,
            front_left: solved(LegId::FrontLeft, self.front_left)?,
            back_right: solved(LegId::BackRight, self.back_right)?,
            back_left: solved(LegId::BackLeft, self.back_left)?,
        })
    }
}

impl Legs<JointAngles> {
    /// Convert every angle from radians to degrees.
    #[must_use]
    pub fn to_degrees(self) -> Self {
        self.map(JointAngles::to_degrees)
    }

    /// Write the angles to a 3×4 matrix, rows hip/upper/lower and one column per leg.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3x4<f64> {
        let mut matrix = Matrix3x4::zeros();
        for (leg, angles) in self.iter() {
            matrix.set_column(
                leg.index(),
                &Vector3::new(angles.hip, angles.upper, angles.lower),
            );
        }
        matrix
    }
}
