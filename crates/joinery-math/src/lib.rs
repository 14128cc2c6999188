#![warn(missing_docs)]

//! Math types for the joinery timber fabrication stack.
//!
//! Thin wrappers around nalgebra providing the point, vector and direction
//! types used by beam geometry, a 4x4 affine transform, vector angle helpers,
//! and tolerance constants.

use nalgebra::{Matrix4, Unit, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Transform mapping the world axes onto `(x, y, z)` placed at `origin`.
    ///
    /// Applying it to a point given in that basis yields world coordinates.
    pub fn from_basis(origin: &Point3, x: &Vec3, y: &Vec3, z: &Vec3) -> Self {
        let mut m = Matrix4::identity();
        for (col, axis) in [x, y, z].into_iter().enumerate() {
            m[(0, col)] = axis.x;
            m[(1, col)] = axis.y;
            m[(2, col)] = axis.z;
        }
        m[(0, 3)] = origin.x;
        m[(1, 3)] = origin.y;
        m[(2, 3)] = origin.z;
        Self { matrix: m }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

/// Unsigned angle between two vectors in radians, in `[0, π]`.
///
/// Returns `None` if either vector has zero length.
pub fn angle_between(u: &Vec3, v: &Vec3) -> Option<f64> {
    let nu = u.norm();
    let nv = v.norm();
    if nu < f64::EPSILON || nv < f64::EPSILON {
        return None;
    }
    let cos = (u.dot(v) / (nu * nv)).clamp(-1.0, 1.0);
    Some(cos.acos())
}

/// Signed angle from `u` to `v` in radians, in `[-π, π]`.
///
/// The sign is negative when `u × v` points against `normal`.
pub fn signed_angle_between(u: &Vec3, v: &Vec3, normal: &Vec3) -> Option<f64> {
    let angle = angle_between(u, v)?;
    if u.cross(v).dot(normal) < 0.0 {
        Some(-angle)
    } else {
        Some(angle)
    }
}

/// Tolerances for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Linear distance tolerance in model units.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 linear, 1e-6 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-6,
    };

    /// Check if two directions are parallel or anti-parallel.
    pub fn is_parallel(&self, a: &Vec3, b: &Vec3) -> bool {
        match angle_between(a, b) {
            Some(angle) => angle < self.angular || angle > std::f64::consts::PI - self.angular,
            None => true,
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
