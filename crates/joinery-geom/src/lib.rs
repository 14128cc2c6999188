#![warn(missing_docs)]

//! Frames, planes and lines for the joinery stack.
//!
//! A [`Frame`] is an oriented plane: an origin plus an orthonormal `(x, y)`
//! pair whose cross product is the frame normal. Beam faces, cutting planes
//! and reference sides are all frames. [`Plane`] drops the in-plane axes
//! and keeps only point and normal; [`Line`] is a bounded segment whose
//! parameter `t` runs from 0 at `start` to 1 at `end`.

pub mod error;
pub mod intersect;

pub use error::{GeomError, Result};
pub use intersect::{
    intersection_line_line, intersection_line_plane, intersection_plane_plane,
    intersection_plane_plane_plane,
};

use joinery_math::{Dir3, Point3, Transform, Vec3};
use serde::{Deserialize, Serialize};

// =============================================================================
// Frame
// =============================================================================

/// Right-handed placement of a beam, face or cutting plane.
///
/// On a beam frame `x_dir` runs along the centerline. On a face or
/// reference side `x_dir` follows the beam where the face allows it and
/// `normal_dir` points out of the material; on a cutting plane it points
/// into the waste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FrameData", into = "FrameData")]
pub struct Frame {
    /// Where local coordinates are zero.
    pub origin: Point3,
    /// First in-plane axis; the beam direction on beam and long-face frames.
    pub x_dir: Dir3,
    /// Second in-plane axis, across the face.
    pub y_dir: Dir3,
    /// `x_dir × y_dir`: outward on faces, toward the waste on cuts.
    pub normal_dir: Dir3,
}

impl Frame {
    /// Create a frame from an origin and two direction vectors.
    ///
    /// `x_dir` is kept as given (normalized); `y_dir` is re-orthogonalized
    /// against it. Fails when either vector is zero or they are parallel.
    pub fn new(origin: Point3, x_dir: Vec3, y_dir: Vec3) -> Result<Self> {
        if x_dir.norm() < f64::EPSILON || y_dir.norm() < f64::EPSILON {
            return Err(GeomError::Degenerate("frame axis has zero length"));
        }
        let normal = x_dir.cross(&y_dir);
        if normal.norm() < 1e-12 * x_dir.norm() * y_dir.norm() {
            return Err(GeomError::Parallel("frame axes"));
        }
        let x = Dir3::new_normalize(x_dir);
        let n = Dir3::new_normalize(normal);
        let y = Dir3::new_normalize(n.as_ref().cross(x.as_ref()));
        Ok(Self {
            origin,
            x_dir: x,
            y_dir: y,
            normal_dir: n,
        })
    }

    /// Create a frame from axes that are already orthonormal.
    ///
    /// Used for frames derived from another frame's axes (beam faces,
    /// reference sides), where re-validation is redundant.
    pub fn from_orthonormal(origin: Point3, x_dir: Vec3, y_dir: Vec3) -> Self {
        let x = Dir3::new_normalize(x_dir);
        let y = Dir3::new_normalize(y_dir);
        let n = Dir3::new_normalize(x_dir.cross(&y_dir));
        Self {
            origin,
            x_dir: x,
            y_dir: y,
            normal_dir: n,
        }
    }

    /// XY frame at the world origin.
    pub fn world_xy() -> Self {
        Self::from_orthonormal(Point3::origin(), Vec3::x(), Vec3::y())
    }

    /// The x-axis as a plain vector.
    pub fn x_axis(&self) -> Vec3 {
        *self.x_dir.as_ref()
    }

    /// The y-axis as a plain vector.
    pub fn y_axis(&self) -> Vec3 {
        *self.y_dir.as_ref()
    }

    /// The normal (z-axis) as a plain vector.
    pub fn normal(&self) -> Vec3 {
        *self.normal_dir.as_ref()
    }

    /// Same origin with x and y swapped, which reverses the normal.
    pub fn flipped(&self) -> Self {
        Self::from_orthonormal(self.origin, self.y_axis(), self.x_axis())
    }

    /// Copy of this frame moved by `offset`.
    pub fn translated(&self, offset: &Vec3) -> Self {
        Self {
            origin: self.origin + offset,
            ..self.clone()
        }
    }

    /// Transform taking coordinates expressed in this frame to world space.
    pub fn to_world_transform(&self) -> Transform {
        Transform::from_basis(&self.origin, &self.x_axis(), &self.y_axis(), &self.normal())
    }

    /// Express a world point in this frame's local `(x, y, z)` coordinates.
    pub fn to_local(&self, p: &Point3) -> Point3 {
        let d = p - self.origin;
        Point3::new(
            d.dot(self.x_dir.as_ref()),
            d.dot(self.y_dir.as_ref()),
            d.dot(self.normal_dir.as_ref()),
        )
    }

    /// Map a local point of this frame back to world space.
    pub fn to_world(&self, local: &Point3) -> Point3 {
        self.to_world_transform().apply_point(local)
    }

    /// Signed distance from a point to this frame's plane.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(self.normal_dir.as_ref())
    }
}

/// Serialized form of a [`Frame`]: origin plus the two in-plane axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameData {
    /// Origin `[x, y, z]`.
    pub origin: [f64; 3],
    /// X axis `[x, y, z]`.
    pub x_axis: [f64; 3],
    /// Y axis `[x, y, z]`.
    pub y_axis: [f64; 3],
}

impl TryFrom<FrameData> for Frame {
    type Error = GeomError;

    fn try_from(data: FrameData) -> Result<Self> {
        let [ox, oy, oz] = data.origin;
        Frame::new(
            Point3::new(ox, oy, oz),
            Vec3::from(data.x_axis),
            Vec3::from(data.y_axis),
        )
    }
}

impl From<Frame> for FrameData {
    fn from(frame: Frame) -> Self {
        Self {
            origin: [frame.origin.x, frame.origin.y, frame.origin.z],
            x_axis: frame.x_axis().into(),
            y_axis: frame.y_axis().into(),
        }
    }
}

// =============================================================================
// Plane
// =============================================================================

/// An infinite plane given by a point and a unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub point: Point3,
    /// Unit normal.
    pub normal: Dir3,
}

impl Plane {
    /// Create a plane from a point and a (non-zero) normal.
    pub fn new(point: Point3, normal: Vec3) -> Result<Self> {
        if normal.norm() < f64::EPSILON {
            return Err(GeomError::Degenerate("plane normal has zero length"));
        }
        Ok(Self {
            point,
            normal: Dir3::new_normalize(normal),
        })
    }

    /// The plane a frame lies in.
    pub fn from_frame(frame: &Frame) -> Self {
        Self {
            point: frame.origin,
            normal: frame.normal_dir,
        }
    }

    /// Plane offset `d` in the implicit form `n · x = d`.
    pub fn offset(&self) -> f64 {
        self.normal.as_ref().dot(&self.point.coords)
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.point).dot(self.normal.as_ref())
    }
}

// =============================================================================
// Line
// =============================================================================

/// A line segment from `start` to `end`.
///
/// Intersection parameters are expressed as fractions of the segment:
/// `t = 0` at `start`, `t = 1` at `end`, and values outside `[0, 1]` on the
/// infinite extension.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Start point.
    pub start: Point3,
    /// End point.
    pub end: Point3,
}

impl Line {
    /// Create a line between two points.
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Line starting at `start` running along `vector`.
    pub fn from_point_and_vector(start: Point3, vector: Vec3) -> Self {
        Self {
            start,
            end: start + vector,
        }
    }

    /// The vector from start to end.
    pub fn vector(&self) -> Vec3 {
        self.end - self.start
    }

    /// Segment length.
    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    /// Point at parameter `t`.
    pub fn point_at(&self, t: f64) -> Point3 {
        self.start + self.vector() * t
    }

    /// Closest point on the infinite line through this segment.
    pub fn closest_point(&self, p: &Point3) -> Result<Point3> {
        let v = self.vector();
        let len_sq = v.norm_squared();
        if len_sq < f64::EPSILON {
            return Err(GeomError::Degenerate("line has zero length"));
        }
        let t = (p - self.start).dot(&v) / len_sq;
        Ok(self.point_at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_orthogonalizes_y() {
        let f = Frame::new(Point3::origin(), Vec3::x() * 3.0, Vec3::new(1.0, 2.0, 0.0)).unwrap();
        assert_relative_eq!(f.x_axis(), Vec3::x());
        assert_relative_eq!(f.y_axis(), Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(f.normal(), Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_frame_rejects_parallel_axes() {
        let err = Frame::new(Point3::origin(), Vec3::x(), Vec3::x() * 2.0).unwrap_err();
        assert_eq!(err, GeomError::Parallel("frame axes"));
        assert!(Frame::new(Point3::origin(), Vec3::zeros(), Vec3::y()).is_err());
    }

    #[test]
    fn test_flipped_reverses_normal() {
        let f = Frame::world_xy().flipped();
        assert_relative_eq!(f.normal(), -Vec3::z());
        assert_relative_eq!(f.x_axis(), Vec3::y());
    }

    #[test]
    fn test_local_world_roundtrip() {
        let f = Frame::new(Point3::new(1.0, 2.0, 3.0), Vec3::y(), Vec3::z()).unwrap();
        let p = Point3::new(4.0, -1.0, 7.5);
        let local = f.to_local(&p);
        assert_relative_eq!(local, Point3::new(-3.0, 4.5, 3.0), epsilon = 1e-12);
        assert_relative_eq!(f.to_world(&local), p, epsilon = 1e-12);
        assert_relative_eq!(f.signed_distance(&p), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_frame_data_roundtrip() {
        let f = Frame::new(Point3::new(0.5, 0.0, 1.0), Vec3::y(), -Vec3::x()).unwrap();
        let data = FrameData::from(f.clone());
        assert_eq!(data.origin, [0.5, 0.0, 1.0]);
        let back = Frame::try_from(data).unwrap();
        assert_relative_eq!(back.normal(), Vec3::z(), epsilon = 1e-12);
        assert_relative_eq!(back.x_axis(), f.x_axis(), epsilon = 1e-12);
    }

    #[test]
    fn test_plane_offset_and_distance() {
        let p = Plane::new(Point3::new(0.0, 0.0, 2.0), Vec3::z() * 5.0).unwrap();
        assert_relative_eq!(p.offset(), 2.0);
        assert_relative_eq!(p.signed_distance(&Point3::new(7.0, 1.0, -1.0)), -3.0);
        assert!(Plane::new(Point3::origin(), Vec3::zeros()).is_err());
    }

    #[test]
    fn test_line_closest_point_is_unbounded() {
        let line = Line::new(Point3::origin(), Point3::new(2.0, 0.0, 0.0));
        let c = line.closest_point(&Point3::new(-3.0, 1.0, 0.0)).unwrap();
        assert_relative_eq!(c, Point3::new(-3.0, 0.0, 0.0));
        assert_relative_eq!(line.length(), 2.0);
        assert_relative_eq!(line.point_at(0.25), Point3::new(0.5, 0.0, 0.0));
    }
}
