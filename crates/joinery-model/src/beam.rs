//! Straight timber beams with a rectangular cross-section.

use joinery_geom::{intersection_line_plane, Frame, Line, Plane};
use joinery_math::{angle_between, Point3, Tolerance, Vec3};
use serde::{Deserialize, Serialize};

use crate::{JointError, Result};

/// Which end of a beam's centerline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeamEnd {
    /// The centerline start (frame origin).
    Start,
    /// The centerline end (origin + length along x).
    End,
}

/// A blank extension requested by one joint (or by the user when `joint`
/// is `None`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlankExtension {
    /// Joint index that requested the extension.
    pub joint: Option<usize>,
    /// Extension beyond the centerline start.
    pub start: f64,
    /// Extension beyond the centerline end.
    pub end: f64,
}

/// A beam (stud, rafter, plate...) defined by a local frame and its size.
///
/// The frame origin is the start of the centerline; x runs along the
/// centerline, y across the width and z across the height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BeamData", into = "BeamData")]
pub struct Beam {
    /// Local coordinate system.
    pub frame: Frame,
    /// Centerline length.
    pub length: f64,
    /// Cross-section size along the frame y-axis.
    pub width: f64,
    /// Cross-section size along the frame z-axis.
    pub height: f64,
    blank_extensions: Vec<BlankExtension>,
}

impl Beam {
    /// Create a beam, rejecting non-positive dimensions.
    pub fn new(frame: Frame, length: f64, width: f64, height: f64) -> Result<Self> {
        for (name, value) in [("length", length), ("width", width), ("height", height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(JointError::InvalidBeam(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(Self {
            frame,
            length,
            width,
            height,
            blank_extensions: Vec::new(),
        })
    }

    /// Define a beam from its centerline.
    ///
    /// `z_vector` sets the height direction of the cross-section. It
    /// defaults to world Z, or world X when the centerline is vertical.
    pub fn from_centerline(centerline: &Line, width: f64, height: f64, z_vector: Option<Vec3>) -> Result<Self> {
        let x = centerline.vector();
        if x.norm() < f64::EPSILON {
            return Err(JointError::InvalidBeam("centerline has zero length".into()));
        }
        let z = z_vector.unwrap_or_else(|| default_z_vector(&x));
        let y = -x.cross(&z);
        if y.norm() < Tolerance::DEFAULT.linear {
            return Err(JointError::InvalidBeam(
                "the z_vector is parallel to the centerline".into(),
            ));
        }
        let frame = Frame::new(centerline.start, x, y)?;
        Self::new(frame, centerline.length(), width, height)
    }

    /// Define a beam from the two ends of its centerline.
    pub fn from_endpoints(start: Point3, end: Point3, width: f64, height: f64, z_vector: Option<Vec3>) -> Result<Self> {
        Self::from_centerline(&Line::new(start, end), width, height, z_vector)
    }

    /// The centerline from start to end.
    pub fn centerline(&self) -> Line {
        Line::from_point_and_vector(self.frame.origin, self.frame.x_axis() * self.length)
    }

    /// Midpoint of the centerline.
    pub fn midpoint(&self) -> Point3 {
        self.frame.origin + self.frame.x_axis() * (self.length * 0.5)
    }

    /// The six face frames, all with outward normals.
    ///
    /// 0: +y, 1: -z, 2: -y, 3: +z, 4: start cap (-x), 5: end cap (+x).
    pub fn faces(&self) -> [Frame; 6] {
        let (x, y, z) = (self.frame.x_axis(), self.frame.y_axis(), self.frame.normal());
        let mid = self.midpoint();
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        [
            Frame::from_orthonormal(mid + y * hw, x, -z),
            Frame::from_orthonormal(mid - z * hh, x, -y),
            Frame::from_orthonormal(mid - y * hw, x, z),
            Frame::from_orthonormal(mid + z * hh, x, y),
            Frame::from_orthonormal(self.frame.origin, -y, z),
            Frame::from_orthonormal(self.frame.origin + x * self.length, y, z),
        ]
    }

    /// The four long edges, in the order (+y+z), (-y+z), (-y-z), (+y-z).
    pub fn long_edges(&self) -> [Line; 4] {
        let (y, z) = (self.frame.y_axis(), self.frame.normal());
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        let center = self.centerline();
        [y * hw + z * hh, -y * hw + z * hh, -y * hw - z * hh, y * hw - z * hh]
            .map(|v| Line::new(center.start + v, center.end + v))
    }

    /// Which centerline end lies closer to `point`; ties go to the start.
    pub fn endpoint_closest_to_point(&self, point: &Point3) -> (BeamEnd, Point3) {
        let center = self.centerline();
        let ds = (point - center.start).norm();
        let de = (point - center.end).norm();
        if ds <= de {
            (BeamEnd::Start, center.start)
        } else {
            (BeamEnd::End, center.end)
        }
    }

    /// Record a blank extension. Requests from the same joint accumulate.
    pub fn add_blank_extension(&mut self, start: f64, end: f64, joint: Option<usize>) {
        if let Some(existing) = self
            .blank_extensions
            .iter_mut()
            .find(|ext| joint.is_some() && ext.joint == joint)
        {
            existing.start += start;
            existing.end += end;
        } else {
            self.blank_extensions.push(BlankExtension { joint, start, end });
        }
    }

    /// Drop the extension of one joint, or all of them when `joint` is `None`.
    pub fn remove_blank_extension(&mut self, joint: Option<usize>) {
        match joint {
            Some(_) => self.blank_extensions.retain(|ext| ext.joint != joint),
            None => self.blank_extensions.clear(),
        }
    }

    /// Recorded blank extensions in insertion order.
    pub fn blank_extensions(&self) -> &[BlankExtension] {
        &self.blank_extensions
    }

    /// Largest requested extension at the start and at the end.
    pub fn resolved_blank_extensions(&self) -> (f64, f64) {
        self.blank_extensions
            .iter()
            .fold((0.0_f64, 0.0_f64), |(s, e), ext| (s.max(ext.start), e.max(ext.end)))
    }

    /// Length of the stock the beam is cut from.
    pub fn blank_length(&self) -> f64 {
        let (start, end) = self.resolved_blank_extensions();
        self.length + start + end
    }

    /// The beam frame moved back by the start extension.
    pub fn blank_frame(&self) -> Frame {
        let (start, _) = self.resolved_blank_extensions();
        self.frame.translated(&(-self.frame.x_axis() * start))
    }

    /// Extension needed at each end so that every long edge reaches `plane`.
    ///
    /// Returns `(start, end)`; only the end nearest the plane can be
    /// non-zero. A negative value means the plane already cuts into the
    /// beam.
    pub fn extension_to_plane(&self, plane: &Frame, tol: &Tolerance) -> Result<(f64, f64)> {
        let pln = Plane::from_frame(plane);
        let mut params = Vec::with_capacity(4);
        for edge in self.long_edges() {
            let (_, t) = intersection_line_plane(&edge, &pln, tol)?;
            params.push(t);
        }
        let (px, _) = intersection_line_plane(&self.centerline(), &pln, tol)?;
        let t_min = params.iter().copied().fold(f64::INFINITY, f64::min);
        let t_max = params.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        match self.endpoint_closest_to_point(&px).0 {
            BeamEnd::Start => Ok((-t_min * self.length, 0.0)),
            BeamEnd::End => Ok((0.0, (t_max - 1.0) * self.length)),
        }
    }
}

fn default_z_vector(centerline: &Vec3) -> Vec3 {
    let z = Vec3::z();
    match angle_between(&z, centerline) {
        Some(angle) if angle < Tolerance::DEFAULT.angular || angle > std::f64::consts::PI - Tolerance::DEFAULT.angular => {
            Vec3::x()
        }
        _ => z,
    }
}

/// Serialized form of a [`Beam`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamData {
    /// Local frame.
    pub frame: Frame,
    /// Centerline length.
    pub length: f64,
    /// Cross-section width.
    pub width: f64,
    /// Cross-section height.
    pub height: f64,
    /// Recorded blank extensions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blank_extensions: Vec<BlankExtension>,
}

impl TryFrom<BeamData> for Beam {
    type Error = JointError;

    fn try_from(data: BeamData) -> Result<Self> {
        let mut beam = Beam::new(data.frame, data.length, data.width, data.height)?;
        beam.blank_extensions = data.blank_extensions;
        Ok(beam)
    }
}

impl From<Beam> for BeamData {
    fn from(beam: Beam) -> Self {
        Self {
            frame: beam.frame,
            length: beam.length,
            width: beam.width,
            height: beam.height,
            blank_extensions: beam.blank_extensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn along_x() -> Beam {
        Beam::from_endpoints(Point3::new(0.0, 0.5, 0.0), Point3::new(1.0, 0.5, 0.0), 0.1, 0.2, None).unwrap()
    }

    #[test]
    fn test_from_endpoints_axes() {
        let beam = along_x();
        assert_relative_eq!(beam.frame.x_axis(), Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(beam.frame.y_axis(), Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(beam.frame.normal(), Vec3::z(), epsilon = 1e-12);
        assert_relative_eq!(beam.length, 1.0);
    }

    #[test]
    fn test_vertical_beam_uses_world_x() {
        let post = Beam::from_endpoints(Point3::origin(), Point3::new(0.0, 0.0, 3.0), 0.1, 0.1, None).unwrap();
        assert_relative_eq!(post.frame.normal(), Vec3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_parallel_z_vector() {
        let err = Beam::from_endpoints(Point3::origin(), Point3::new(1.0, 0.0, 0.0), 0.1, 0.1, Some(Vec3::x()));
        assert!(matches!(err, Err(JointError::InvalidBeam(_))));
        assert!(Beam::new(Frame::world_xy(), 1.0, 0.0, 0.1).is_err());
    }

    #[test]
    fn test_faces_are_outward() {
        let beam = along_x();
        let mid = beam.midpoint();
        for face in beam.faces() {
            assert!((face.origin - mid).dot(&face.normal()) > 0.0);
        }
        let faces = beam.faces();
        assert_relative_eq!(faces[0].normal(), Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(faces[1].normal(), -Vec3::z(), epsilon = 1e-12);
        assert_relative_eq!(faces[2].normal(), -Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(faces[3].normal(), Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_long_edges_offsets() {
        let beam = along_x();
        let edges = beam.long_edges();
        assert_relative_eq!(edges[2].start, Point3::new(0.0, 0.45, -0.1), epsilon = 1e-12);
        assert_relative_eq!(edges[0].end, Point3::new(1.0, 0.55, 0.1), epsilon = 1e-12);
    }

    #[test]
    fn test_blank_extensions_resolve_to_max() {
        let mut beam = along_x();
        beam.add_blank_extension(0.1, 0.0, Some(0));
        beam.add_blank_extension(0.05, 0.2, Some(1));
        beam.add_blank_extension(0.05, 0.0, Some(1));
        assert_relative_eq!(beam.blank_length(), 1.3);
        assert_relative_eq!(beam.blank_frame().origin, Point3::new(-0.1, 0.5, 0.0), epsilon = 1e-12);

        beam.remove_blank_extension(Some(0));
        assert_relative_eq!(beam.blank_length(), 1.3);
        beam.remove_blank_extension(None);
        assert_relative_eq!(beam.blank_length(), 1.0);
    }

    #[test]
    fn test_extension_to_miter_plane() {
        let beam = along_x();
        let normal = Vec3::new(-1.0, 1.0, 0.0);
        let plane = Frame::new(Point3::new(0.0, 0.5, 0.0), Vec3::z(), normal.cross(&Vec3::z())).unwrap();
        let (start, end) = beam.extension_to_plane(&plane, &Tolerance::DEFAULT).unwrap();
        assert_relative_eq!(start, 0.05, epsilon = 1e-12);
        assert_relative_eq!(end, 0.0);
    }

    #[test]
    fn test_serde_roundtrip_keeps_extensions() {
        let mut beam = along_x();
        beam.add_blank_extension(0.02, 0.0, None);
        let json = serde_json::to_string(&beam).unwrap();
        let back: Beam = serde_json::from_str(&json).unwrap();
        assert_relative_eq!(back.blank_length(), 1.02, epsilon = 1e-12);
    }

    #[test]
    fn test_deserialize_rejects_bad_size() {
        let json = r#"{"frame":{"origin":[0,0,0],"x_axis":[1,0,0],"y_axis":[0,1,0]},"length":1.0,"width":-1.0,"height":0.2}"#;
        assert!(serde_json::from_str::<Beam>(json).is_err());
    }
}
