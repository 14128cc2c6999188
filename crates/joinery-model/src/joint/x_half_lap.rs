use joinery_geom::{intersection_line_line, intersection_line_plane, Frame, Plane};
use joinery_math::{Point3, Tolerance, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{member, Cut, JointGeometry, JointKind, JointRole, LapCut};
use crate::beam::Beam;
use crate::{JointError, Result};

fn default_ratio() -> f64 {
    0.5
}

/// X half lap: two crossing beams, each notched so they sit flush.
///
/// `cut_depth_ratio` is the share of the overlap taken out of `beam_a`;
/// `beam_b` loses the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XHalfLapJoint {
    /// Index of the first beam.
    pub beam_a: usize,
    /// Index of the second beam.
    pub beam_b: usize,
    /// Share of the lap cut from `beam_a`, in (0, 1).
    #[serde(default = "default_ratio")]
    pub cut_depth_ratio: f64,
}

impl XHalfLapJoint {
    /// Half lap with an even split.
    pub fn new(beam_a: usize, beam_b: usize) -> Self {
        Self {
            beam_a,
            beam_b,
            cut_depth_ratio: default_ratio(),
        }
    }

    /// Set the share cut from `beam_a`.
    pub fn with_cut_depth_ratio(mut self, ratio: f64) -> Self {
        self.cut_depth_ratio = ratio;
        self
    }

    /// Lap pockets `(on_a, on_b)`.
    ///
    /// The overlap of the two sections along the line joining the
    /// centerlines is split at one plane; both pocket floors lie on it.
    pub fn laps(&self, a: &Beam, b: &Beam, tol: &Tolerance) -> Result<(LapCut, LapCut)> {
        let ((pa, _), (pb, _)) = intersection_line_line(&a.centerline(), &b.centerline(), tol)?;
        let mut toward_b = a.frame.x_axis().cross(&b.frame.x_axis()).normalize();
        if toward_b.dot(&(pb - pa)) < 0.0 {
            toward_b = -toward_b;
        }

        let face_a = most_aligned_face(a, &toward_b);
        let face_b = most_aligned_face(b, &-toward_b);
        let level = |p: &Point3| (p - pa).dot(&toward_b);
        let overlap = level(&face_a.origin) - level(&face_b.origin);
        if overlap <= tol.linear {
            return Err(JointError::GeometryDegenerate(format!(
                "crossing beams do not overlap (gap {:.6})",
                -overlap
            )));
        }

        let depth_a = self.cut_depth_ratio * overlap;
        let depth_b = overlap - depth_a;
        debug!(overlap, depth_a, depth_b, "half lap split");
        Ok((lap_on(a, face_a, b, depth_a, tol)?, lap_on(b, face_b, a, depth_b, tol)?))
    }
}

/// Pocket of `depth` on `face` of `beam`, shaped by the two side faces of
/// `other`.
fn lap_on(beam: &Beam, face: Frame, other: &Beam, depth: f64, tol: &Tolerance) -> Result<LapCut> {
    let on_face: Vec<_> = beam
        .long_edges()
        .into_iter()
        .filter(|edge| face.signed_distance(&edge.start).abs() < tol.linear)
        .collect();
    if on_face.len() != 2 {
        return Err(JointError::GeometryDegenerate("lap face is not bounded by two edges".into()));
    }

    let direction = face.normal();
    let mut sides: Vec<(usize, f64)> = other
        .faces()
        .iter()
        .take(4)
        .enumerate()
        .map(|(i, f)| (i, f.normal().dot(&direction).abs()))
        .collect();
    sides.sort_by(|x, y| x.1.total_cmp(&y.1));
    let other_faces = other.faces();
    let walls = [&other_faces[sides[0].0], &other_faces[sides[1].0]];

    let mut corners = [Point3::origin(); 4];
    for (i, wall) in walls.iter().enumerate() {
        let plane = Plane::from_frame(wall);
        for (j, edge) in on_face.iter().enumerate() {
            corners[i * 2 + j] = intersection_line_plane(edge, &plane, tol)?.0;
        }
    }

    Ok(LapCut {
        face,
        depth,
        corners,
        wall: walls[0].clone(),
    })
}

fn most_aligned_face(beam: &Beam, direction: &Vec3) -> Frame {
    let faces = beam.faces();
    let mut best = 0;
    for i in 1..4 {
        if faces[i].normal().dot(direction) > faces[best].normal().dot(direction) {
            best = i;
        }
    }
    faces[best].clone()
}

impl JointGeometry for XHalfLapJoint {
    fn kind(&self) -> JointKind {
        JointKind::XHalfLap
    }

    fn members(&self) -> Vec<(JointRole, usize)> {
        vec![(JointRole::BeamA, self.beam_a), (JointRole::BeamB, self.beam_b)]
    }

    fn validate_parameters(&self) -> Result<()> {
        if !(self.cut_depth_ratio > 0.0 && self.cut_depth_ratio < 1.0) {
            return Err(JointError::InvalidParameter(format!(
                "cut_depth_ratio must lie strictly between 0 and 1, got {}",
                self.cut_depth_ratio
            )));
        }
        Ok(())
    }

    fn cut(&self, role: JointRole, beams: &[Beam], tol: &Tolerance) -> Result<Cut> {
        let a = member(beams, self.beam_a)?;
        let b = member(beams, self.beam_b)?;
        match role {
            JointRole::BeamA => Ok(Cut::Lap(self.laps(a, b, tol)?.0)),
            JointRole::BeamB => Ok(Cut::Lap(self.laps(a, b, tol)?.1)),
            JointRole::Main | JointRole::Cross => Err(JointError::InvalidJointTopology(format!(
                "{} has no {role} role",
                self.kind()
            ))),
        }
    }

    fn blank_extensions(&self, _beams: &[Beam], _tol: &Tolerance) -> Result<Vec<(usize, f64, f64)>> {
        Ok(Vec::new())
    }
}
