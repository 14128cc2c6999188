use joinery_geom::{intersection_line_line, Frame};
use joinery_math::{Point3, Tolerance};
use serde::{Deserialize, Serialize};

use super::{extension_for, incidence, member, Cut, JointGeometry, JointKind, JointRole};
use crate::beam::Beam;
use crate::{JointError, Result};

/// L miter joint: both beams are cut on the plane bisecting the corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LMiterJoint {
    /// Index of the first beam.
    pub beam_a: usize,
    /// Index of the second beam.
    pub beam_b: usize,
}

impl LMiterJoint {
    /// Miter between two beams.
    pub fn new(beam_a: usize, beam_b: usize) -> Self {
        Self { beam_a, beam_b }
    }

    /// The two cutting planes `(a, b)`.
    ///
    /// Both lie on the bisecting plane through the midpoint of the closest
    /// points of the centerlines, with opposite normals.
    pub fn cutting_planes(&self, a: &Beam, b: &Beam, tol: &Tolerance) -> Result<(Frame, Frame)> {
        let ((pa, _), (pb, _)) = intersection_line_line(&a.centerline(), &b.centerline(), tol)?;
        let origin = Point3::from((pa.coords + pb.coords) * 0.5);

        let va = incidence(a, b, tol)?.body_direction;
        let vb = incidence(b, a, tol)?.body_direction;
        let bisector = va + vb;
        if bisector.norm() < tol.linear {
            return Err(JointError::GeometryDegenerate("miter beams point in opposite directions".into()));
        }
        let bisector = bisector.normalize();
        let across = bisector.cross(&va);

        let plane_a = Frame::new(origin, bisector, across)?;
        let plane_b = Frame::new(origin, across, bisector)?;
        Ok((plane_a, plane_b))
    }
}

impl JointGeometry for LMiterJoint {
    fn kind(&self) -> JointKind {
        JointKind::LMiter
    }

    fn members(&self) -> Vec<(JointRole, usize)> {
        vec![(JointRole::BeamA, self.beam_a), (JointRole::BeamB, self.beam_b)]
    }

    fn cut(&self, role: JointRole, beams: &[Beam], tol: &Tolerance) -> Result<Cut> {
        let a = member(beams, self.beam_a)?;
        let b = member(beams, self.beam_b)?;
        match role {
            JointRole::BeamA => Ok(Cut::Plane(self.cutting_planes(a, b, tol)?.0)),
            JointRole::BeamB => Ok(Cut::Plane(self.cutting_planes(a, b, tol)?.1)),
            JointRole::Main | JointRole::Cross => Err(JointError::InvalidJointTopology(format!(
                "{} has no {role} role",
                self.kind()
            ))),
        }
    }

    fn blank_extensions(&self, beams: &[Beam], tol: &Tolerance) -> Result<Vec<(usize, f64, f64)>> {
        let a = member(beams, self.beam_a)?;
        let b = member(beams, self.beam_b)?;
        let (plane_a, plane_b) = self.cutting_planes(a, b, tol)?;
        Ok(vec![
            extension_for(a, self.beam_a, &plane_a, tol)?,
            extension_for(b, self.beam_b, &plane_b, tol)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::corner_pair;
    use super::*;
    use approx::assert_relative_eq;
    use joinery_math::Vec3;

    const TOL: Tolerance = Tolerance::DEFAULT;

    #[test]
    fn test_planes_are_coincident_and_opposite() {
        let beams = corner_pair();
        let (a, b) = LMiterJoint::new(0, 1).cutting_planes(&beams[0], &beams[1], &TOL).unwrap();
        assert_relative_eq!(a.normal(), -b.normal(), epsilon = 1e-12);
        assert_relative_eq!(a.origin, b.origin, epsilon = 1e-12);
        let expected = Vec3::new(-1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(a.normal(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_normals_point_into_waste() {
        let beams = corner_pair();
        let (a, b) = LMiterJoint::new(0, 1).cutting_planes(&beams[0], &beams[1], &TOL).unwrap();
        assert!(a.signed_distance(&beams[0].midpoint()) < 0.0);
        assert!(b.signed_distance(&beams[1].midpoint()) < 0.0);
    }

    #[test]
    fn test_both_beams_extend_to_the_miter() {
        let beams = corner_pair();
        let ext = LMiterJoint::new(0, 1).blank_extensions(&beams, &TOL).unwrap();
        assert_relative_eq!(ext[0].1, 0.05, epsilon = 1e-12);
        assert_relative_eq!(ext[1].1, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_skew_corner_still_symmetric() {
        let beams = vec![
            Beam::from_endpoints(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 1.0, 0.0), 0.1, 0.2, None).unwrap(),
            Beam::from_endpoints(Point3::new(0.0, 0.0, 0.0), Point3::new(-0.5, 2.0, 0.0), 0.1, 0.2, None).unwrap(),
        ];
        let (a, b) = LMiterJoint::new(0, 1).cutting_planes(&beams[0], &beams[1], &TOL).unwrap();
        assert!(TOL.is_parallel(&a.normal(), &b.normal()));
        assert_relative_eq!(a.normal().dot(&b.normal()), -1.0, epsilon = 1e-12);
    }
}
