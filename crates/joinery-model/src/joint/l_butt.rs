use joinery_geom::Frame;
use joinery_math::Tolerance;
use serde::{Deserialize, Serialize};

use super::{extension_for, farthest_face, member, nearest_face, Cut, JointGeometry, JointKind, JointRole};
use crate::beam::Beam;
use crate::{JointError, Result};

/// L butt joint: the main beam runs past the end of the cross beam and is
/// trimmed flush with its outer face; the cross beam stops against the
/// inner face of the main beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LButtJoint {
    /// Index of the beam that covers the corner.
    pub main: usize,
    /// Index of the beam that butts against it.
    pub cross: usize,
}

impl LButtJoint {
    /// Corner joint between two beams.
    pub fn new(main: usize, cross: usize) -> Self {
        Self { main, cross }
    }

    /// Trimming plane of the main beam: the outer face of the cross beam.
    pub fn main_cutting_plane(&self, main: &Beam, cross: &Beam, tol: &Tolerance) -> Result<Frame> {
        let (_, face) = farthest_face(main, cross, tol)?;
        Ok(face)
    }

    /// Trimming plane of the cross beam: the inner face of the main beam.
    pub fn cross_cutting_plane(&self, main: &Beam, cross: &Beam, tol: &Tolerance) -> Result<Frame> {
        let (_, face) = nearest_face(cross, main, tol)?;
        Ok(face.flipped())
    }
}

impl JointGeometry for LButtJoint {
    fn kind(&self) -> JointKind {
        JointKind::LButt
    }

    fn members(&self) -> Vec<(JointRole, usize)> {
        vec![(JointRole::Main, self.main), (JointRole::Cross, self.cross)]
    }

    fn cut(&self, role: JointRole, beams: &[Beam], tol: &Tolerance) -> Result<Cut> {
        let main = member(beams, self.main)?;
        let cross = member(beams, self.cross)?;
        match role {
            JointRole::Main => Ok(Cut::Plane(self.main_cutting_plane(main, cross, tol)?)),
            JointRole::Cross => Ok(Cut::Plane(self.cross_cutting_plane(main, cross, tol)?)),
            JointRole::BeamA | JointRole::BeamB => Err(JointError::InvalidJointTopology(format!(
                "{} has no {role} role",
                self.kind()
            ))),
        }
    }

    fn blank_extensions(&self, beams: &[Beam], tol: &Tolerance) -> Result<Vec<(usize, f64, f64)>> {
        let main = member(beams, self.main)?;
        let cross = member(beams, self.cross)?;
        Ok(vec![
            extension_for(main, self.main, &self.main_cutting_plane(main, cross, tol)?, tol)?,
            extension_for(cross, self.cross, &self.cross_cutting_plane(main, cross, tol)?, tol)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::corner_pair;
    use super::*;
    use approx::assert_relative_eq;
    use joinery_math::{Point3, Vec3};

    const TOL: Tolerance = Tolerance::DEFAULT;

    #[test]
    fn test_corner_planes() {
        let beams = corner_pair();
        let joint = LButtJoint::new(0, 1);
        let main = joint.main_cutting_plane(&beams[0], &beams[1], &TOL).unwrap();
        assert_relative_eq!(main.origin.x, -0.05, epsilon = 1e-12);
        assert_relative_eq!(main.normal(), -Vec3::x(), epsilon = 1e-12);

        let cross = joint.cross_cutting_plane(&beams[0], &beams[1], &TOL).unwrap();
        assert_relative_eq!(cross.origin.y, 0.05, epsilon = 1e-12);
        assert_relative_eq!(cross.normal(), -Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_main_is_extended_over_the_corner() {
        let beams = corner_pair();
        let ext = LButtJoint::new(0, 1).blank_extensions(&beams, &TOL).unwrap();
        assert_eq!(ext.len(), 2);
        assert_eq!(ext[0].0, 0);
        assert_relative_eq!(ext[0].1, 0.05, epsilon = 1e-12);
        assert_relative_eq!(ext[1].1, 0.0);
    }

    #[test]
    fn test_collinear_beams_are_degenerate() {
        let beams = vec![
            Beam::from_endpoints(Point3::origin(), Point3::new(1.0, 0.0, 0.0), 0.1, 0.1, None).unwrap(),
            Beam::from_endpoints(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0), 0.1, 0.1, None).unwrap(),
        ];
        let err = LButtJoint::new(0, 1).cut(JointRole::Main, &beams, &TOL).unwrap_err();
        assert!(matches!(err, JointError::GeometryDegenerate(_)));
    }
}
