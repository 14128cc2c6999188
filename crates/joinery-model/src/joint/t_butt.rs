use std::f64::consts::FRAC_PI_2;

use joinery_geom::Frame;
use joinery_math::Tolerance;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    beam_side_incidence, edge_footprint, extension_for, member, nearest_face, Cut, JointGeometry, JointKind,
    JointRole, LapCut,
};
use crate::beam::Beam;
use crate::{JointError, Result};

/// T butt joint: the main beam ends flush against a side of the cross beam.
///
/// With `mill_depth > 0` the main beam is let into the cross beam by that
/// depth and the cross beam receives a matching lap pocket. With
/// `birdsmouth` the main beam is notched over the two cross-beam faces it
/// rests on instead of being trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TButtJoint {
    /// Index of the beam that ends at the joint.
    pub main: usize,
    /// Index of the beam it butts against.
    pub cross: usize,
    /// Depth the main beam is housed into the cross beam.
    #[serde(default)]
    pub mill_depth: f64,
    /// Notch the main beam instead of trimming it.
    #[serde(default)]
    pub birdsmouth: bool,
}

impl TButtJoint {
    /// Plain butt joint.
    pub fn new(main: usize, cross: usize) -> Self {
        Self {
            main,
            cross,
            mill_depth: 0.0,
            birdsmouth: false,
        }
    }

    /// Set the housing depth.
    pub fn with_mill_depth(mut self, mill_depth: f64) -> Self {
        self.mill_depth = mill_depth;
        self
    }

    /// Enable or disable the birdsmouth notch.
    pub fn with_birdsmouth(mut self, birdsmouth: bool) -> Self {
        self.birdsmouth = birdsmouth;
        self
    }

    /// Trimming plane of the main beam: the cross-beam face it meets,
    /// sunk by the mill depth and flipped to face the waste.
    pub fn main_cutting_plane(&self, main: &Beam, cross: &Beam, tol: &Tolerance) -> Result<Frame> {
        let (index, face) = nearest_face(main, cross, tol)?;
        debug!(face = index, mill_depth = self.mill_depth, "t-butt main plane");
        let sunk = face.translated(&(-face.normal() * self.mill_depth));
        Ok(sunk.flipped())
    }

    /// The two cross-beam faces the main beam sits on, nearest first.
    ///
    /// Faces keep their outward normals.
    pub fn birdsmouth_planes(&self, main: &Beam, cross: &Beam, tol: &Tolerance) -> Result<[Frame; 2]> {
        let ranked = beam_side_incidence(main, cross, true, tol)?;
        let (first, second) = (ranked[0], ranked[1]);
        if second.1 >= FRAC_PI_2 - tol.angular {
            return Err(JointError::GeometryDegenerate(
                "birdsmouth needs two cross-beam faces turned toward the main beam".into(),
            ));
        }
        let faces = cross.faces();
        Ok([faces[first.0].clone(), faces[second.0].clone()])
    }

    /// Lap pocket in the cross beam receiving the housed main beam.
    pub fn cross_lap(&self, main: &Beam, cross: &Beam, tol: &Tolerance) -> Result<Option<LapCut>> {
        if self.mill_depth <= 0.0 {
            return Ok(None);
        }
        let (_, face) = nearest_face(main, cross, tol)?;
        let corners = edge_footprint(main, &face, tol)?;
        Ok(Some(LapCut {
            face,
            depth: self.mill_depth,
            corners,
            wall: main.faces()[0].clone(),
        }))
    }
}

impl JointGeometry for TButtJoint {
    fn kind(&self) -> JointKind {
        JointKind::TButt
    }

    fn members(&self) -> Vec<(JointRole, usize)> {
        vec![(JointRole::Main, self.main), (JointRole::Cross, self.cross)]
    }

    fn validate_parameters(&self) -> Result<()> {
        if !(self.mill_depth >= 0.0 && self.mill_depth.is_finite()) {
            return Err(JointError::InvalidParameter(format!(
                "mill_depth must be zero or positive, got {}",
                self.mill_depth
            )));
        }
        Ok(())
    }

    fn cut(&self, role: JointRole, beams: &[Beam], tol: &Tolerance) -> Result<Cut> {
        let main = member(beams, self.main)?;
        let cross = member(beams, self.cross)?;
        match role {
            JointRole::Main if self.birdsmouth => Ok(Cut::DoublePlane(self.birdsmouth_planes(main, cross, tol)?)),
            JointRole::Main => Ok(Cut::Plane(self.main_cutting_plane(main, cross, tol)?)),
            JointRole::Cross => Ok(self.cross_lap(main, cross, tol)?.map_or(Cut::None, Cut::Lap)),
            JointRole::BeamA | JointRole::BeamB => Err(JointError::InvalidJointTopology(format!(
                "{} has no {role} role",
                self.kind()
            ))),
        }
    }

    fn blank_extensions(&self, beams: &[Beam], tol: &Tolerance) -> Result<Vec<(usize, f64, f64)>> {
        if self.birdsmouth {
            return Ok(Vec::new());
        }
        let main = member(beams, self.main)?;
        let cross = member(beams, self.cross)?;
        let plane = self.main_cutting_plane(main, cross, tol)?;
        Ok(vec![extension_for(main, self.main, &plane, tol)?])
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{cross_along_x, main_along_y};
    use super::*;
    use approx::assert_relative_eq;
    use joinery_math::{Point3, Vec3};

    const TOL: Tolerance = Tolerance::DEFAULT;

    fn beams() -> Vec<Beam> {
        vec![main_along_y(), cross_along_x()]
    }

    #[test]
    fn test_main_plane_faces_waste() {
        let beams = beams();
        let joint = TButtJoint::new(0, 1);
        let Cut::Plane(plane) = joint.cut(JointRole::Main, &beams, &TOL).unwrap() else {
            panic!("expected a plane cut");
        };
        assert_relative_eq!(plane.origin.y, 0.05, epsilon = 1e-12);
        assert_relative_eq!(plane.normal(), -Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_mill_depth_sinks_plane_and_adds_lap() {
        let beams = beams();
        let joint = TButtJoint::new(0, 1).with_mill_depth(0.02);
        let plane = joint.main_cutting_plane(&beams[0], &beams[1], &TOL).unwrap();
        assert_relative_eq!(plane.origin.y, 0.03, epsilon = 1e-12);

        let Cut::Lap(lap) = joint.cut(JointRole::Cross, &beams, &TOL).unwrap() else {
            panic!("expected a lap");
        };
        assert_relative_eq!(lap.depth, 0.02);
        assert_relative_eq!(lap.face.normal(), Vec3::y(), epsilon = 1e-12);
        for corner in lap.corners {
            assert_relative_eq!(corner.y, 0.05, epsilon = 1e-12);
            assert_relative_eq!(corner.x.abs(), 0.05, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cross_without_mill_depth_has_no_cut() {
        let beams = beams();
        let cut = TButtJoint::new(0, 1).cut(JointRole::Cross, &beams, &TOL).unwrap();
        assert_eq!(cut, Cut::None);
    }

    #[test]
    fn test_birdsmouth_picks_two_bearing_faces() {
        let rafter = Beam::from_endpoints(Point3::origin(), Point3::new(0.0, 1.0, 1.0), 0.1, 0.1, None).unwrap();
        let beams = vec![rafter, cross_along_x()];
        let joint = TButtJoint::new(0, 1).with_birdsmouth(true);
        let Cut::DoublePlane([a, b]) = joint.cut(JointRole::Main, &beams, &TOL).unwrap() else {
            panic!("expected a double plane cut");
        };
        assert_relative_eq!(a.normal(), Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(b.normal(), Vec3::z(), epsilon = 1e-12);
        assert!(joint.blank_extensions(&beams, &TOL).unwrap().is_empty());
    }

    #[test]
    fn test_square_birdsmouth_is_degenerate() {
        let joint = TButtJoint::new(0, 1).with_birdsmouth(true);
        let err = joint.cut(JointRole::Main, &beams(), &TOL).unwrap_err();
        assert!(matches!(err, JointError::GeometryDegenerate(_)));
    }

    #[test]
    fn test_negative_mill_depth_rejected() {
        let joint = crate::Joint::from(TButtJoint::new(0, 1).with_mill_depth(-0.01));
        assert!(matches!(
            joint.cut(JointRole::Main, &beams(), &TOL),
            Err(JointError::InvalidParameter(_))
        ));
    }
}
