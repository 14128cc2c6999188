//! Joints between beams and the cuts they imply.
//!
//! A [`Joint`] is a closed set of variants, one per topology. Each variant
//! names its beams by index into the assembly's beam list and assigns each
//! one a [`JointRole`]. For every role it defines, a variant answers
//! [`Joint::cut`] with a [`Cut`]: a trimming plane, a notch, a lap pocket,
//! a tenon, or an explicit [`Cut::None`].
//!
//! Cutting-plane frames follow one convention throughout: the normal points
//! away from the material that is kept, into the waste.

pub mod incidence;
mod l_butt;
mod l_miter;
mod t_butt;
mod t_dovetail;
mod t_stirnversatz;
mod x_half_lap;

pub use incidence::{beam_side_incidence, farthest_face, incidence, nearest_face, Incidence};
pub use l_butt::LButtJoint;
pub use l_miter::LMiterJoint;
pub use t_butt::TButtJoint;
pub use t_dovetail::{DovetailOptions, DovetailShape, TDovetailJoint};
pub use t_stirnversatz::TStirnversatzJoint;
pub use x_half_lap::XHalfLapJoint;

use std::fmt;

use joinery_geom::{intersection_line_plane, Frame, Plane};
use joinery_math::{Point3, Tolerance};
use serde::{Deserialize, Serialize};

use crate::beam::Beam;
use crate::{JointError, Result};

// =============================================================================
// Kinds and roles
// =============================================================================

/// Joint topology tag, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointKind {
    /// Main beam butts against the side of a cross beam.
    TButt,
    /// Corner where one beam butts past the end of the other.
    LButt,
    /// Corner cut on the bisector.
    LMiter,
    /// Crossing beams, each notched halfway.
    XHalfLap,
    /// Main beam ends in a dovetail tenon.
    TDovetail,
    /// Step joint (Stirnversatz).
    TStirnversatz,
}

impl fmt::Display for JointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JointKind::TButt => "TButtJoint",
            JointKind::LButt => "LButtJoint",
            JointKind::LMiter => "LMiterJoint",
            JointKind::XHalfLap => "XHalfLapJoint",
            JointKind::TDovetail => "TDovetailJoint",
            JointKind::TStirnversatz => "TStirnversatzJoint",
        };
        f.write_str(name)
    }
}

/// The part a beam plays in a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointRole {
    /// The beam that ends at the joint (T and L joints).
    Main,
    /// The beam the main beam meets.
    Cross,
    /// First beam of a symmetric joint.
    BeamA,
    /// Second beam of a symmetric joint.
    BeamB,
}

impl fmt::Display for JointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JointRole::Main => "main",
            JointRole::Cross => "cross",
            JointRole::BeamA => "beam_a",
            JointRole::BeamB => "beam_b",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Cuts
// =============================================================================

/// What a joint asks of one of its beams.
#[derive(Debug, Clone, PartialEq)]
pub enum Cut {
    /// The role needs no machining.
    None,
    /// A straight trim along one plane.
    Plane(Frame),
    /// A notch bounded by two planes (birdsmouth).
    DoublePlane([Frame; 2]),
    /// A pocket milled into one face.
    Lap(LapCut),
    /// A tenon shaped at the beam end.
    Tenon(TenonCut),
}

impl Cut {
    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Cut::None => "no cut",
            Cut::Plane(_) => "plane cut",
            Cut::DoublePlane(_) => "double plane cut",
            Cut::Lap(_) => "lap",
            Cut::Tenon(_) => "tenon",
        }
    }
}

/// A lap pocket on one face of a beam.
#[derive(Debug, Clone, PartialEq)]
pub struct LapCut {
    /// The milled face, outward normal.
    pub face: Frame,
    /// Pocket depth below the face.
    pub depth: f64,
    /// Pocket outline on the face plane (any order).
    pub corners: [Point3; 4],
    /// A side wall of the partner beam, used to measure pocket angles.
    pub wall: Frame,
}

/// A tenon at the end of a beam.
#[derive(Debug, Clone, PartialEq)]
pub struct TenonCut {
    /// Shoulder plane, normal into the waste.
    pub plane: Frame,
    /// Tenon shape parameters as configured on the joint.
    pub options: DovetailOptions,
}

// =============================================================================
// Joint
// =============================================================================

/// Behavior shared by every joint variant.
pub trait JointGeometry {
    /// Topology tag.
    fn kind(&self) -> JointKind;

    /// Beam indices with their roles, in joint order.
    fn members(&self) -> Vec<(JointRole, usize)>;

    /// Check variant parameters; geometry is not consulted.
    fn validate_parameters(&self) -> Result<()> {
        Ok(())
    }

    /// The cut for one role.
    fn cut(&self, role: JointRole, beams: &[Beam], tol: &Tolerance) -> Result<Cut>;

    /// Blank extensions the joint needs, as `(beam, start, end)`.
    fn blank_extensions(&self, beams: &[Beam], tol: &Tolerance) -> Result<Vec<(usize, f64, f64)>>;
}

/// A joint between beams of an assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Joint {
    /// T butt joint.
    TButt(TButtJoint),
    /// L butt joint.
    LButt(LButtJoint),
    /// L miter joint.
    LMiter(LMiterJoint),
    /// X half lap.
    XHalfLap(XHalfLapJoint),
    /// T dovetail.
    TDovetail(TDovetailJoint),
    /// T step joint.
    TStirnversatz(TStirnversatzJoint),
}

impl Joint {
    fn geometry(&self) -> &dyn JointGeometry {
        match self {
            Joint::TButt(j) => j,
            Joint::LButt(j) => j,
            Joint::LMiter(j) => j,
            Joint::XHalfLap(j) => j,
            Joint::TDovetail(j) => j,
            Joint::TStirnversatz(j) => j,
        }
    }

    /// Topology tag.
    pub fn kind(&self) -> JointKind {
        self.geometry().kind()
    }

    /// Beam indices with their roles, in joint order.
    pub fn members(&self) -> Vec<(JointRole, usize)> {
        self.geometry().members()
    }

    /// Indices of all participating beams.
    pub fn beam_indices(&self) -> Vec<usize> {
        self.members().into_iter().map(|(_, beam)| beam).collect()
    }

    /// Role played by `beam`, if it takes part in this joint.
    pub fn role_of(&self, beam: usize) -> Option<JointRole> {
        self.members()
            .into_iter()
            .find_map(|(role, index)| (index == beam).then_some(role))
    }

    /// Check that every referenced beam exists, no beam appears twice, and
    /// the variant parameters are in range.
    pub fn validate(&self, beam_count: usize) -> Result<()> {
        let members = self.members();
        for (i, (role, index)) in members.iter().enumerate() {
            if *index >= beam_count {
                return Err(JointError::InvalidJointTopology(format!(
                    "{} {role} references beam {index}, but the assembly has {beam_count} beams",
                    self.kind()
                )));
            }
            if members[..i].iter().any(|(_, other)| other == index) {
                return Err(JointError::InvalidJointTopology(format!(
                    "{} uses beam {index} for more than one role",
                    self.kind()
                )));
            }
        }
        self.geometry().validate_parameters()
    }

    /// The cut this joint implies for `role`.
    ///
    /// Pure: repeated calls with the same beams return the same cut.
    pub fn cut(&self, role: JointRole, beams: &[Beam], tol: &Tolerance) -> Result<Cut> {
        self.validate(beams.len())?;
        if !self.members().iter().any(|(r, _)| *r == role) {
            return Err(JointError::InvalidJointTopology(format!(
                "{} has no {role} role",
                self.kind()
            )));
        }
        self.geometry().cut(role, beams, tol)
    }

    /// Blank extensions the joint needs, as `(beam, start, end)`.
    pub fn blank_extensions(&self, beams: &[Beam], tol: &Tolerance) -> Result<Vec<(usize, f64, f64)>> {
        self.validate(beams.len())?;
        self.geometry().blank_extensions(beams, tol)
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(impl From<$ty> for Joint {
            fn from(joint: $ty) -> Self {
                Joint::$variant(joint)
            }
        })*
    };
}

impl_from_variant!(
    TButt(TButtJoint),
    LButt(LButtJoint),
    LMiter(LMiterJoint),
    XHalfLap(XHalfLapJoint),
    TDovetail(TDovetailJoint),
    TStirnversatz(TStirnversatzJoint),
);

// =============================================================================
// Shared helpers
// =============================================================================

/// Look up a member beam; indices are checked by [`Joint::validate`].
pub(crate) fn member(beams: &[Beam], index: usize) -> Result<&Beam> {
    beams
        .get(index)
        .ok_or_else(|| JointError::InvalidJointTopology(format!("beam {index} does not exist")))
}

/// Where the four long edges of `beam` pierce the plane of `face`.
pub(crate) fn edge_footprint(beam: &Beam, face: &Frame, tol: &Tolerance) -> Result<[Point3; 4]> {
    let plane = Plane::from_frame(face);
    let edges = beam.long_edges();
    let mut corners = [Point3::origin(); 4];
    for (corner, edge) in corners.iter_mut().zip(edges.iter()) {
        *corner = intersection_line_plane(edge, &plane, tol)?.0;
    }
    Ok(corners)
}

/// Start/end extension pair for the end of `beam` nearest `plane`, clamped
/// at zero.
pub(crate) fn extension_for(beam: &Beam, index: usize, plane: &Frame, tol: &Tolerance) -> Result<(usize, f64, f64)> {
    let (start, end) = beam.extension_to_plane(plane, tol)?;
    Ok((index, start.max(0.0), end.max(0.0)))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Cross beam along world X through the origin, 0.1 x 0.1.
    pub fn cross_along_x() -> Beam {
        Beam::from_endpoints(Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 0.1, 0.1, None).unwrap()
    }

    /// Main beam along world Y starting on the cross centerline.
    pub fn main_along_y() -> Beam {
        Beam::from_endpoints(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0), 0.1, 0.1, None).unwrap()
    }

    /// Two beams meeting at a right-angle corner at the origin.
    pub fn corner_pair() -> Vec<Beam> {
        vec![
            Beam::from_endpoints(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 0.1, 0.1, None).unwrap(),
            Beam::from_endpoints(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0), 0.1, 0.1, None).unwrap(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_missing_beam() {
        let joint = Joint::from(TButtJoint::new(0, 5));
        assert!(matches!(joint.validate(2), Err(JointError::InvalidJointTopology(_))));
    }

    #[test]
    fn test_validate_rejects_repeated_beam() {
        let joint = Joint::from(LButtJoint::new(1, 1));
        let err = joint.validate(2).unwrap_err();
        assert!(err.to_string().contains("more than one role"));
    }

    #[test]
    fn test_undefined_role_is_topology_error() {
        let beams = vec![fixtures::main_along_y(), fixtures::cross_along_x()];
        let joint = Joint::from(TButtJoint::new(0, 1));
        let err = joint.cut(JointRole::BeamA, &beams, &Tolerance::DEFAULT).unwrap_err();
        assert!(matches!(err, JointError::InvalidJointTopology(_)));
    }

    #[test]
    fn test_roles_and_kind() {
        let joint = Joint::from(LMiterJoint::new(3, 7));
        assert_eq!(joint.kind(), JointKind::LMiter);
        assert_eq!(joint.role_of(7), Some(JointRole::BeamB));
        assert_eq!(joint.role_of(2), None);
        assert_eq!(joint.beam_indices(), vec![3, 7]);
    }

    #[test]
    fn test_joint_json_is_tagged() {
        let joint = Joint::from(TButtJoint::new(0, 1).with_mill_depth(0.02));
        let json = serde_json::to_value(&joint).unwrap();
        assert_eq!(json["type"], "TButt");
        assert_eq!(json["main"], 0);
        let back: Joint = serde_json::from_value(json).unwrap();
        assert_eq!(back, joint);
    }
}
