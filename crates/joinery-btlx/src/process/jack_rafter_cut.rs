use joinery_geom::{intersection_line_plane, Frame, Line, Plane};
use joinery_math::{signed_angle_between, Tolerance};
use tracing::debug;

use super::Orientation;
use crate::params::{Field, FieldValue};
use crate::reference::ReferenceSides;
use crate::{BtlxError, Result};

/// A straight cut across the full section near one end of the blank.
#[derive(Debug, Clone, PartialEq)]
pub struct JackRafterCut {
    /// End of the blank the cut trims.
    pub orientation: Orientation,
    /// Where the cut meets the reference edge.
    pub start_x: f64,
    /// Offset across the reference side.
    pub start_y: f64,
    /// Depth below the reference side.
    pub start_depth: f64,
    /// Cut direction on the reference side, degrees.
    pub angle: f64,
    /// Cut slope against the reference side, degrees.
    pub inclination: f64,
}

impl JackRafterCut {
    /// Element name.
    pub const PROCESS_TYPE: &'static str = "JackRafterCut";

    /// Reference side the cut is measured on.
    pub const REFERENCE_SIDE: usize = 0;

    /// Derive the cut from a cutting plane (normal into the waste).
    pub fn derive(plane: &Frame, refs: &ReferenceSides, tol: &Tolerance) -> Result<Self> {
        let side = refs.side(Self::REFERENCE_SIDE);
        let edge = Line::from_point_and_vector(side.origin, side.x_axis());
        let (_, t) = intersection_line_plane(&edge, &Plane::from_frame(plane), tol)?;
        let start_x = t * edge.length();

        let direction = side.normal().cross(&plane.normal());
        let angle = signed_angle_between(&side.x_axis(), &direction, &side.normal())
            .ok_or_else(|| BtlxError::GeometryDegenerate("cutting plane is parallel to the reference side".into()))?;
        let inclination = signed_angle_between(&side.normal(), &plane.normal(), &direction)
            .ok_or_else(|| BtlxError::GeometryDegenerate("cutting plane normal has zero length".into()))?;

        let cut = Self {
            orientation: Orientation::from_start_x(start_x, refs.blank_length),
            start_x,
            start_y: 0.0,
            start_depth: 0.0,
            angle: fold_to_square(angle.to_degrees()),
            inclination: fold_to_square(inclination.to_degrees()),
        };
        debug!(start_x = cut.start_x, angle = cut.angle, inclination = cut.inclination, "jack rafter cut");
        Ok(cut)
    }

    /// Schema fields in declared order.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            ("Orientation", FieldValue::Text(self.orientation.to_string())),
            ("StartX", FieldValue::Length(self.start_x)),
            ("StartY", FieldValue::Length(self.start_y)),
            ("StartDepth", FieldValue::Length(self.start_depth)),
            ("Angle", FieldValue::Angle(self.angle)),
            ("Inclination", FieldValue::Angle(self.inclination)),
        ]
    }
}

/// Fold a signed angle in degrees to its deviation measured from the
/// opposite ray: `90 - (|a| - 90)`.
pub(crate) fn fold_to_square(degrees: f64) -> f64 {
    90.0 - (degrees.abs() - 90.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use joinery_math::{Point3, Vec3};
    use joinery_model::Beam;

    const TOL: Tolerance = Tolerance::DEFAULT;

    fn refs_along_y() -> ReferenceSides {
        let beam = Beam::from_endpoints(Point3::origin(), Point3::new(0.0, 1.0, 0.0), 0.1, 0.1, None).unwrap();
        ReferenceSides::from_beam(&beam).unwrap()
    }

    #[test]
    fn test_square_cut() {
        let refs = refs_along_y();
        let plane = Frame::new(Point3::new(0.0, 0.05, 0.0), Vec3::x(), Vec3::z()).unwrap();
        assert_relative_eq!(plane.normal(), -Vec3::y(), epsilon = 1e-12);
        let cut = JackRafterCut::derive(&plane, &refs, &TOL).unwrap();
        assert_eq!(cut.orientation, Orientation::Start);
        assert_relative_eq!(cut.start_x, 0.05, epsilon = 1e-12);
        assert_relative_eq!(cut.angle, 90.0, epsilon = 1e-9);
        assert_relative_eq!(cut.inclination, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cut_near_end() {
        let refs = refs_along_y();
        let plane = Frame::new(Point3::new(0.0, 0.9, 0.0), Vec3::x(), Vec3::z()).unwrap();
        let cut = JackRafterCut::derive(&plane, &refs, &TOL).unwrap();
        assert_eq!(cut.orientation, Orientation::End);
        assert_relative_eq!(cut.start_x, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_plane_along_the_beam_is_degenerate() {
        let refs = refs_along_y();
        let plane = Frame::new(Point3::origin(), Vec3::y(), Vec3::z()).unwrap();
        assert!(matches!(
            JackRafterCut::derive(&plane, &refs, &TOL),
            Err(BtlxError::GeometryDegenerate(_))
        ));
    }

    #[test]
    fn test_fold() {
        assert_relative_eq!(fold_to_square(90.0), 90.0);
        assert_relative_eq!(fold_to_square(-45.0), 135.0);
        assert_relative_eq!(fold_to_square(135.0), 45.0);
        assert_relative_eq!(fold_to_square(180.0), 0.0);
    }

    #[test]
    fn test_fields_order() {
        let refs = refs_along_y();
        let plane = Frame::new(Point3::new(0.0, 0.05, 0.0), Vec3::x(), Vec3::z()).unwrap();
        let names: Vec<_> = JackRafterCut::derive(&plane, &refs, &TOL)
            .unwrap()
            .fields()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["Orientation", "StartX", "StartY", "StartDepth", "Angle", "Inclination"]);
    }
}
