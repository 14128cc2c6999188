//! Which face of one beam looks at another beam.

use joinery_geom::{intersection_line_line, Frame};
use joinery_math::{angle_between, Point3, Tolerance, Vec3};

use crate::beam::{Beam, BeamEnd};
use crate::{JointError, Result};

/// Where the centerline of `beam` meets the centerline of `other`.
#[derive(Debug, Clone)]
pub struct Incidence {
    /// Closest point on the centerline of `beam`.
    pub point: Point3,
    /// Beam end nearest that point.
    pub end: BeamEnd,
    /// Unit vector pointing from the joint into the body of `beam`.
    pub body_direction: Vec3,
}

/// Locate the joint end of `beam` relative to `other`.
pub fn incidence(beam: &Beam, other: &Beam, tol: &Tolerance) -> Result<Incidence> {
    let ((point, _), _) = intersection_line_line(&beam.centerline(), &other.centerline(), tol)?;
    let (end, _) = beam.endpoint_closest_to_point(&point);
    let x = beam.frame.x_axis();
    let body_direction = match end {
        BeamEnd::Start => x,
        BeamEnd::End => -x,
    };
    Ok(Incidence {
        point,
        end,
        body_direction,
    })
}

/// Angle between each face normal of `other` and the body direction of
/// `beam` at the joint, as `(face_index, radians)`.
///
/// With `ignore_ends` only the four long faces are ranked. The result is
/// sorted by ascending angle; ties keep face order.
pub fn beam_side_incidence(beam: &Beam, other: &Beam, ignore_ends: bool, tol: &Tolerance) -> Result<Vec<(usize, f64)>> {
    let inc = incidence(beam, other, tol)?;
    let faces = other.faces();
    let count = if ignore_ends { 4 } else { 6 };
    let mut ranked = Vec::with_capacity(count);
    for (index, face) in faces.iter().take(count).enumerate() {
        let angle = angle_between(&face.normal(), &inc.body_direction)
            .ok_or_else(|| JointError::GeometryDegenerate("zero-length beam direction".into()))?;
        ranked.push((index, angle));
    }
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    Ok(ranked)
}

/// Face of `other` that `beam` runs into: the one whose outward normal
/// points most nearly along the body of `beam`.
pub fn nearest_face(beam: &Beam, other: &Beam, tol: &Tolerance) -> Result<(usize, Frame)> {
    let ranked = beam_side_incidence(beam, other, true, tol)?;
    let (index, angle) = ranked[0];
    if angle >= std::f64::consts::FRAC_PI_2 - tol.angular {
        return Err(JointError::GeometryDegenerate(
            "no face of the partner beam faces the joint end".into(),
        ));
    }
    Ok((index, other.faces()[index].clone()))
}

/// Face of `other` on the far side from `beam`.
pub fn farthest_face(beam: &Beam, other: &Beam, tol: &Tolerance) -> Result<(usize, Frame)> {
    let ranked = beam_side_incidence(beam, other, true, tol)?;
    let (index, angle) = ranked[ranked.len() - 1];
    if angle <= std::f64::consts::FRAC_PI_2 + tol.angular {
        return Err(JointError::GeometryDegenerate(
            "no face of the partner beam faces away from the joint end".into(),
        ));
    }
    Ok((index, other.faces()[index].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn t_pair() -> (Beam, Beam) {
        let main = Beam::from_endpoints(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0), 0.1, 0.1, None).unwrap();
        let cross = Beam::from_endpoints(Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 0.1, 0.1, None).unwrap();
        (main, cross)
    }

    #[test]
    fn test_incidence_at_start() {
        let (main, cross) = t_pair();
        let inc = incidence(&main, &cross, &Tolerance::DEFAULT).unwrap();
        assert_eq!(inc.end, BeamEnd::Start);
        assert_relative_eq!(inc.body_direction, Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_side_incidence_ranks_faces() {
        let (main, cross) = t_pair();
        let ranked = beam_side_incidence(&main, &cross, true, &Tolerance::DEFAULT).unwrap();
        assert_eq!(ranked.len(), 4);
        // face 0 of the cross beam is +y, the side the main beam stands on
        assert_eq!(ranked[0].0, 0);
        assert_relative_eq!(ranked[0].1, 0.0, epsilon = 1e-12);
        assert_relative_eq!(ranked[1].1, FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(ranked[3].0, 2);
        assert_relative_eq!(ranked[3].1, PI, epsilon = 1e-12);
    }

    #[test]
    fn test_nearest_and_farthest() {
        let (main, cross) = t_pair();
        let (near, frame) = nearest_face(&main, &cross, &Tolerance::DEFAULT).unwrap();
        assert_eq!(near, 0);
        assert_relative_eq!(frame.origin.y, 0.05, epsilon = 1e-12);
        let (far, _) = farthest_face(&main, &cross, &Tolerance::DEFAULT).unwrap();
        assert_eq!(far, 2);
    }

    #[test]
    fn test_parallel_beams_are_degenerate() {
        let a = Beam::from_endpoints(Point3::origin(), Point3::new(1.0, 0.0, 0.0), 0.1, 0.1, None).unwrap();
        let b = Beam::from_endpoints(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0), 0.1, 0.1, None).unwrap();
        assert!(matches!(
            incidence(&a, &b, &Tolerance::DEFAULT),
            Err(JointError::GeometryDegenerate(_))
        ));
    }
}
