//! Intersection primitives.
//!
//! Every query fails with [`GeomError::Parallel`] when its inputs are
//! parallel within the angular tolerance instead of returning a fallback.

use joinery_math::{Point3, Tolerance, Vec3};

use crate::{GeomError, Line, Plane, Result};

/// Intersect a line with a plane.
///
/// Returns the intersection point and its parameter `t` along the line
/// (`point = start + t * (end - start)`), unbounded.
pub fn intersection_line_plane(line: &Line, plane: &Plane, tol: &Tolerance) -> Result<(Point3, f64)> {
    let v = line.vector();
    let len = v.norm();
    if len < f64::EPSILON {
        return Err(GeomError::Degenerate("line has zero length"));
    }
    let denom = plane.normal.as_ref().dot(&v);
    if denom.abs() < tol.angular * len {
        return Err(GeomError::Parallel("line and plane"));
    }
    let t = plane.normal.as_ref().dot(&(plane.point - line.start)) / denom;
    Ok((line.point_at(t), t))
}

/// Intersect two planes.
///
/// The resulting line runs along `a.normal × b.normal` with unit length.
pub fn intersection_plane_plane(a: &Plane, b: &Plane, tol: &Tolerance) -> Result<Line> {
    let na = a.normal.as_ref();
    let nb = b.normal.as_ref();
    let dir = na.cross(nb);
    let dir_sq = dir.norm_squared();
    if dir_sq.sqrt() < tol.angular {
        return Err(GeomError::Parallel("planes"));
    }
    let point = (nb.cross(&dir) * a.offset() + dir.cross(na) * b.offset()) / dir_sq;
    let point = Point3::from(point);
    Ok(Line::from_point_and_vector(point, dir / dir_sq.sqrt()))
}

/// Intersect three planes in a single point.
pub fn intersection_plane_plane_plane(a: &Plane, b: &Plane, c: &Plane, tol: &Tolerance) -> Result<Point3> {
    let (na, nb, nc) = (a.normal.as_ref(), b.normal.as_ref(), c.normal.as_ref());
    let det = na.dot(&nb.cross(nc));
    if det.abs() < tol.angular {
        return Err(GeomError::Parallel("three planes"));
    }
    let p: Vec3 = (nb.cross(nc) * a.offset() + nc.cross(na) * b.offset() + na.cross(nb) * c.offset()) / det;
    Ok(Point3::from(p))
}

/// Closest points between two (unbounded) lines.
///
/// Returns `((point_on_a, t_a), (point_on_b, t_b))`. For intersecting lines
/// both points coincide.
pub fn intersection_line_line(
    a: &Line,
    b: &Line,
    tol: &Tolerance,
) -> Result<((Point3, f64), (Point3, f64))> {
    let d1 = a.vector();
    let d2 = b.vector();
    let aa = d1.norm_squared();
    let ee = d2.norm_squared();
    if aa < f64::EPSILON || ee < f64::EPSILON {
        return Err(GeomError::Degenerate("line has zero length"));
    }
    if tol.is_parallel(&d1, &d2) {
        return Err(GeomError::Parallel("lines"));
    }
    let r = a.start - b.start;
    let bb = d1.dot(&d2);
    let c = d1.dot(&r);
    let f = d2.dot(&r);
    let denom = aa * ee - bb * bb;
    let s = (bb * f - c * ee) / denom;
    let t = (aa * f - bb * c) / denom;
    Ok(((a.point_at(s), s), (b.point_at(t), t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOL: Tolerance = Tolerance::DEFAULT;

    #[test]
    fn test_line_plane_parameter_is_fraction_of_segment() {
        let line = Line::new(Point3::origin(), Point3::new(4.0, 0.0, 0.0));
        let plane = Plane::new(Point3::new(1.0, 5.0, 5.0), Vec3::x()).unwrap();
        let (p, t) = intersection_line_plane(&line, &plane, &TOL).unwrap();
        assert_relative_eq!(p, Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(t, 0.25);
    }

    #[test]
    fn test_line_plane_behind_start() {
        let line = Line::from_point_and_vector(Point3::origin(), Vec3::x());
        let plane = Plane::new(Point3::new(-2.0, 0.0, 0.0), -Vec3::x()).unwrap();
        let (_, t) = intersection_line_plane(&line, &plane, &TOL).unwrap();
        assert_relative_eq!(t, -2.0);
    }

    #[test]
    fn test_line_plane_parallel() {
        let line = Line::from_point_and_vector(Point3::origin(), Vec3::x());
        let plane = Plane::new(Point3::new(0.0, 0.0, 1.0), Vec3::z()).unwrap();
        assert_eq!(
            intersection_line_plane(&line, &plane, &TOL).unwrap_err(),
            GeomError::Parallel("line and plane")
        );
    }

    #[test]
    fn test_plane_plane() {
        let a = Plane::new(Point3::new(0.0, 0.0, 2.0), Vec3::z()).unwrap();
        let b = Plane::new(Point3::new(3.0, 0.0, 0.0), Vec3::x()).unwrap();
        let line = intersection_plane_plane(&a, &b, &TOL).unwrap();
        assert_relative_eq!(line.vector(), Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(a.signed_distance(&line.start), 0.0, epsilon = 1e-12);
        assert_relative_eq!(b.signed_distance(&line.start), 0.0, epsilon = 1e-12);
        assert!(intersection_plane_plane(&a, &a, &TOL).is_err());
    }

    #[test]
    fn test_three_planes() {
        let a = Plane::new(Point3::new(1.0, 0.0, 0.0), Vec3::x()).unwrap();
        let b = Plane::new(Point3::new(0.0, 2.0, 0.0), Vec3::y()).unwrap();
        let c = Plane::new(Point3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 1.0, 1.0)).unwrap();
        let p = intersection_plane_plane_plane(&a, &b, &c, &TOL).unwrap();
        assert_relative_eq!(p, Point3::new(1.0, 2.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_line_line_skew() {
        let a = Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        let b = Line::new(Point3::new(0.5, -1.0, 1.0), Point3::new(0.5, 1.0, 1.0));
        let ((pa, ta), (pb, tb)) = intersection_line_line(&a, &b, &TOL).unwrap();
        assert_relative_eq!(pa, Point3::new(0.5, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(pb, Point3::new(0.5, 0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(ta, 0.5, epsilon = 1e-12);
        assert_relative_eq!(tb, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_line_line_collinear_is_parallel() {
        let a = Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        let b = Line::new(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0));
        assert_eq!(
            intersection_line_line(&a, &b, &TOL).unwrap_err(),
            GeomError::Parallel("lines")
        );
    }
}
