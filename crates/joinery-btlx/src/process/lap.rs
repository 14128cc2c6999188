use joinery_geom::{intersection_plane_plane, Plane};
use joinery_math::{angle_between, Tolerance, Vec3};
use joinery_model::LapCut;
use tracing::debug;

use super::Orientation;
use crate::params::{Field, FieldValue, ParameterBundle};
use crate::reference::ReferenceSides;
use crate::{BtlxError, Result};

/// A rectangular pocket milled into one side of the blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Lap {
    /// End of the blank the pocket is measured from.
    pub orientation: Orientation,
    /// Pocket start along the reference side.
    pub start_x: f64,
    /// Pocket start across the reference side.
    pub start_y: f64,
    /// Pocket depth below the reference side.
    pub start_depth: f64,
    /// Direction of the pocket walls on the reference side, degrees.
    pub angle: f64,
    /// Slope of the pocket walls, degrees.
    pub inclination: f64,
    /// Slope of the pocket floor, degrees.
    pub slope: f64,
    /// Pocket size along the reference side.
    pub length: f64,
    /// Pocket size across the reference side.
    pub width: f64,
}

impl Lap {
    /// Element name.
    pub const PROCESS_TYPE: &'static str = "Lap";

    /// Measure a lap pocket on the part.
    ///
    /// The reference side is the long side facing the same way as the
    /// milled face. The outline is clipped to that side.
    pub fn bundle(cut: &LapCut, refs: &ReferenceSides, tol: &Tolerance) -> Result<(usize, ParameterBundle)> {
        let side_index = refs.closest_side(&cut.face.normal(), 0..4)?;
        let side = refs.side(side_index);
        let side_width = refs.side_width(side_index);

        let local: Vec<_> = cut.corners.iter().map(|c| side.to_local(c)).collect();
        let min_x = local.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = local.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = local.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).clamp(0.0, side_width);
        let max_y = local.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).clamp(0.0, side_width);
        if max_x - min_x < tol.linear || max_y - min_y < tol.linear {
            return Err(BtlxError::GeometryDegenerate("lap outline has no area on the reference side".into()));
        }

        let side_plane = Plane::from_frame(side);
        let wall_trace = intersection_plane_plane(&Plane::from_frame(&cut.wall), &side_plane, tol)?.vector();
        let degrees = |a: &Vec3, b: &Vec3| {
            angle_between(a, b)
                .map(f64::to_degrees)
                .ok_or_else(|| BtlxError::GeometryDegenerate("zero-length direction".into()))
        };

        let mut bundle = ParameterBundle::new();
        bundle
            .insert("Orientation", Orientation::from_start_x(min_x, refs.blank_length).as_str())
            .insert("StartX", min_x)
            .insert("StartY", min_y)
            .insert("StartDepth", cut.depth)
            .insert("Angle", degrees(&wall_trace, &side.x_axis())?)
            .insert("Inclination", degrees(&cut.wall.normal(), &side.normal())?)
            .insert("Slope", 0.0)
            .insert("Length", max_x - min_x)
            .insert("Width", max_y - min_y);
        debug!(side = side_index, start_x = min_x, depth = cut.depth, "lap");
        Ok((side_index, bundle))
    }

    /// Build from a bundle; every schema field is required.
    pub fn from_bundle(bundle: &ParameterBundle) -> Result<Self> {
        let p = Self::PROCESS_TYPE;
        let lap = Self {
            orientation: bundle.text(p, "Orientation")?.parse()?,
            start_x: bundle.number(p, "StartX")?,
            start_y: bundle.number(p, "StartY")?,
            start_depth: bundle.number(p, "StartDepth")?,
            angle: bundle.number(p, "Angle")?,
            inclination: bundle.number(p, "Inclination")?,
            slope: bundle.number(p, "Slope")?,
            length: bundle.number(p, "Length")?,
            width: bundle.number(p, "Width")?,
        };
        if lap.start_depth < 0.0 || lap.length < 0.0 || lap.width < 0.0 {
            return Err(BtlxError::InvalidParameter(
                "Lap depth, length and width must not be negative".into(),
            ));
        }
        Ok(lap)
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
            ("Slope", FieldValue::Angle(self.slope)),
            ("Length", FieldValue::Length(self.length)),
            ("Width", FieldValue::Length(self.width)),
        ]
    }
}
