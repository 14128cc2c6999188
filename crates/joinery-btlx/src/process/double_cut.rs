use joinery_geom::{intersection_plane_plane, intersection_plane_plane_plane, Frame, Plane};
use joinery_math::{angle_between, Tolerance, Vec3};
use tracing::debug;

use super::Orientation;
use crate::params::{Field, FieldValue, ParameterBundle};
use crate::reference::ReferenceSides;
use crate::{BtlxError, Result};

/// Two intersecting plane cuts forming a notch, such as a birdsmouth.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleCut {
    /// End of the blank the notch is measured from.
    pub orientation: Orientation,
    /// Notch apex along the reference side.
    pub start_x: f64,
    /// Notch apex across the reference side.
    pub start_y: f64,
    /// Direction of the first cut on the reference side, degrees.
    pub angle_1: f64,
    /// Slope of the first cut, degrees.
    pub inclination_1: f64,
    /// Direction of the second cut on the reference side, degrees.
    pub angle_2: f64,
    /// Slope of the second cut, degrees.
    pub inclination_2: f64,
}

impl DoubleCut {
    /// Element name.
    pub const PROCESS_TYPE: &'static str = "DoubleCut";

    /// Measure a notch bounded by `planes` on the part.
    ///
    /// The reference side is the one whose normal is closest to the
    /// direction of the notch ridge. Returns it with the filled bundle.
    pub fn bundle(planes: &[Frame; 2], refs: &ReferenceSides, tol: &Tolerance) -> Result<(usize, ParameterBundle)> {
        let plane_1 = Plane::from_frame(&planes[0]);
        let plane_2 = Plane::from_frame(&planes[1]);
        let ridge = intersection_plane_plane(&plane_2, &plane_1, tol)?;
        let side_index = refs.closest_side(&ridge.vector(), 0..6)?;
        let side = refs.side(side_index);
        let side_plane = Plane::from_frame(side);

        let apex = intersection_plane_plane_plane(&plane_1, &plane_2, &side_plane, tol)?;
        let local = side.to_local(&apex);

        let trace_1 = intersection_plane_plane(&plane_1, &side_plane, tol)?.vector();
        let trace_2 = intersection_plane_plane(&plane_2, &side_plane, tol)?.vector();
        let degrees = |a: &Vec3, b: &Vec3| {
            angle_between(a, b)
                .map(f64::to_degrees)
                .ok_or_else(|| BtlxError::GeometryDegenerate("zero-length direction".into()))
        };

        let mut bundle = ParameterBundle::new();
        bundle
            .insert("Orientation", Orientation::from_start_x(local.x, refs.blank_length).as_str())
            .insert("StartX", local.x)
            .insert("StartY", local.y)
            .insert("Angle1", degrees(&trace_2, &side.x_axis())?)
            .insert("Inclination1", degrees(&planes[0].normal(), &side.normal())?)
            .insert("Angle2", degrees(&trace_1, &side.x_axis())?)
            .insert("Inclination2", degrees(&planes[1].normal(), &side.normal())?);
        debug!(side = side_index, start_x = local.x, start_y = local.y, "double cut");
        Ok((side_index, bundle))
    }

    /// Build from a bundle; every schema field is required.
    pub fn from_bundle(bundle: &ParameterBundle) -> Result<Self> {
        let p = Self::PROCESS_TYPE;
        Ok(Self {
            orientation: bundle.text(p, "Orientation")?.parse()?,
            start_x: bundle.number(p, "StartX")?,
            start_y: bundle.number(p, "StartY")?,
            angle_1: bundle.number(p, "Angle1")?,
            inclination_1: bundle.number(p, "Inclination1")?,
            angle_2: bundle.number(p, "Angle2")?,
            inclination_2: bundle.number(p, "Inclination2")?,
        })
    }

    /// Schema fields in declared order.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            ("Orientation", FieldValue::Text(self.orientation.to_string())),
            ("StartX", FieldValue::Length(self.start_x)),
            ("StartY", FieldValue::Length(self.start_y)),
            ("Angle1", FieldValue::Angle(self.angle_1)),
            ("Inclination1", FieldValue::Angle(self.inclination_1)),
            ("Angle2", FieldValue::Angle(self.angle_2)),
            ("Inclination2", FieldValue::Angle(self.inclination_2)),
        ]
    }
}
