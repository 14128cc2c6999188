use joinery_math::Tolerance;
use joinery_model::TenonCut;

use super::{JackRafterCut, Orientation};
use crate::params::{Field, FieldValue, ParameterBundle};
use crate::reference::ReferenceSides;
use crate::{BtlxError, Result};

const SHAPES: [&str; 5] = ["automatic", "square", "round", "rounded", "radius"];

/// A dovetail tenon at one end of the blank.
#[derive(Debug, Clone, PartialEq)]
pub struct DovetailTenon {
    /// End of the blank carrying the tenon.
    pub orientation: Orientation,
    /// Shoulder position along the reference side.
    pub start_x: f64,
    /// Tenon axis across the reference side.
    pub start_y: f64,
    /// Depth of the tenon start below the reference side.
    pub start_depth: f64,
    /// Shoulder direction on the reference side, degrees.
    pub angle: f64,
    /// Shoulder slope, degrees.
    pub inclination: f64,
    /// Rotation about the beam axis, degrees.
    pub rotation: f64,
    /// Tenon stops short of the top.
    pub length_limited_top: bool,
    /// Tenon stops short of the bottom.
    pub length_limited_bottom: bool,
    /// Tenon length.
    pub length: f64,
    /// Tenon width.
    pub width: f64,
    /// Tenon height.
    pub height: f64,
    /// Taper angle, degrees.
    pub cone_angle: f64,
    /// Whether the flank angle applies.
    pub use_flank_angle: bool,
    /// Flank angle, degrees.
    pub flank_angle: f64,
    /// Outline shape.
    pub shape: String,
    /// Corner radius.
    pub shape_radius: f64,
}

impl DovetailTenon {
    /// Element name.
    pub const PROCESS_TYPE: &'static str = "DovetailTenon";

    /// Measure the tenon shoulder on the part and merge the configured
    /// tenon options. Options left unset stay absent from the bundle.
    pub fn bundle(cut: &TenonCut, refs: &ReferenceSides, tol: &Tolerance) -> Result<(usize, ParameterBundle)> {
        let shoulder = JackRafterCut::derive(&cut.plane, refs, tol)?;
        let side = JackRafterCut::REFERENCE_SIDE;
        let opts = &cut.options;

        let mut bundle = ParameterBundle::new();
        bundle
            .insert("Orientation", shoulder.orientation.as_str())
            .insert("StartX", shoulder.start_x)
            .insert("StartY", refs.side_width(side) / 2.0)
            .insert("Angle", shoulder.angle)
            .insert("Inclination", shoulder.inclination)
            .insert_opt("StartDepth", opts.start_depth)
            .insert_opt("Rotation", opts.rotation)
            .insert_opt("LengthLimitedTop", opts.length_limited_top)
            .insert_opt("LengthLimitedBottom", opts.length_limited_bottom)
            .insert_opt("Length", opts.length)
            .insert_opt("Width", opts.width)
            .insert_opt("Height", opts.height)
            .insert_opt("ConeAngle", opts.cone_angle)
            .insert_opt("UseFlankAngle", opts.use_flank_angle)
            .insert_opt("FlankAngle", opts.flank_angle)
            .insert_opt("Shape", opts.shape.map(|s| s.to_string()))
            .insert_opt("ShapeRadius", opts.shape_radius);
        Ok((side, bundle))
    }

    /// Build from a bundle; every schema field is required.
    pub fn from_bundle(bundle: &ParameterBundle) -> Result<Self> {
        let p = Self::PROCESS_TYPE;
        let tenon = Self {
            orientation: bundle.text(p, "Orientation")?.parse()?,
            start_x: bundle.number(p, "StartX")?,
            start_y: bundle.number(p, "StartY")?,
            start_depth: bundle.number(p, "StartDepth")?,
            angle: bundle.number(p, "Angle")?,
            inclination: bundle.number(p, "Inclination")?,
            rotation: bundle.number(p, "Rotation")?,
            length_limited_top: bundle.flag(p, "LengthLimitedTop")?,
            length_limited_bottom: bundle.flag(p, "LengthLimitedBottom")?,
            length: bundle.number(p, "Length")?,
            width: bundle.number(p, "Width")?,
            height: bundle.number(p, "Height")?,
            cone_angle: bundle.number(p, "ConeAngle")?,
            use_flank_angle: bundle.flag(p, "UseFlankAngle")?,
            flank_angle: bundle.number(p, "FlankAngle")?,
            shape: bundle.text(p, "Shape")?,
            shape_radius: bundle.number(p, "ShapeRadius")?,
        };
        if !SHAPES.contains(&tenon.shape.as_str()) {
            return Err(BtlxError::InvalidParameter(format!(
                "DovetailTenon shape must be one of {SHAPES:?}, got {:?}",
                tenon.shape
            )));
        }
        Ok(tenon)
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
            ("Rotation", FieldValue::Angle(self.rotation)),
            ("LengthLimitedTop", FieldValue::Flag(self.length_limited_top)),
            ("LengthLimitedBottom", FieldValue::Flag(self.length_limited_bottom)),
            ("Length", FieldValue::Length(self.length)),
            ("Width", FieldValue::Length(self.width)),
            ("Height", FieldValue::Length(self.height)),
            ("ConeAngle", FieldValue::Angle(self.cone_angle)),
            ("UseFlankAngle", FieldValue::Flag(self.use_flank_angle)),
            ("FlankAngle", FieldValue::Angle(self.flank_angle)),
            ("Shape", FieldValue::Text(self.shape.clone())),
            ("ShapeRadius", FieldValue::Length(self.shape_radius)),
        ]
    }
}
