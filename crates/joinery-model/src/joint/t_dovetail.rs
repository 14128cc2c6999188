use std::fmt;

use joinery_geom::Frame;
use joinery_math::Tolerance;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{extension_for, member, nearest_face, Cut, JointGeometry, JointKind, JointRole, TenonCut};
use crate::beam::Beam;
use crate::{JointError, Result};

/// Outline of a dovetail tenon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DovetailShape {
    /// Machine chooses.
    Automatic,
    /// Sharp corners.
    Square,
    /// Fully rounded end.
    Round,
    /// Rounded corners.
    Rounded,
    /// Corners rounded with `shape_radius`.
    Radius,
}

impl fmt::Display for DovetailShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DovetailShape::Automatic => "automatic",
            DovetailShape::Square => "square",
            DovetailShape::Round => "round",
            DovetailShape::Rounded => "rounded",
            DovetailShape::Radius => "radius",
        };
        f.write_str(name)
    }
}

/// Tenon parameters. Every field must be set before a tenon process can be
/// emitted; unset fields are reported, never defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DovetailOptions {
    /// Depth of the tenon start below the reference side.
    pub start_depth: Option<f64>,
    /// Rotation about the beam axis, degrees.
    pub rotation: Option<f64>,
    /// Whether the tenon stops short of the top face.
    pub length_limited_top: Option<bool>,
    /// Whether the tenon stops short of the bottom face.
    pub length_limited_bottom: Option<bool>,
    /// Tenon length beyond the shoulder.
    pub length: Option<f64>,
    /// Tenon width at the shoulder.
    pub width: Option<f64>,
    /// Tenon height.
    pub height: Option<f64>,
    /// Taper angle, degrees.
    pub cone_angle: Option<f64>,
    /// Whether `flank_angle` is applied.
    pub use_flank_angle: Option<bool>,
    /// Dovetail flank angle, degrees.
    pub flank_angle: Option<f64>,
    /// Tenon outline.
    pub shape: Option<DovetailShape>,
    /// Corner radius for [`DovetailShape::Radius`].
    pub shape_radius: Option<f64>,
}

impl DovetailOptions {
    /// A full-height square-shouldered tenon with a 15 degree flank.
    pub fn standard(length: f64, width: f64, height: f64) -> Self {
        Self {
            start_depth: Some(0.0),
            rotation: Some(0.0),
            length_limited_top: Some(true),
            length_limited_bottom: Some(true),
            length: Some(length),
            width: Some(width),
            height: Some(height),
            cone_angle: Some(0.0),
            use_flank_angle: Some(true),
            flank_angle: Some(15.0),
            shape: Some(DovetailShape::Automatic),
            shape_radius: Some(0.0),
        }
    }
}

/// T dovetail: the main beam ends in a dovetail tenon that slides into a
/// mortise in the cross beam. Only the tenon is machined; the mortise
/// geometry is not derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TDovetailJoint {
    /// Index of the beam carrying the tenon.
    pub main: usize,
    /// Index of the beam receiving it.
    pub cross: usize,
    /// Tenon parameters.
    #[serde(default)]
    pub options: DovetailOptions,
}

impl TDovetailJoint {
    /// Dovetail with the given tenon options.
    pub fn new(main: usize, cross: usize, options: DovetailOptions) -> Self {
        Self { main, cross, options }
    }

    /// Shoulder plane of the tenon, normal into the waste.
    pub fn shoulder_plane(&self, main: &Beam, cross: &Beam, tol: &Tolerance) -> Result<Frame> {
        let (_, face) = nearest_face(main, cross, tol)?;
        Ok(face.flipped())
    }
}

impl JointGeometry for TDovetailJoint {
    fn kind(&self) -> JointKind {
        JointKind::TDovetail
    }

    fn members(&self) -> Vec<(JointRole, usize)> {
        vec![(JointRole::Main, self.main), (JointRole::Cross, self.cross)]
    }

    fn cut(&self, role: JointRole, beams: &[Beam], tol: &Tolerance) -> Result<Cut> {
        let main = member(beams, self.main)?;
        let cross = member(beams, self.cross)?;
        match role {
            JointRole::Main => Ok(Cut::Tenon(TenonCut {
                plane: self.shoulder_plane(main, cross, tol)?,
                options: self.options.clone(),
            })),
            JointRole::Cross => Ok(Cut::None),
            JointRole::BeamA | JointRole::BeamB => Err(JointError::InvalidJointTopology(format!(
                "{} has no {role} role",
                self.kind()
            ))),
        }
    }

    /// The main blank runs past the shoulder by the tenon length. Without a
    /// length there is no tenon to cover, so no extension is requested.
    fn blank_extensions(&self, beams: &[Beam], tol: &Tolerance) -> Result<Vec<(usize, f64, f64)>> {
        let Some(length) = self.options.length else {
            warn!(main = self.main, "dovetail tenon length unset, blank not extended");
            return Ok(Vec::new());
        };
        let main = member(beams, self.main)?;
        let cross = member(beams, self.cross)?;
        let shoulder = self.shoulder_plane(main, cross, tol)?;
        let tip = shoulder.translated(&(shoulder.normal() * length));
        Ok(vec![extension_for(main, self.main, &tip, tol)?])
    }
}
