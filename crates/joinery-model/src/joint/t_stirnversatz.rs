use joinery_math::Tolerance;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::{member, Cut, JointGeometry, JointKind, JointRole};
use crate::beam::Beam;
use crate::{JointError, Result};

/// Valid range for [`TStirnversatzJoint::cut_depth`], exclusive.
pub const CUT_DEPTH_RANGE: (f64, f64) = (0.05, 0.9);

fn default_cut_depth() -> f64 {
    0.25
}

fn in_cut_depth_range(cut_depth: f64) -> bool {
    let (lo, hi) = CUT_DEPTH_RANGE;
    cut_depth > lo && cut_depth < hi
}

/// Out-of-range depths from input files fall back to the default.
fn cut_depth_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    let requested = f64::deserialize(deserializer)?;
    if in_cut_depth_range(requested) {
        Ok(requested)
    } else {
        debug!(requested, "stirnversatz cut_depth outside range, using default");
        Ok(default_cut_depth())
    }
}

/// Step joint (Stirnversatz): a strut seated in a notch of the cross beam.
///
/// The joint is recorded with its parameters but no cut geometry is derived
/// for either beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TStirnversatzJoint {
    /// Index of the strut.
    pub main: usize,
    /// Index of the notched beam.
    pub cross: usize,
    /// Clearance left at the heel.
    #[serde(default)]
    pub gap: f64,
    /// Notch depth as a share of the cross beam height.
    #[serde(default = "default_cut_depth", deserialize_with = "cut_depth_or_default")]
    pub cut_depth: f64,
}

impl TStirnversatzJoint {
    /// Step joint with no gap and a quarter-depth notch.
    pub fn new(main: usize, cross: usize) -> Self {
        Self {
            main,
            cross,
            gap: 0.0,
            cut_depth: default_cut_depth(),
        }
    }

    /// Set the heel clearance.
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Set the notch depth share. A value outside [`CUT_DEPTH_RANGE`] is
    /// ignored and the current depth kept.
    pub fn with_cut_depth(mut self, cut_depth: f64) -> Self {
        if in_cut_depth_range(cut_depth) {
            self.cut_depth = cut_depth;
        } else {
            debug!(requested = cut_depth, kept = self.cut_depth, "stirnversatz cut_depth outside range, ignored");
        }
        self
    }
}

impl JointGeometry for TStirnversatzJoint {
    fn kind(&self) -> JointKind {
        JointKind::TStirnversatz
    }

    fn members(&self) -> Vec<(JointRole, usize)> {
        vec![(JointRole::Main, self.main), (JointRole::Cross, self.cross)]
    }

    fn validate_parameters(&self) -> Result<()> {
        let (lo, hi) = CUT_DEPTH_RANGE;
        if !in_cut_depth_range(self.cut_depth) {
            return Err(JointError::InvalidParameter(format!(
                "cut_depth must lie between {lo} and {hi}, got {}",
                self.cut_depth
            )));
        }
        if !(self.gap >= 0.0 && self.gap.is_finite()) {
            return Err(JointError::InvalidParameter(format!("gap must be zero or positive, got {}", self.gap)));
        }
        Ok(())
    }

    fn cut(&self, role: JointRole, beams: &[Beam], _tol: &Tolerance) -> Result<Cut> {
        member(beams, self.main)?;
        member(beams, self.cross)?;
        match role {
            JointRole::Main | JointRole::Cross => Ok(Cut::None),
            JointRole::BeamA | JointRole::BeamB => Err(JointError::InvalidJointTopology(format!(
                "{} has no {role} role",
                self.kind()
            ))),
        }
    }

    fn blank_extensions(&self, _beams: &[Beam], _tol: &Tolerance) -> Result<Vec<(usize, f64, f64)>> {
        Ok(Vec::new())
    }
}
