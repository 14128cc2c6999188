//! A collection of beams and the joints between them.

use joinery_math::Tolerance;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::beam::Beam;
use crate::joint::Joint;
use crate::JointError;

/// Beams plus joints that reference them by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    /// Beams in insertion order.
    pub beams: Vec<Beam>,
    /// Joints in processing order.
    #[serde(default)]
    pub joints: Vec<Joint>,
}

impl Assembly {
    /// Empty assembly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a beam and return its index.
    pub fn add_beam(&mut self, beam: Beam) -> usize {
        self.beams.push(beam);
        self.beams.len() - 1
    }

    /// Append a joint and return its index.
    pub fn add_joint(&mut self, joint: impl Into<Joint>) -> usize {
        self.joints.push(joint.into());
        self.joints.len() - 1
    }

    /// True when there are no beams.
    pub fn is_empty(&self) -> bool {
        self.beams.is_empty()
    }

    /// Indices of the joints touching `beam`, in joint order.
    pub fn joints_for_beam(&self, beam: usize) -> Vec<usize> {
        self.joints
            .iter()
            .enumerate()
            .filter(|(_, joint)| joint.role_of(beam).is_some())
            .map(|(index, _)| index)
            .collect()
    }

    /// Ask every joint for its blank extensions and record them on the
    /// beams, replacing what earlier calls recorded for the same joint.
    ///
    /// Joints that fail are skipped and returned with their error.
    pub fn resolve_blank_extensions(&mut self, tol: &Tolerance) -> Vec<(usize, JointError)> {
        let mut failures = Vec::new();
        for (index, joint) in self.joints.iter().enumerate() {
            match joint.blank_extensions(&self.beams, tol) {
                Ok(requests) => {
                    for beam in joint.beam_indices() {
                        if let Some(b) = self.beams.get_mut(beam) {
                            b.remove_blank_extension(Some(index));
                        }
                    }
                    for (beam, start, end) in requests {
                        debug!(joint = index, beam, start, end, "blank extension");
                        if let Some(b) = self.beams.get_mut(beam) {
                            b.add_blank_extension(start, end, Some(index));
                        }
                    }
                }
                Err(err) => {
                    warn!(joint = index, %err, "blank extension skipped");
                    failures.push((index, err));
                }
            }
        }
        failures
    }
}
