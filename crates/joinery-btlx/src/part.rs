//! Per-beam part assembly.

use joinery_model::{Assembly, Beam};
use tracing::{debug, instrument, warn};

use crate::diagnostics::Diagnostic;
use crate::dispatch::{process_for, JointContext};
use crate::process::Process;
use crate::reference::ReferenceSides;
use crate::settings::BtlxSettings;
use crate::{BtlxError, Result};

/// One beam prepared for fabrication.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Index of the beam in the assembly.
    pub index: usize,
    /// Beam geometry, blank extensions included.
    pub beam: Beam,
    /// Blank frame and reference sides, resolved once.
    pub reference: ReferenceSides,
    /// Processes in joint order.
    pub processes: Vec<Process>,
    /// Problems met while deriving processes.
    pub diagnostics: Vec<Diagnostic>,
}

impl Part {
    /// Build the part for beam `index`: resolve its reference sides, then
    /// run every joint touching the beam through the dispatch table.
    ///
    /// A joint that fails leaves a diagnostic and no process. Only a beam
    /// whose reference sides cannot be resolved fails the whole part.
    #[instrument(skip(assembly, settings), fields(joints = assembly.joints.len()))]
    pub fn build(index: usize, assembly: &Assembly, settings: &BtlxSettings) -> Result<Self> {
        let beam = assembly.beams.get(index).ok_or(BtlxError::MissingBeam {
            index,
            count: assembly.beams.len(),
        })?;
        let reference = ReferenceSides::from_beam(beam)?;

        let mut processes = Vec::new();
        let mut diagnostics = Vec::new();
        for joint_index in assembly.joints_for_beam(index) {
            let joint = &assembly.joints[joint_index];
            let Some(role) = joint.role_of(index) else {
                continue;
            };
            let ctx = JointContext {
                joint,
                role,
                beams: &assembly.beams,
                reference: &reference,
                tolerance: &settings.tolerance,
            };
            match process_for(&ctx) {
                Ok(Some(process)) => {
                    debug!(joint = joint_index, %role, process = process.process_type(), "process derived");
                    processes.push(process);
                }
                Ok(None) => debug!(joint = joint_index, %role, "no process needed"),
                Err(err) => {
                    warn!(joint = joint_index, %role, %err, "process skipped");
                    diagnostics.push(Diagnostic::from_error(index, Some(joint_index), &err));
                }
            }
        }

        Ok(Self {
            index,
            beam: beam.clone(),
            reference,
            processes,
            diagnostics,
        })
    }

    /// Number written as `SingleMemberNumber`: the beam index, matching
    /// the part number used in diagnostics.
    pub fn single_member_number(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use joinery_math::Point3;
    use joinery_model::{TButtJoint, TStirnversatzJoint};

    fn t_assembly() -> Assembly {
        let mut assembly = Assembly::new();
        assembly.add_beam(Beam::from_endpoints(Point3::origin(), Point3::new(0.0, 1.0, 0.0), 0.1, 0.1, None).unwrap());
        assembly.add_beam(
            Beam::from_endpoints(Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 0.1, 0.1, None).unwrap(),
        );
        assembly
    }

    #[test]
    fn test_processes_follow_joint_order() {
        let mut assembly = t_assembly();
        assembly.add_beam(
            Beam::from_endpoints(Point3::new(1.05, -1.0, 0.0), Point3::new(1.05, 1.0, 0.0), 0.1, 0.1, None).unwrap(),
        );
        assembly.add_joint(TButtJoint::new(0, 1).with_mill_depth(0.02));
        assembly.add_joint(TButtJoint::new(1, 2));
        let part = Part::build(1, &assembly, &BtlxSettings::default()).unwrap();
        let types: Vec<_> = part.processes.iter().map(Process::process_type).collect();
        assert_eq!(types, ["Lap", "JackRafterCut"]);
        assert_eq!(part.processes[1].name, "T-Butt Joint");
    }

    #[test]
    fn test_failure_becomes_diagnostic() {
        let mut assembly = t_assembly();
        assembly.add_joint(TStirnversatzJoint::new(0, 1));
        assembly.add_joint(TButtJoint::new(0, 1));
        let part = Part::build(0, &assembly, &BtlxSettings::default()).unwrap();
        assert_eq!(part.processes.len(), 1);
        assert_eq!(part.diagnostics.len(), 1);
        assert_eq!(part.diagnostics[0].kind, DiagnosticKind::UnsupportedJoint);
        assert_eq!(part.diagnostics[0].joint_index, Some(0));
    }

    #[test]
    fn test_untouched_beam_is_valid() {
        let part = Part::build(1, &t_assembly(), &BtlxSettings::default()).unwrap();
        assert!(part.processes.is_empty());
        assert!(part.diagnostics.is_empty());
        assert_eq!(part.single_member_number(), 1);
    }

    #[test]
    fn test_unknown_beam_is_an_error() {
        let err = Part::build(5, &t_assembly(), &BtlxSettings::default()).unwrap_err();
        assert!(matches!(err, BtlxError::MissingBeam { index: 5, count: 2 }));
    }
}
