//! Static table from (joint kind, beam role) to process constructor.
//!
//! The match in [`dispatch`] has no wildcard arm, so adding a joint kind or
//! a role fails to compile until the table says what to do with it.

use joinery_math::Tolerance;
use joinery_model::{Beam, Cut, Joint, JointKind, JointRole};

use crate::process::{DoubleCut, DovetailTenon, JackRafterCut, Lap, Process, ProcessKind};
use crate::reference::ReferenceSides;
use crate::{BtlxError, Result};

/// Everything a process constructor may look at.
#[derive(Debug, Clone, Copy)]
pub struct JointContext<'a> {
    /// The joint being processed.
    pub joint: &'a Joint,
    /// Role of the part's beam in that joint.
    pub role: JointRole,
    /// All beams of the assembly.
    pub beams: &'a [Beam],
    /// Reference sides of the part.
    pub reference: &'a ReferenceSides,
    /// Geometric tolerance.
    pub tolerance: &'a Tolerance,
}

impl JointContext<'_> {
    fn cut(&self) -> Result<Cut> {
        Ok(self.joint.cut(self.role, self.beams, self.tolerance)?)
    }

    fn process(&self, reference_side: usize, kind: ProcessKind) -> Process {
        Process {
            name: joint_label(self.joint.kind()).to_string(),
            reference_side,
            kind,
        }
    }

    fn unexpected(&self, cut: &Cut) -> BtlxError {
        BtlxError::UnsupportedJoint(format!(
            "{} {} produced a {}, which its process does not handle",
            self.joint.kind(),
            self.role,
            cut.name()
        ))
    }
}

/// Builds at most one process for one joint role.
pub type ProcessConstructor = fn(&JointContext<'_>) -> Result<Option<Process>>;

/// Table entry for one (kind, role) pair.
#[derive(Debug, Clone, Copy)]
pub enum Dispatch {
    /// Run this constructor.
    Process(ProcessConstructor),
    /// Machining is needed but no process type exists for it yet.
    Unsupported,
    /// The joint kind has no such role.
    UndefinedRole,
}

/// Look up the table entry for a joint kind and role.
pub fn dispatch(kind: JointKind, role: JointRole) -> Dispatch {
    use JointKind::*;
    use JointRole::*;
    match (kind, role) {
        (TButt, Main) => Dispatch::Process(trim_or_notch),
        (TButt, Cross) => Dispatch::Process(lap),
        (LButt, Main | Cross) => Dispatch::Process(jack_rafter_cut),
        (LMiter, BeamA | BeamB) => Dispatch::Process(jack_rafter_cut),
        (XHalfLap, BeamA | BeamB) => Dispatch::Process(lap),
        (TDovetail, Main) => Dispatch::Process(dovetail_tenon),
        (TDovetail, Cross) => Dispatch::Unsupported,
        (TStirnversatz, Main | Cross) => Dispatch::Unsupported,
        (TButt | LButt | TDovetail | TStirnversatz, BeamA | BeamB) => Dispatch::UndefinedRole,
        (LMiter | XHalfLap, Main | Cross) => Dispatch::UndefinedRole,
    }
}

/// Run the table for one joint role of a part.
pub fn process_for(ctx: &JointContext<'_>) -> Result<Option<Process>> {
    let kind = ctx.joint.kind();
    match dispatch(kind, ctx.role) {
        Dispatch::Process(constructor) => constructor(ctx),
        Dispatch::Unsupported => Err(BtlxError::UnsupportedJoint(format!(
            "joint type {kind} not implemented for {} beams",
            ctx.role
        ))),
        Dispatch::UndefinedRole => Err(BtlxError::InvalidJointTopology(format!("{kind} has no {} role", ctx.role))),
    }
}

/// Label written as the process `Name`.
pub fn joint_label(kind: JointKind) -> &'static str {
    match kind {
        JointKind::TButt => "T-Butt Joint",
        JointKind::LButt => "L-Butt Joint",
        JointKind::LMiter => "L-Miter Joint",
        JointKind::XHalfLap => "X-HalfLap Joint",
        JointKind::TDovetail => "T-Dovetail Joint",
        JointKind::TStirnversatz => "T-Stirnversatz Joint",
    }
}

// =============================================================================
// Constructors
// =============================================================================

fn jack_rafter_cut(ctx: &JointContext<'_>) -> Result<Option<Process>> {
    match ctx.cut()? {
        Cut::Plane(plane) => {
            let cut = JackRafterCut::derive(&plane, ctx.reference, ctx.tolerance)?;
            Ok(Some(ctx.process(JackRafterCut::REFERENCE_SIDE, ProcessKind::JackRafterCut(cut))))
        }
        Cut::None => Ok(None),
        other => Err(ctx.unexpected(&other)),
    }
}

fn trim_or_notch(ctx: &JointContext<'_>) -> Result<Option<Process>> {
    match ctx.cut()? {
        Cut::DoublePlane(planes) => {
            let (side, bundle) = DoubleCut::bundle(&planes, ctx.reference, ctx.tolerance)?;
            let cut = DoubleCut::from_bundle(&bundle)?;
            Ok(Some(ctx.process(side, ProcessKind::DoubleCut(cut))))
        }
        _ => jack_rafter_cut(ctx),
    }
}

fn lap(ctx: &JointContext<'_>) -> Result<Option<Process>> {
    match ctx.cut()? {
        Cut::Lap(cut) => {
            let (side, bundle) = Lap::bundle(&cut, ctx.reference, ctx.tolerance)?;
            Ok(Some(ctx.process(side, ProcessKind::Lap(Lap::from_bundle(&bundle)?))))
        }
        Cut::None => Ok(None),
        other => Err(ctx.unexpected(&other)),
    }
}

fn dovetail_tenon(ctx: &JointContext<'_>) -> Result<Option<Process>> {
    match ctx.cut()? {
        Cut::Tenon(cut) => {
            let (side, bundle) = DovetailTenon::bundle(&cut, ctx.reference, ctx.tolerance)?;
            let tenon = DovetailTenon::from_bundle(&bundle)?;
            Ok(Some(ctx.process(side, ProcessKind::DovetailTenon(tenon))))
        }
        Cut::None => Ok(None),
        other => Err(ctx.unexpected(&other)),
    }
}
