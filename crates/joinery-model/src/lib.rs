#![warn(missing_docs)]

//! Beams and joints for timber fabrication.
//!
//! This crate describes *what* has to be cut: [`Beam`] exposes the geometry
//! of a straight rectangular member, and [`Joint`] derives, for every beam
//! role it defines, the [`Cut`] that realizes the joint. Turning cuts into
//! machine processes happens downstream.

pub mod assembly;
pub mod beam;
pub mod error;
pub mod joint;

pub use assembly::Assembly;
pub use beam::{Beam, BeamEnd, BlankExtension};
pub use error::{JointError, Result};
pub use joint::{
    Cut, DovetailOptions, DovetailShape, Joint, JointKind, JointRole, LButtJoint, LMiterJoint, LapCut,
    TButtJoint, TDovetailJoint, TStirnversatzJoint, TenonCut, XHalfLapJoint,
};
