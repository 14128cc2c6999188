#![warn(missing_docs)]

//! BTLx export for timber assemblies.
//!
//! Turns the cuts derived by `joinery-model` into machine processes and
//! writes them as a BTLx document.
//!
//! # Pipeline
//!
//! ```text
//! Assembly ─► Part (per beam, in parallel)
//!               ├─ ReferenceSides      blank frame + six reference sides
//!               └─ dispatch(kind, role) ─► Process (JackRafterCut, DoubleCut, Lap, DovetailTenon)
//!          ─► Document ─► XML
//! ```
//!
//! # Example
//!
//! ```
//! use joinery_btlx::{BtlxSettings, Document};
//! use joinery_math::Point3;
//! use joinery_model::{Assembly, Beam, TButtJoint};
//!
//! let mut assembly = Assembly::new();
//! let main = assembly.add_beam(Beam::from_endpoints(
//!     Point3::origin(), Point3::new(0.0, 1.0, 0.0), 0.1, 0.1, None,
//! )?);
//! let cross = assembly.add_beam(Beam::from_endpoints(
//!     Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 0.1, 0.1, None,
//! )?);
//! assembly.add_joint(TButtJoint::new(main, cross));
//!
//! let document = Document::build(&assembly, &BtlxSettings::default())?;
//! assert_eq!(document.parts()[0].processes.len(), 1);
//! let xml = document.to_xml()?;
//! assert!(xml.contains("<JackRafterCut"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod diagnostics;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod format;
pub mod params;
pub mod part;
pub mod process;
pub mod reference;
pub mod settings;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use dispatch::{dispatch, joint_label, Dispatch, JointContext};
pub use document::Document;
pub use error::{BtlxError, Result};
pub use format::format_fixed;
pub use params::{FieldValue, ParamValue, ParameterBundle};
pub use part::Part;
pub use process::{DoubleCut, DovetailTenon, JackRafterCut, Lap, Orientation, Process, ProcessKind};
pub use reference::ReferenceSides;
pub use settings::BtlxSettings;
