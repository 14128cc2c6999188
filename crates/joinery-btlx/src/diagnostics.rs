//! Non-fatal problems recorded while building parts.

use std::fmt;

use crate::BtlxError;

/// Category of a recorded problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Incidence or intersection not found.
    GeometryDegenerate,
    /// No process exists for the joint and role.
    UnsupportedJoint,
    /// A process schema field was absent.
    MissingParameter,
    /// The joint does not define the role it was asked about.
    InvalidJointTopology,
    /// A parameter was out of range.
    InvalidParameter,
    /// Anything else surfaced while deriving a process.
    Other,
}

impl From<&BtlxError> for DiagnosticKind {
    fn from(err: &BtlxError) -> Self {
        match err {
            BtlxError::GeometryDegenerate(_) => DiagnosticKind::GeometryDegenerate,
            BtlxError::UnsupportedJoint(_) => DiagnosticKind::UnsupportedJoint,
            BtlxError::MissingParameter { .. } => DiagnosticKind::MissingParameter,
            BtlxError::InvalidJointTopology(_) => DiagnosticKind::InvalidJointTopology,
            BtlxError::InvalidParameter(_) => DiagnosticKind::InvalidParameter,
            BtlxError::EmptyAssembly
            | BtlxError::MissingBeam { .. }
            | BtlxError::Settings(_)
            | BtlxError::Xml(_)
            | BtlxError::Io(_) => DiagnosticKind::Other,
        }
    }
}

/// One problem attached to a part. The process it concerns is left out of
/// the part.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Index of the part (and beam).
    pub part_index: usize,
    /// Index of the joint that failed, if any.
    pub joint_index: Option<usize>,
    /// Category.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Record `err` against a part and joint.
    pub fn from_error(part_index: usize, joint_index: Option<usize>, err: &BtlxError) -> Self {
        Self {
            part_index,
            joint_index,
            kind: err.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "part {} message: {}", self.part_index, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_kind() {
        let err = BtlxError::MissingParameter {
            process: "DovetailTenon",
            parameter: "FlankAngle",
        };
        let diagnostic = Diagnostic::from_error(2, Some(0), &err);
        assert_eq!(diagnostic.kind, DiagnosticKind::MissingParameter);
        assert_eq!(
            diagnostic.to_string(),
            "part 2 message: DovetailTenon is missing required parameter FlankAngle"
        );
    }
}
