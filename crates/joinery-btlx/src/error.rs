//! Error types for BTLx export.

use joinery_model::JointError;
use thiserror::Error;

/// Errors raised while turning joints into processes or writing a document.
#[derive(Error, Debug)]
pub enum BtlxError {
    /// A required incidence or intersection could not be found.
    #[error("degenerate geometry: {0}")]
    GeometryDegenerate(String),

    /// No process exists for a joint type and beam role.
    #[error("{0}")]
    UnsupportedJoint(String),

    /// A process schema field was absent from its input bundle.
    #[error("{process} is missing required parameter {parameter}")]
    MissingParameter {
        /// Process type being built.
        process: &'static str,
        /// Schema field that was absent.
        parameter: &'static str,
    },

    /// A joint references a role or beam it does not define.
    #[error("invalid joint topology: {0}")]
    InvalidJointTopology(String),

    /// A joint or process parameter is out of range or of the wrong kind.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A part was requested for a beam the assembly does not have.
    #[error("assembly has no beam {index} ({count} beams)")]
    MissingBeam {
        /// Requested beam index.
        index: usize,
        /// Number of beams in the assembly.
        count: usize,
    },

    /// The assembly has no beams.
    #[error("assembly contains no beams")]
    EmptyAssembly,

    /// Settings could not be parsed.
    #[error("invalid settings: {0}")]
    Settings(String),

    /// XML serialization failed.
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<JointError> for BtlxError {
    fn from(err: JointError) -> Self {
        match err {
            JointError::GeometryDegenerate(msg) | JointError::InvalidBeam(msg) => BtlxError::GeometryDegenerate(msg),
            JointError::InvalidJointTopology(msg) => BtlxError::InvalidJointTopology(msg),
            JointError::InvalidParameter(msg) => BtlxError::InvalidParameter(msg),
        }
    }
}

impl From<joinery_geom::GeomError> for BtlxError {
    fn from(err: joinery_geom::GeomError) -> Self {
        BtlxError::GeometryDegenerate(err.to_string())
    }
}

/// Result type for BTLx operations.
pub type Result<T> = std::result::Result<T, BtlxError>;
