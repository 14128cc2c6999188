//! Error types for the beam and joint model.

use joinery_geom::GeomError;
use thiserror::Error;

/// Errors raised while building beams or deriving joint geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JointError {
    /// A required incidence or intersection could not be found within
    /// tolerance (parallel or collinear members, zero-size geometry).
    #[error("degenerate geometry: {0}")]
    GeometryDegenerate(String),

    /// The joint references a role it does not define, a beam that does
    /// not exist, or too few distinct beams.
    #[error("invalid joint topology: {0}")]
    InvalidJointTopology(String),

    /// Beam dimensions or orientation are unusable.
    #[error("invalid beam: {0}")]
    InvalidBeam(String),

    /// A joint parameter lies outside its valid range.
    #[error("invalid joint parameter: {0}")]
    InvalidParameter(String),
}

impl From<GeomError> for JointError {
    fn from(err: GeomError) -> Self {
        JointError::GeometryDegenerate(err.to_string())
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, JointError>;
