//! Error types for geometric primitives.

use thiserror::Error;

/// Errors raised by frame construction and intersection queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// The inputs are parallel within angular tolerance, so no unique
    /// intersection exists.
    #[error("no unique intersection: {0} are parallel")]
    Parallel(&'static str),

    /// A direction, normal or line has (near) zero length.
    #[error("degenerate geometry: {0}")]
    Degenerate(&'static str),
}

/// Result type for geometric operations.
pub type Result<T> = std::result::Result<T, GeomError>;
