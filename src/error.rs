//! Error types for the semantic graph core.

use thiserror::Error;

/// Errors raised by the visualization core.
///
/// Every variant is fatal to the call that produced it: no partial graph,
/// layout or scene is ever returned alongside an error. Empty input is not
/// an error; it yields empty structures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VizError {
    /// A vector (or projected point set) does not match the expected shape.
    #[error("Shape mismatch at index {index}: expected {expected}, got {got}")]
    ShapeMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// A caller-supplied parameter is outside its valid domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An external collaborator (embedding provider, reducer) failed.
    #[error("Provider error: {0}")]
    Provider(String),
}

impl VizError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        VizError::InvalidParameter(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, VizError>;
