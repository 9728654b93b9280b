//! Error types for GMC solves.

use ndarray_linalg::error::LinalgError;
use thiserror::Error;

/// Error type for GMC solves.
///
/// Every variant except [`GmcError::Linalg`] is raised while validating the
/// inputs, before the first operator application.
#[derive(Debug, Error)]
pub enum GmcError {
    /// The design matrix has no columns (or no rows).
    #[error("Design matrix is empty: {rows} x {cols}")]
    EmptyDesign { rows: usize, cols: usize },

    /// Response length does not match the number of rows of the design.
    #[error("Shape mismatch: response has length {got}, design has {expected} rows")]
    ShapeMismatch { expected: usize, got: usize },

    /// A group partition is unusable for the given design.
    #[error("Invalid group partition: {0}")]
    InvalidGroups(String),

    /// A scalar parameter is outside of its admissible range.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Unrecognised acceleration scheme name.
    #[error("Unknown acceleration scheme: {0}")]
    UnknownAcceleration(String),

    /// LAPACK failure while computing the Lipschitz constant.
    #[error("Linear algebra error: {0}")]
    Linalg(LinalgError),
}

impl From<LinalgError> for GmcError {
    fn from(err: LinalgError) -> Self {
        GmcError::Linalg(err)
    }
}

/// Result type for GMC solves.
pub type Result<T> = std::result::Result<T, GmcError>;

pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> GmcError {
    GmcError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}
