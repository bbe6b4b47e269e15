//! Error types for the clustering engine

use crate::vectors::ItemId;
use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during clustering operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid input parameters
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Error message
        message: String,
    },

    /// Empty or invalid data
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Error message
        message: String,
    },

    /// Two points of one clustering run disagree on dimensionality
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimensionality of the run
        expected: usize,
        /// Dimensionality of the offending point
        found: usize,
    },

    /// A cluster was constructed or updated with no points
    #[error("Empty cluster")]
    EmptyCluster,

    /// The distance table has no entry for a pair the scorer needed
    #[error("No distance recorded between items {a} and {b}")]
    MissingDistance {
        /// First item id
        a: ItemId,
        /// Second item id
        b: ItemId,
    },

    /// Every cluster emptied during iteration
    #[error("Convergence failure: {message}")]
    ConvergenceFailure {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a new InvalidParameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a new InvalidData error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new DimensionMismatch error
    pub fn dimension_mismatch(expected: usize, found: usize) -> Self {
        Self::DimensionMismatch { expected, found }
    }

    /// Create a new ConvergenceFailure error
    pub fn convergence_failure(message: impl Into<String>) -> Self {
        Self::ConvergenceFailure {
            message: message.into(),
        }
    }

    /// Whether this error means "no valid clustering at this k" rather than
    /// a caller mistake.
    pub fn is_collapse(&self) -> bool {
        matches!(self, Self::ConvergenceFailure { .. })
    }
}
