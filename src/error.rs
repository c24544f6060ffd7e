//! Error types for bandsearch.
//!
//! Most numeric edge cases (zero vectors, dimension mismatch during scoring,
//! empty candidate sets) degrade to benign defaults instead of erroring. The
//! variants here cover the remaining genuine faults.

use thiserror::Error;

/// Errors that can occur during indexing or reduction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrieveError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Vectors in a batch that must share a dimension do not.
    #[error("dimension mismatch: expected {expected} dimensions, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Not enough samples to estimate a statistic (e.g. unbiased covariance).
    #[error("insufficient samples: need at least {required}, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, RetrieveError>;
