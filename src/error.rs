//! Error types for zeropow

use thiserror::Error;

/// Result type alias using zeropow's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in zeropow operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input does not have the rank an operation requires
    #[error("Invalid shape {shape:?}: {reason}")]
    InvalidShape {
        /// Offending shape
        shape: Vec<usize>,
        /// Reason for invalidity
        reason: String,
    },

    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Invalid dimension index
    #[error("Invalid dimension {dim} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The invalid dimension
        dim: isize,
        /// Number of dimensions
        ndim: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Backend-specific error (thread pool construction and the like)
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create an invalid shape error
    pub fn invalid_shape(shape: &[usize], reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            shape: shape.to_vec(),
            reason: reason.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_shape(&[3], "expected at least 2 dimensions");
        assert_eq!(
            err.to_string(),
            "Invalid shape [3]: expected at least 2 dimensions"
        );

        let err = Error::invalid_argument("steps", "must be non-negative, got -1");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'steps': must be non-negative, got -1"
        );
    }
}
