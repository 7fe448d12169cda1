//! Unified error types for the pcx crates
//!
//! [`PcxError`] is the common error representation at API boundaries.
//! Infeasible candidates are *not* errors and never travel through this type;
//! see `pcx_algo::Infeasible`.
//!
//! # Example
//!
//! ```ignore
//! use pcx_core::{PcxError, PcxResult};
//!
//! fn accumulate(global: &mut ParetoFrontier, stage: ParetoFrontier) -> PcxResult<()> {
//!     global.merge(stage)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::Convention;

/// Unified error type for all pcx operations.
#[derive(Error, Debug)]
pub enum PcxError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors, e.g. a malformed persisted frontier row
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors (non-finite or negative objective values)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Two frontiers with different primary-objective conventions were mixed
    #[error("Convention mismatch: expected {expected}, found {found}")]
    ConventionMismatch {
        expected: Convention,
        found: Convention,
    },

    /// Operation not supported for the given inputs
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using PcxError.
pub type PcxResult<T> = Result<T, PcxError>;

impl From<anyhow::Error> for PcxError {
    fn from(err: anyhow::Error) -> Self {
        PcxError::Other(err.to_string())
    }
}

impl From<String> for PcxError {
    fn from(s: String) -> Self {
        PcxError::Other(s)
    }
}

impl From<&str> for PcxError {
    fn from(s: &str) -> Self {
        PcxError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for PcxError {
    fn from(err: serde_json::Error) -> Self {
        PcxError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PcxError::Validation("volume is NaN".into());
        assert!(err.to_string().contains("Validation error"));
        assert!(err.to_string().contains("volume is NaN"));
    }

    #[test]
    fn test_convention_mismatch_display() {
        let err = PcxError::ConventionMismatch {
            expected: Convention::Efficiency,
            found: Convention::Loss,
        };
        assert_eq!(
            err.to_string(),
            "Convention mismatch: expected efficiency, found loss"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PcxError = io_err.into();
        assert!(matches!(err, PcxError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> PcxResult<()> {
            Err(PcxError::Config("bad tolerance".into()))
        }

        fn outer() -> PcxResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
