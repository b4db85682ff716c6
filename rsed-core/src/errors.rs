use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RSEDError {
    #[error("{0}")]
    Error(String),
    #[error("Cloud-top pressure {cloudtop_pressure} Pa lies above the deepest profile pressure {max_pressure} Pa")]
    PhysicalConsistencyViolation {
        cloudtop_pressure: f64,
        max_pressure: f64,
    },
    #[error("Cannot split {len} model points into quadrature groups of {group_size}")]
    ShapeMismatch { len: usize, group_size: usize },
    #[error("Unrecognised opacity sampling method: {0}")]
    UnreachableConfiguration(String),
    #[error("Length mismatch for {what}. Expected {expected}, got {got}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        got: usize,
    },
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Convenience type for `Result<T, RSEDError>`.
pub type RSEDResult<T> = Result<T, RSEDError>;

/// Check that an array has the expected length
pub(crate) fn ensure_len(what: &str, expected: usize, got: usize) -> RSEDResult<()> {
    if expected != got {
        return Err(RSEDError::DimensionMismatch {
            what: what.to_string(),
            expected,
            got,
        });
    }
    Ok(())
}
