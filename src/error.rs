//! Error taxonomy for a planning cycle.

use thiserror::Error;

/// Every way a planning cycle can fail.
///
/// Each variant aborts the cycle. None of them is retried inside the crate,
/// and none is ever turned into an empty or partial route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    /// No bin is full enough to be collected this cycle.
    #[error("no bin currently qualifies for collection")]
    NoQualifyingDemand,

    /// The cost matrix provider failed or returned an unusable payload.
    #[error("cost matrix unavailable: {reason}")]
    MatrixUnavailable { reason: String },

    /// The span bound makes covering every bin impossible.
    #[error("no feasible route partition: {unplaced} node(s) could not be placed within the span limit")]
    NoSolutionFound { unplaced: usize },

    /// Matrix dimensions disagree with the location list.
    #[error("cost matrix has shape {actual}, expected {expected}x{expected}")]
    InvalidMatrixShape { expected: usize, actual: String },

    /// A matrix cell is negative, NaN or infinite.
    #[error("cost matrix entry [{row}][{col}] is not a finite non-negative cost")]
    InvalidMatrixValue { row: usize, col: usize },

    /// Configuration cannot describe a valid fleet or provider.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl PlannerError {
    pub(crate) fn matrix_unavailable(reason: impl Into<String>) -> Self {
        Self::MatrixUnavailable {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        Self::matrix_unavailable(err.to_string())
    }
}
