//! Solver error taxonomy.
//!
//! Every variant is a precondition violation detected before any state is
//! written, so a rejected call leaves the solver exactly as it was.

use reframe_common::error::ReframeError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    /// Options or initial bounds are unusable. The solver stays
    /// uninitialized and must be rebuilt with fixed options.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("{operation} called before first observation added")]
    NotInitialized { operation: &'static str },

    /// Upstream clock or ordering bug; drop or re-timestamp the sample.
    #[error("timestamp {timestamp_us}us does not advance past current time {current_time_us}us")]
    NonMonotonicTime {
        timestamp_us: u64,
        current_time_us: u64,
    },

    #[error("pixels_per_degree must be larger than 0, got {pixels_per_degree}")]
    InvalidScale { pixels_per_degree: f64 },

    #[error("min_location {min_location} must be below max_location {max_location}")]
    InvalidBounds { min_location: i32, max_location: i32 },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

impl From<SolverError> for ReframeError {
    fn from(err: SolverError) -> Self {
        ReframeError::solver(err.to_string())
    }
}
