//! Error types for `annbm`.
//!
//! Every failure is a local, synchronous contract violation. The engine never
//! retries or recovers on the caller's behalf.
//! Error codes follow the pattern `ANNBM-XXX` for easy debugging.

use thiserror::Error;

/// Result type alias for `annbm` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `annbm` operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Vector or query length disagrees with the index dimension (ANNBM-001).
    #[error("[ANNBM-001] Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Lookup of an identifier that was never set (ANNBM-002).
    #[error("[ANNBM-002] Unknown identifier {0}")]
    UnknownIdentifier(u32),

    /// Invalid call argument such as `k == 0` (ANNBM-003).
    #[error("[ANNBM-003] Invalid argument: {0}")]
    InvalidArgument(String),

    /// Index parameters rejected at construction (ANNBM-004).
    #[error("[ANNBM-004] Invalid index parameters: {0}")]
    InvalidParams(String),

    /// Configuration could not be loaded or validated (ANNBM-005).
    #[error("[ANNBM-005] Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code (e.g., "ANNBM-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DimensionMismatch { .. } => "ANNBM-001",
            Self::UnknownIdentifier(_) => "ANNBM-002",
            Self::InvalidArgument(_) => "ANNBM-003",
            Self::InvalidParams(_) => "ANNBM-004",
            Self::Config(_) => "ANNBM-005",
        }
    }

    /// Builds a `DimensionMismatch` error.
    #[must_use]
    pub(crate) const fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
