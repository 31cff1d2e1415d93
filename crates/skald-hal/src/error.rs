//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur at the transport boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// No transport registered under this name.
    #[error("Transport not available: {0}")]
    TransportUnavailable(String),

    /// Transport rejected its configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Batch submission failed.
    #[error("Job submission failed: {0}")]
    SubmissionFailed(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
