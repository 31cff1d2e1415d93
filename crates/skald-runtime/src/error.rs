//! Error types for the runtime crate.

use thiserror::Error;

/// Errors raised by the allocator, composer and interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuntimeError {
    /// No free qudit ids remain.
    #[error("Qudit pool exhausted: all {capacity} ids are allocated")]
    ResourceExhausted {
        /// Pool capacity.
        capacity: usize,
    },

    /// A qudit id was released that is not currently allocated.
    #[error("Invalid release of qudit {id}: {reason}")]
    InvalidRelease {
        /// The offending id.
        id: usize,
        /// Why the release was rejected.
        reason: &'static str,
    },

    /// A qudit must have at least two levels.
    #[error("Invalid qudit levels: {levels} (need at least 2)")]
    InvalidLevels {
        /// Requested levels.
        levels: usize,
    },

    /// Adjoint or control regions were closed out of order.
    #[error("Region stack error: {0}")]
    RegionStack(String),

    /// The quantum state collaborator failed.
    #[error("State error: {0}")]
    State(String),

    /// A kernel could not be interpreted.
    #[error("Interpretation error: {0}")]
    Interpretation(String),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
