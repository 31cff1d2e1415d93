//! Error types for the platform crate.

use std::path::PathBuf;

use thiserror::Error;

/// Problems with backend selection or target descriptors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The selector's trailing tokens do not form key/value pairs.
    #[error("Backend config must be provided as key-value pairs: '{selector}' has {tokens} trailing tokens")]
    MalformedBackendConfig {
        /// The selector as given.
        selector: String,
        /// Number of tokens after the backend id.
        tokens: usize,
    },

    /// The selector has no backend id.
    #[error("Backend selector is empty")]
    EmptySelector,

    /// The target descriptor could not be read.
    #[error("Cannot read target descriptor {}: {source}", path.display())]
    DescriptorUnreadable {
        /// Descriptor path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised while targeting, lowering or launching.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlatformError {
    /// Backend selection or descriptor problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A lowering stage failed or could not be created.
    #[error("Lowering stage '{stage}' failed: {diagnostic}")]
    Pipeline {
        /// Stage name.
        stage: String,
        /// What went wrong.
        diagnostic: String,
    },

    /// Concrete arguments could not be substituted.
    #[error("Argument synthesis failed: {0}")]
    ArgumentSynthesis(String),

    /// Code generation failed.
    #[error("Could not translate to '{target}': {reason}")]
    CodeGen {
        /// Translation target.
        target: String,
        /// What went wrong.
        reason: String,
    },

    /// A launch was attempted without an execution context.
    #[error("Remote execution requires an active sample or observe context")]
    NoActiveExecutionContext,

    /// No backend has been targeted yet.
    #[error("No target backend configured")]
    NoTargetConfigured,

    /// No kernel IR is registered under this name.
    #[error("Kernel '{0}' not found")]
    KernelNotFound(String),

    /// The registered kernel IR could not be used.
    #[error("Invalid kernel IR for '{kernel}': {reason}")]
    InvalidKernelIr {
        /// Kernel name.
        kernel: String,
        /// What went wrong.
        reason: String,
    },

    /// The transport failed.
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] skald_hal::HalError),
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
