//! Error types for the compilation crate.

use thiserror::Error;

/// Errors that can occur while lowering a kernel module.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] skald_ir::IrError),

    /// A lowering stage rejected the module.
    #[error("Stage '{stage}' failed: {diagnostic}")]
    PassFailed {
        /// Stage name.
        stage: String,
        /// What went wrong.
        diagnostic: String,
    },

    /// A pipeline named a stage that is not registered.
    #[error("Unknown stage '{0}'")]
    UnknownPass(String),

    /// Concrete arguments could not be substituted into the kernel.
    #[error("Argument synthesis failed: {0}")]
    ArgumentSynthesis(String),
}

impl CompileError {
    /// Build a [`CompileError::PassFailed`].
    pub fn pass_failed(stage: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self::PassFailed {
            stage: stage.into(),
            diagnostic: diagnostic.into(),
        }
    }
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
