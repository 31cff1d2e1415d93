//! Error types for the code-generation crate.

use thiserror::Error;

/// Errors raised while generating target code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodegenError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] skald_ir::IrError),

    /// The intrinsic table has no entry with this name.
    #[error("Intrinsic '{0}' not in table")]
    UnknownIntrinsic(String),

    /// No translator is registered for this target.
    #[error("Unknown code-generation target '{0}'")]
    UnknownTarget(String),

    /// A translator could not express the module.
    #[error("Translation to '{target}' failed: {reason}")]
    Translation {
        /// Target id.
        target: String,
        /// What could not be translated.
        reason: String,
    },
}

impl CodegenError {
    /// Build a [`CodegenError::Translation`].
    pub fn translation(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Translation {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;
