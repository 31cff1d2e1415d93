//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit is outside the function's register.
    #[error("Qubit {qubit} out of range for function with {num_qubits} qubits{}", format_gate_context(.gate_name))]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of qubits declared by the function.
        num_qubits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit is outside the function's register.
    #[error("Classical bit {clbit} out of range for function with {num_clbits} bits")]
    ClbitOutOfRange {
        /// The offending classical bit.
        clbit: ClbitId,
        /// Number of classical bits declared by the function.
        num_clbits: u32,
    },

    /// Gate requires a different number of target qubits.
    #[error("Gate '{gate_name}' requires {expected} target qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of targets.
        expected: u32,
        /// Actual number of targets provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A symbol with this name already exists in the module.
    #[error("Symbol '{0}' already defined in module")]
    DuplicateSymbol(String),

    /// Symbol lookup failed.
    #[error("Symbol '{0}' not found in module")]
    SymbolNotFound(String),

    /// Serialized IR could not be decoded or encoded.
    #[error("Malformed IR text: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Observable text or shape is invalid.
    #[error("Invalid observable: {0}")]
    InvalidObservable(String),
}

#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
