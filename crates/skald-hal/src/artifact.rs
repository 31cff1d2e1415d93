//! Generated-code artifacts shipped to a transport.

use serde::{Deserialize, Serialize};

/// One translated module, labeled by what it computes.
///
/// Sampling launches produce a single artifact labeled with the kernel
/// name; observe launches produce one per non-identity observable term,
/// labeled with the term's Pauli word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoweredArtifact {
    /// Kernel name or Pauli word.
    pub label: String,
    /// Target code (QASM, QIR, …).
    pub code: String,
}

impl LoweredArtifact {
    /// Create an artifact.
    pub fn new(label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            code: code.into(),
        }
    }
}
