//! Kernel instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a kernel body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(StandardGate),
    /// Z-basis measurement into classical bits.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (scheduling fence).
    Barrier,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Generic control qubits, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<QubitId>,
    /// Target qubits.
    pub qubits: Vec<QubitId>,
    /// Classical bits written by a measurement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create an uncontrolled gate instruction.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            controls: vec![],
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a gate instruction conditioned on `controls`.
    pub fn controlled(
        gate: StandardGate,
        controls: impl IntoIterator<Item = QubitId>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            controls: controls.into_iter().collect(),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            controls: vec![],
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a reset instruction.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            controls: vec![],
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            controls: vec![],
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Mnemonic of the instruction.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }

    /// The gate, if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Check if this is a gate.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Every qubit the instruction touches: controls, then targets.
    pub fn operands(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.controls.iter().chain(self.qubits.iter()).copied()
    }

    /// The adjoint instruction, for gates; `None` for non-unitary kinds.
    pub fn adjoint(&self) -> Option<Self> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(Self {
                kind: InstructionKind::Gate(g.adjoint()),
                ..self.clone()
            }),
            InstructionKind::Barrier => Some(self.clone()),
            InstructionKind::Measure | InstructionKind::Reset => None,
        }
    }
}
