//! Kernel functions: a qubit register, named arguments and a straight-line body.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::Angle;
use crate::qubit::{ClbitId, QubitId};

/// Attribute marking the function a launcher should call.
pub const ENTRY_POINT_ATTR: &str = "entry_point";

/// A quantum kernel function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Symbol name.
    pub name: String,
    /// Free-form attributes (e.g. [`ENTRY_POINT_ATTR`]).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    /// Names of the classical arguments, in call order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    /// Size of the qubit register.
    pub num_qubits: u32,
    /// Size of the measurement result register.
    #[serde(default)]
    pub num_clbits: u32,
    /// Instructions in program order.
    #[serde(default)]
    pub body: Vec<Instruction>,
}

impl Function {
    /// Create an empty function over `num_qubits` qubits and `num_clbits` bits.
    pub fn new(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            attributes: vec![],
            arguments: vec![],
            num_qubits,
            num_clbits,
            body: vec![],
        }
    }

    /// Declare the classical arguments of the kernel.
    #[must_use]
    pub fn with_arguments(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.arguments = args.into_iter().map(Into::into).collect();
        self
    }

    /// Check if the function carries the entry-point attribute.
    pub fn is_entry_point(&self) -> bool {
        self.has_attribute(ENTRY_POINT_ATTR)
    }

    /// Mark the function as an entry point. Idempotent.
    pub fn set_entry_point(&mut self) {
        if !self.is_entry_point() {
            self.attributes.push(ENTRY_POINT_ATTR.to_string());
        }
    }

    /// Check for an attribute by name.
    pub fn has_attribute(&self, attr: &str) -> bool {
        self.attributes.iter().any(|a| a == attr)
    }

    /// Number of instructions in the body.
    pub fn num_ops(&self) -> usize {
        self.body.len()
    }

    /// Check every instruction already in the body.
    pub fn validate_body(&self) -> IrResult<()> {
        self.body.iter().try_for_each(|inst| self.validate(inst))
    }

    /// Validate and append an instruction.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.body.push(instruction);
        Ok(self)
    }

    /// Check operands of `instruction` against this function's registers.
    pub fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = || Some(instruction.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let got = u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX);
            if got != gate.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
        }

        let mut seen: Vec<QubitId> = Vec::with_capacity(instruction.qubits.len());
        for q in instruction.operands() {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: q,
                    num_qubits: self.num_qubits,
                    gate_name: gate_name(),
                });
            }
            if seen.contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: gate_name(),
                });
            }
            seen.push(q);
        }

        for c in &instruction.clbits {
            if c.0 >= self.num_clbits {
                return Err(IrError::ClbitOutOfRange {
                    clbit: *c,
                    num_clbits: self.num_clbits,
                });
            }
        }
        Ok(())
    }

    /// Apply a Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::H, [qubit]))
    }

    /// Apply a Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::X, [qubit]))
    }

    /// Apply an RX rotation.
    pub fn rx(&mut self, theta: impl Into<Angle>, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Rx(theta.into()), [qubit]))
    }

    /// Apply an RY rotation.
    pub fn ry(&mut self, theta: impl Into<Angle>, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Ry(theta.into()), [qubit]))
    }

    /// Apply an RZ rotation.
    pub fn rz(&mut self, phi: impl Into<Angle>, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Rz(phi.into()), [qubit]))
    }

    /// Apply a CNOT.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CX, [control, target]))
    }

    /// Apply `gate` conditioned on generic controls.
    pub fn ctrl(
        &mut self,
        gate: StandardGate,
        controls: impl IntoIterator<Item = QubitId>,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::controlled(gate, controls, targets))
    }

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Measure every qubit into the bit of the same index, growing the
    /// result register if needed.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        self.num_clbits = self.num_clbits.max(self.num_qubits);
        for i in 0..self.num_qubits {
            self.push(Instruction::measure(QubitId(i), ClbitId(i)))?;
        }
        Ok(self)
    }
}
