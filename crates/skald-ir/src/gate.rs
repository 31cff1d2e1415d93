//! Quantum gate types.

use serde::{Deserialize, Serialize};

use crate::parameter::Angle;

/// Gates understood by the lowering stages and translators.
///
/// Controls are carried by the [`Instruction`](crate::Instruction), not the
/// gate, except for the named controlled gates (`CX`, `CZ`, `CCX`) that
/// target formats spell out directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X axis.
    Rx(Angle),
    /// Rotation around Y axis.
    Ry(Angle),
    /// Rotation around Z axis.
    Rz(Angle),
    /// Phase gate diag(1, e^{iλ}).
    R1(Angle),
    /// Universal single-qubit gate U3(θ, φ, λ).
    U3(Angle, Angle, Angle),
    /// SWAP gate.
    Swap,
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// Toffoli gate.
    CCX,
}

impl StandardGate {
    /// Lower-case gate mnemonic, shared by every textual target.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::R1(_) => "r1",
            StandardGate::U3(_, _, _) => "u3",
            StandardGate::Swap => "swap",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::CCX => "ccx",
        }
    }

    /// Number of qubits the gate acts on, named controls included.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::Swap | StandardGate::CX | StandardGate::CZ => 2,
            StandardGate::CCX => 3,
            _ => 1,
        }
    }

    /// Angles of the gate, in declaration order.
    pub fn parameters(&self) -> Vec<&Angle> {
        match self {
            StandardGate::Rx(a) | StandardGate::Ry(a) | StandardGate::Rz(a) | StandardGate::R1(a) => {
                vec![a]
            }
            StandardGate::U3(a, b, c) => vec![a, b, c],
            _ => vec![],
        }
    }

    /// Apply `f` to every angle, producing a new gate.
    #[must_use]
    pub fn map_parameters(&self, f: impl Fn(&Angle) -> Angle) -> Self {
        match self {
            StandardGate::Rx(a) => StandardGate::Rx(f(a)),
            StandardGate::Ry(a) => StandardGate::Ry(f(a)),
            StandardGate::Rz(a) => StandardGate::Rz(f(a)),
            StandardGate::R1(a) => StandardGate::R1(f(a)),
            StandardGate::U3(a, b, c) => StandardGate::U3(f(a), f(b), f(c)),
            other => other.clone(),
        }
    }

    /// True if any angle still references a kernel argument.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|a| a.is_symbolic())
    }

    /// True if G† = G.
    pub fn is_self_adjoint(&self) -> bool {
        matches!(
            self,
            StandardGate::I
                | StandardGate::X
                | StandardGate::Y
                | StandardGate::Z
                | StandardGate::H
                | StandardGate::Swap
                | StandardGate::CX
                | StandardGate::CZ
                | StandardGate::CCX
        )
    }

    /// The adjoint gate G†.
    ///
    /// - S† = Sdg, T† = Tdg
    /// - Rx(θ)† = Rx(-θ), likewise for the other single-angle rotations
    /// - U3(θ, φ, λ)† = U3(-θ, -λ, -φ)
    #[must_use]
    pub fn adjoint(&self) -> Self {
        match self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::U3(theta, phi, lambda) => {
                StandardGate::U3(theta.negated(), lambda.negated(), phi.negated())
            }
            StandardGate::Rx(_) | StandardGate::Ry(_) | StandardGate::Rz(_) | StandardGate::R1(_) => {
                self.map_parameters(Angle::negated)
            }
            other => other.clone(),
        }
    }
}
