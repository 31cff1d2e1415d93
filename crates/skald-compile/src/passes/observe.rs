//! Measurement preparation for one observable term.

use std::f64::consts::FRAC_PI_2;

use skald_ir::{Angle, ClbitId, Instruction, Module, PauliOp, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;

/// Appends basis rotations and measurements for a Pauli word to the entry
/// function.
///
/// For each qubit in the word's support, in qubit order: `X` adds `h`, `Y`
/// adds `rx(π/2)`, `Z` adds nothing. The support qubits are then measured
/// into classical bits `0..k`, so the parity of the outcome bitstring is the
/// term's eigenvalue.
#[derive(Debug, Clone)]
pub struct ObserveAnsatz {
    symplectic: Vec<bool>,
}

impl ObserveAnsatz {
    /// Stage name.
    pub const NAME: &'static str = "observe-ansatz";

    /// Prepare for the term with binary symplectic encoding `symplectic`
    /// (x bits, then z bits).
    pub fn new(symplectic: impl Into<Vec<bool>>) -> Self {
        Self {
            symplectic: symplectic.into(),
        }
    }

    fn fail(diagnostic: impl Into<String>) -> CompileError {
        CompileError::pass_failed(Self::NAME, diagnostic)
    }

    fn support(&self) -> CompileResult<Vec<(u32, PauliOp)>> {
        if self.symplectic.len() % 2 != 0 {
            return Err(Self::fail(format!(
                "symplectic encoding has odd length {}",
                self.symplectic.len()
            )));
        }
        let n = self.symplectic.len() / 2;
        let mut support = Vec::new();
        for q in 0..n {
            let op = PauliOp::from_bits(self.symplectic[q], self.symplectic[q + n]);
            if op != PauliOp::I {
                let q = u32::try_from(q).map_err(|_| Self::fail("register too large"))?;
                support.push((q, op));
            }
        }
        Ok(support)
    }
}

impl Pass for ObserveAnsatz {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, module: &mut Module) -> CompileResult<()> {
        let support = self.support()?;
        let entry_name = module
            .entry_point()
            .map(|f| f.name.clone())
            .ok_or_else(|| Self::fail("module has no entry point"))?;
        let function = module
            .lookup_function_mut(&entry_name)
            .ok_or_else(|| Self::fail("module has no entry point"))?;

        if function.body.iter().any(Instruction::is_measure) {
            return Err(Self::fail(format!(
                "ansatz '{}' already measures; observe kernels must leave qubits unmeasured",
                function.name
            )));
        }
        if let Some(&(q, _)) = support.iter().find(|(q, _)| *q >= function.num_qubits) {
            return Err(Self::fail(format!(
                "term acts on qubit {q} but '{}' has {} qubits",
                function.name, function.num_qubits
            )));
        }

        for &(q, op) in &support {
            match op {
                PauliOp::X => function.body.push(Instruction::gate(StandardGate::H, [QubitId(q)])),
                PauliOp::Y => function.body.push(Instruction::gate(
                    StandardGate::Rx(Angle::constant(FRAC_PI_2)),
                    [QubitId(q)],
                )),
                PauliOp::Z | PauliOp::I => {}
            }
        }

        let k = u32::try_from(support.len()).map_err(|_| Self::fail("register too large"))?;
        function.num_clbits = k;
        for (c, &(q, _)) in (0..k).zip(&support) {
            function.body.push(Instruction::measure(QubitId(q), ClbitId(c)));
        }
        Ok(())
    }
}
