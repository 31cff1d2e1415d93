//! Canonicalization: fold constants, drop no-ops, cancel inverse pairs.

use std::collections::BTreeMap;

use skald_ir::{Angle, Function, Instruction, InstructionKind, Module, StandardGate};

use crate::error::CompileResult;
use crate::pass::Pass;

/// Normalizes every function body.
///
/// - constant angle expressions are folded
/// - identity gates and zero-angle rotations are removed
/// - a gate immediately followed by its adjoint on the same operands is
///   removed together with it
///
/// Running it twice is the same as running it once.
pub struct Canonicalize;

impl Canonicalize {
    /// Registered name.
    pub const NAME: &'static str = "canonicalize";
}

fn fold(inst: &Instruction) -> Instruction {
    let InstructionKind::Gate(gate) = &inst.kind else {
        return inst.clone();
    };
    let empty = BTreeMap::new();
    Instruction {
        kind: InstructionKind::Gate(gate.map_parameters(|a| a.bind(&empty))),
        ..inst.clone()
    }
}

fn is_no_op(inst: &Instruction) -> bool {
    match inst.as_gate() {
        Some(StandardGate::I) => true,
        Some(
            StandardGate::Rx(a) | StandardGate::Ry(a) | StandardGate::Rz(a) | StandardGate::R1(a),
        ) => a.is_zero(),
        Some(StandardGate::U3(a, b, c)) => [a, b, c].iter().all(|x: &&Angle| x.is_zero()),
        _ => false,
    }
}

fn cancels(prev: &Instruction, next: &Instruction) -> bool {
    prev.is_gate() && next.adjoint().is_some_and(|adj| adj == *prev)
}

fn canonicalize(function: &mut Function) {
    let mut out: Vec<Instruction> = Vec::with_capacity(function.body.len());
    for inst in function.body.iter().map(fold) {
        if is_no_op(&inst) {
            continue;
        }
        if out.last().is_some_and(|prev| cancels(prev, &inst)) {
            out.pop();
            continue;
        }
        out.push(inst);
    }
    function.body = out;
}

impl Pass for Canonicalize {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, module: &mut Module) -> CompileResult<()> {
        module.functions_mut().for_each(canonicalize);
        Ok(())
    }
}
