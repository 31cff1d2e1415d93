//! Mapping onto a CZ-based two-qubit gate set.

use skald_ir::{Instruction, Module, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;

/// Rewrites every `cx(c, t)` as `h(t); cz(c, t); h(t)`.
pub struct CzGateSetMapping;

impl CzGateSetMapping {
    /// Registered name.
    pub const NAME: &'static str = "cz-gate-set-mapping";
}

fn is_cx(inst: &Instruction) -> bool {
    inst.controls.is_empty() && inst.as_gate() == Some(&StandardGate::CX)
}

impl Pass for CzGateSetMapping {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn should_run(&self, module: &Module) -> bool {
        module.functions().any(|f| f.body.iter().any(is_cx))
    }

    fn run(&self, module: &mut Module) -> CompileResult<()> {
        for function in module.functions_mut() {
            let mut out = Vec::with_capacity(function.body.len());
            for inst in function.body.drain(..) {
                if !is_cx(&inst) {
                    out.push(inst);
                    continue;
                }
                let &[control, target] = inst.qubits.as_slice() else {
                    return Err(CompileError::pass_failed(
                        Self::NAME,
                        format!(
                            "cx in '{}' has {} operands, expected 2",
                            function.name,
                            inst.qubits.len()
                        ),
                    ));
                };
                out.push(Instruction::gate(StandardGate::H, [target]));
                out.push(Instruction::gate(StandardGate::CZ, [control, target]));
                out.push(Instruction::gate(StandardGate::H, [target]));
            }
            function.body = out;
        }
        Ok(())
    }
}
