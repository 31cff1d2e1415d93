//! Expansion of generic controls into named controlled gates.

use skald_ir::{Instruction, Module, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;

/// Rewrites generically controlled gates as named ones.
///
/// | generic | named |
/// |---------|-------|
/// | `x` with 1 control | `cx` |
/// | `x` with 2 controls | `ccx` |
/// | `z` with 1 control | `cz` |
///
/// Any other controlled instruction fails the stage.
pub struct ExpandControls;

impl ExpandControls {
    /// Registered name.
    pub const NAME: &'static str = "expand-controls";
}

fn expand(inst: &Instruction) -> CompileResult<Instruction> {
    if inst.controls.is_empty() {
        return Ok(inst.clone());
    }
    let named = match (inst.as_gate(), inst.controls.len()) {
        (Some(StandardGate::X), 1) => StandardGate::CX,
        (Some(StandardGate::X), 2) => StandardGate::CCX,
        (Some(StandardGate::Z), 1) => StandardGate::CZ,
        _ => {
            return Err(CompileError::pass_failed(
                ExpandControls::NAME,
                format!(
                    "cannot expand {}-controlled '{}'",
                    inst.controls.len(),
                    inst.name()
                ),
            ));
        }
    };
    let operands: Vec<_> = inst.operands().collect();
    Ok(Instruction::gate(named, operands))
}

impl Pass for ExpandControls {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn should_run(&self, module: &Module) -> bool {
        module
            .functions()
            .any(|f| f.body.iter().any(|i| !i.controls.is_empty()))
    }

    fn run(&self, module: &mut Module) -> CompileResult<()> {
        for function in module.functions_mut() {
            function.body = function
                .body
                .iter()
                .map(expand)
                .collect::<CompileResult<Vec<_>>>()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skald_ir::{Angle, Function, QubitId};

    fn module_with(f: Function) -> Module {
        let mut module = Module::new("m");
        module.push_function(f).unwrap();
        module
    }

    #[test]
    fn test_expand_supported() {
        let mut f = Function::new("k", 3, 0);
        f.ctrl(StandardGate::X, [QubitId(0)], [QubitId(1)]).unwrap();
        f.ctrl(StandardGate::X, [QubitId(0), QubitId(1)], [QubitId(2)]).unwrap();
        f.ctrl(StandardGate::Z, [QubitId(2)], [QubitId(0)]).unwrap();
        let mut module = module_with(f);

        ExpandControls.run(&mut module).unwrap();
        let body = &module.lookup_function("k").unwrap().body;
        let names: Vec<&str> = body.iter().map(Instruction::name).collect();
        assert_eq!(names, ["cx", "ccx", "cz"]);
        assert_eq!(body[1].qubits, vec![QubitId(0), QubitId(1), QubitId(2)]);
        assert!(body.iter().all(|i| i.controls.is_empty()));
        assert!(!ExpandControls.should_run(&module));
    }

    #[test]
    fn test_expand_unsupported_fails() {
        let mut f = Function::new("k", 2, 0);
        f.ctrl(StandardGate::Rx(Angle::constant(0.1)), [QubitId(0)], [QubitId(1)])
            .unwrap();
        let err = ExpandControls.run(&mut module_with(f)).unwrap_err();
        match err {
            CompileError::PassFailed { stage, diagnostic } => {
                assert_eq!(stage, "expand-controls");
                assert!(diagnostic.contains("'rx'"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
