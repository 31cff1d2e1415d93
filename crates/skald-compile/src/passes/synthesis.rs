//! Substitution of concrete kernel arguments.

use std::collections::BTreeMap;

use skald_ir::{Instruction, InstructionKind, Module};
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;

/// Concrete argument values by name.
pub type KernelArgs = BTreeMap<String, f64>;

/// Binds every declared argument of one kernel to a concrete value.
///
/// Afterwards the kernel has no arguments and every angle is a constant.
/// Missing values, unknown names, and angles over undeclared arguments are
/// all reported as [`CompileError::ArgumentSynthesis`].
#[derive(Debug, Clone)]
pub struct ArgumentSynthesis {
    kernel: String,
    args: KernelArgs,
}

impl ArgumentSynthesis {
    /// Stage name.
    pub const NAME: &'static str = "argument-synthesis";

    /// Bind `args` into the function named `kernel`.
    pub fn new(kernel: impl Into<String>, args: KernelArgs) -> Self {
        Self {
            kernel: kernel.into(),
            args,
        }
    }
}

impl Pass for ArgumentSynthesis {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, module: &mut Module) -> CompileResult<()> {
        let function = module.lookup_function_mut(&self.kernel).ok_or_else(|| {
            CompileError::ArgumentSynthesis(format!("no function named '{}'", self.kernel))
        })?;

        if let Some(missing) = function.arguments.iter().find(|a| !self.args.contains_key(*a)) {
            return Err(CompileError::ArgumentSynthesis(format!(
                "no value for argument '{missing}' of '{}'",
                self.kernel
            )));
        }
        if let Some(unknown) = self.args.keys().find(|k| !function.arguments.contains(*k)) {
            return Err(CompileError::ArgumentSynthesis(format!(
                "'{}' has no argument named '{unknown}'",
                self.kernel
            )));
        }

        let mut body = Vec::with_capacity(function.body.len());
        for inst in &function.body {
            let InstructionKind::Gate(gate) = &inst.kind else {
                body.push(inst.clone());
                continue;
            };
            let bound = gate.map_parameters(|a| a.bind(&self.args));
            if let Some(angle) = bound.parameters().into_iter().find(|a| a.is_symbolic()) {
                return Err(CompileError::ArgumentSynthesis(format!(
                    "'{}' uses undeclared arguments {:?}",
                    inst.name(),
                    angle.arguments()
                )));
            }
            body.push(Instruction {
                kind: InstructionKind::Gate(bound),
                ..inst.clone()
            });
        }

        debug!(kernel = %self.kernel, bound = self.args.len(), "arguments synthesized");
        function.body = body;
        function.arguments.clear();
        Ok(())
    }
}
