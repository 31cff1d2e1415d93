//! OpenQASM 2.0 emission.

use skald_ir::{Angle, Function, Instruction, InstructionKind, Module, QubitId, StandardGate};

use crate::error::{CodegenError, CodegenResult};

/// Target id.
pub const TARGET: &str = "qasm2";

/// Emit the module's entry function as OpenQASM 2.0 over `qelib1.inc`.
///
/// Angles must be concrete and controls must already be expanded into named
/// gates.
pub fn emit_qasm2(module: &Module) -> CodegenResult<String> {
    let function = module
        .entry_point()
        .ok_or_else(|| CodegenError::translation(TARGET, "module has no entry point"))?;
    Qasm2Emitter::new().emit_function(function)
}

struct Qasm2Emitter {
    output: String,
}

impl Qasm2Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn emit_function(mut self, function: &Function) -> CodegenResult<String> {
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");
        self.writeln(&format!("// kernel: {}", function.name));

        if function.num_qubits > 0 {
            self.writeln(&format!("qreg q[{}];", function.num_qubits));
        }
        if function.num_clbits > 0 {
            self.writeln(&format!("creg c[{}];", function.num_clbits));
        }

        for instruction in &function.body {
            self.emit_instruction(instruction)?;
        }
        Ok(self.output)
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> CodegenResult<()> {
        if !instruction.controls.is_empty() {
            return Err(CodegenError::translation(
                TARGET,
                format!(
                    "'{}' carries generic controls; run expand-controls first",
                    instruction.name()
                ),
            ));
        }
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let name = gate_name(gate);
                let params = gate
                    .parameters()
                    .into_iter()
                    .map(angle)
                    .collect::<CodegenResult<Vec<_>>>()?;
                let qubits = qubit_list(&instruction.qubits);
                if params.is_empty() {
                    self.writeln(&format!("{name} {qubits};"));
                } else {
                    self.writeln(&format!("{name}({}) {qubits};", params.join(",")));
                }
            }
            InstructionKind::Measure => {
                for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    self.writeln(&format!("measure q[{}] -> c[{}];", q.0, c.0));
                }
            }
            InstructionKind::Reset => {
                for q in &instruction.qubits {
                    self.writeln(&format!("reset q[{}];", q.0));
                }
            }
            InstructionKind::Barrier => {
                self.writeln(&format!("barrier {};", qubit_list(&instruction.qubits)));
            }
        }
        Ok(())
    }
}

fn gate_name(gate: &StandardGate) -> &'static str {
    match gate {
        StandardGate::R1(_) => "u1",
        other => other.name(),
    }
}

fn angle(a: &Angle) -> CodegenResult<String> {
    a.as_f64().map(|v| v.to_string()).ok_or_else(|| {
        CodegenError::translation(TARGET, format!("angle '{a}' is not a constant"))
    })
}

fn qubit_list(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| format!("q[{}]", q.0))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use skald_ir::ClbitId;

    fn entry(f: Function) -> Module {
        let mut f = f;
        f.set_entry_point();
        let mut module = Module::new("m");
        module.push_function(f).unwrap();
        module
    }

    #[test]
    fn test_bell() {
        let mut f = Function::new("bell", 2, 2);
        f.h(QubitId(0)).unwrap();
        f.cx(QubitId(0), QubitId(1)).unwrap();
        f.measure(QubitId(0), ClbitId(0)).unwrap();
        f.measure(QubitId(1), ClbitId(1)).unwrap();

        let qasm = emit_qasm2(&entry(f)).unwrap();
        assert_eq!(
            qasm,
            "OPENQASM 2.0;\n\
             include \"qelib1.inc\";\n\
             // kernel: bell\n\
             qreg q[2];\n\
             creg c[2];\n\
             h q[0];\n\
             cx q[0],q[1];\n\
             measure q[0] -> c[0];\n\
             measure q[1] -> c[1];\n"
        );
    }

    #[test]
    fn test_parameters_and_u1() {
        let mut f = Function::new("k", 1, 0);
        f.rx(0.5, QubitId(0)).unwrap();
        f.push(Instruction::gate(StandardGate::R1(Angle::constant(0.25)), [QubitId(0)]))
            .unwrap();
        let qasm = emit_qasm2(&entry(f)).unwrap();
        assert!(qasm.contains("rx(0.5) q[0];"));
        assert!(qasm.contains("u1(0.25) q[0];"));
    }

    #[test]
    fn test_symbolic_angle_rejected() {
        let mut f = Function::new("k", 1, 0).with_arguments(["theta"]);
        f.ry(Angle::arg("theta"), QubitId(0)).unwrap();
        let err = emit_qasm2(&entry(f)).unwrap_err();
        assert!(matches!(err, CodegenError::Translation { ref target, .. } if target == "qasm2"));
    }

    #[test]
    fn test_generic_controls_rejected() {
        let mut f = Function::new("k", 2, 0);
        f.ctrl(StandardGate::X, [QubitId(0)], [QubitId(1)]).unwrap();
        assert!(emit_qasm2(&entry(f)).is_err());
    }

    #[test]
    fn test_no_entry_point() {
        let mut module = Module::new("m");
        module.push_function(Function::new("k", 1, 0)).unwrap();
        assert!(emit_qasm2(&module).is_err());
    }
}
