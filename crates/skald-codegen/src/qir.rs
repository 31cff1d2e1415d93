//! QIR base-profile emission as textual LLVM IR.
//!
//! Qubits and results are static: qubit `i` is `inttoptr (i64 i to %Qubit*)`
//! and measurement into clbit `c` writes result `c`, recorded under the label
//! `r<c>`. Runtime declarations come from the intrinsic table and labels are
//! emitted as read-only string literals.

use std::fmt::Write as _;

use skald_ir::{Angle, Function, InstructionKind, Module, StandardGate, Symbol};
use tracing::debug;

use crate::error::{CodegenError, CodegenResult};
use crate::intrinsics::{CodegenOptions, IntrinsicLibrary};

/// Target id.
pub const TARGET: &str = "qir-base";

const INITIALIZE: &str = "__quantum__rt__initialize";
const MEASURE: &str = "__quantum__qis__mz__body";
const RECORD_RESULT: &str = "__quantum__rt__result_record_output";

/// Emit the module's entry function as a QIR base-profile program.
pub fn emit_qir_base(module: &Module, options: &CodegenOptions) -> CodegenResult<String> {
    let entry = module
        .entry_point()
        .ok_or_else(|| CodegenError::translation(TARGET, "module has no entry point"))?;

    let library = IntrinsicLibrary::new(*options);
    let mut unit = Module::new(module.name.clone());
    library.load_intrinsic(&mut unit, INITIALIZE)?;

    let mut body = Vec::new();
    body.push(format!("call void @{INITIALIZE}(i8* null)"));
    for inst in &entry.body {
        lower_instruction(&library, &mut unit, inst, &mut body)?;
    }

    debug!(kernel = %entry.name, calls = body.len(), "emitted qir-base body");
    Ok(render(&unit, entry, &body))
}

fn qubit(i: u32) -> String {
    if i == 0 {
        "%Qubit* null".to_string()
    } else {
        format!("%Qubit* inttoptr (i64 {i} to %Qubit*)")
    }
}

fn result(i: u32) -> String {
    if i == 0 {
        "%Result* null".to_string()
    } else {
        format!("%Result* inttoptr (i64 {i} to %Result*)")
    }
}

fn double(a: &Angle) -> CodegenResult<String> {
    a.as_f64()
        .map(|v| format!("double 0x{:016X}", v.to_bits()))
        .ok_or_else(|| CodegenError::translation(TARGET, format!("angle '{a}' is not a constant")))
}

fn intrinsic_for(gate: &StandardGate) -> CodegenResult<&'static str> {
    Ok(match gate {
        StandardGate::X => "__quantum__qis__x__body",
        StandardGate::Y => "__quantum__qis__y__body",
        StandardGate::Z => "__quantum__qis__z__body",
        StandardGate::H => "__quantum__qis__h__body",
        StandardGate::S => "__quantum__qis__s__body",
        StandardGate::Sdg => "__quantum__qis__s__adj",
        StandardGate::T => "__quantum__qis__t__body",
        StandardGate::Tdg => "__quantum__qis__t__adj",
        StandardGate::Rx(_) => "__quantum__qis__rx__body",
        StandardGate::Ry(_) => "__quantum__qis__ry__body",
        StandardGate::Rz(_) => "__quantum__qis__rz__body",
        StandardGate::Swap => "__quantum__qis__swap__body",
        StandardGate::CX => "__quantum__qis__cnot__body",
        StandardGate::CZ => "__quantum__qis__cz__body",
        StandardGate::CCX => "__quantum__qis__ccx__body",
        other => {
            return Err(CodegenError::translation(
                TARGET,
                format!("gate '{}' has no base-profile intrinsic", other.name()),
            ));
        }
    })
}

fn lower_instruction(
    library: &IntrinsicLibrary,
    unit: &mut Module,
    inst: &skald_ir::Instruction,
    body: &mut Vec<String>,
) -> CodegenResult<()> {
    if !inst.controls.is_empty() {
        return Err(CodegenError::translation(
            TARGET,
            format!("'{}' carries generic controls; run expand-controls first", inst.name()),
        ));
    }
    match &inst.kind {
        InstructionKind::Gate(StandardGate::I) | InstructionKind::Barrier => {}
        InstructionKind::Gate(gate) => {
            let callee = intrinsic_for(gate)?;
            library.load_intrinsic(unit, callee)?;
            let mut args = gate
                .parameters()
                .into_iter()
                .map(double)
                .collect::<CodegenResult<Vec<_>>>()?;
            args.extend(inst.qubits.iter().map(|q| qubit(q.0)));
            body.push(format!("call void @{callee}({})", args.join(", ")));
        }
        InstructionKind::Measure => {
            library.load_intrinsic(unit, MEASURE)?;
            for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                let label = format!("r{}", c.0);
                let literal = library.gen_literal(unit, label.as_bytes())?;
                let len = label.len() + 1;
                body.push(format!("call void @{MEASURE}({}, {})", qubit(q.0), result(c.0)));
                body.push(format!(
                    "call void @{RECORD_RESULT}({}, i8* getelementptr inbounds ([{len} x i8], [{len} x i8]* @{literal}, i64 0, i64 0))",
                    result(c.0)
                ));
            }
        }
        InstructionKind::Reset => {
            let callee = "__quantum__qis__reset__body";
            library.load_intrinsic(unit, callee)?;
            for q in &inst.qubits {
                body.push(format!("call void @{callee}({})", qubit(q.0)));
            }
        }
    }
    Ok(())
}

fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 3);
    for &b in bytes {
        if (b.is_ascii_graphic() && b != b'"' && b != b'\\') || b == b' ' {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "\\{b:02X}");
        }
    }
    out.push_str("\\00");
    out
}

fn render(unit: &Module, entry: &Function, body: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "; ModuleID = '{}'", unit.name);
    let _ = writeln!(out, "source_filename = \"{}\"", unit.name);
    out.push('\n');

    let (types, decls): (Vec<&Symbol>, Vec<&Symbol>) = unit
        .symbols
        .iter()
        .filter(|s| matches!(s, Symbol::Declaration(_)))
        .partition(|s| matches!(s, Symbol::Declaration(d) if d.code.starts_with('%')));

    for symbol in &types {
        if let Symbol::Declaration(d) = symbol {
            let _ = writeln!(out, "{}", d.code);
        }
    }
    out.push('\n');

    for global in unit.globals() {
        let len = global.bytes.len() + 1;
        let _ = writeln!(
            out,
            "@{} = private constant [{len} x i8] c\"{}\"",
            global.name,
            escape(&global.bytes)
        );
    }
    out.push('\n');

    let _ = writeln!(out, "define void @{}() #0 {{", entry.name);
    out.push_str("entry:\n");
    for line in body {
        let _ = writeln!(out, "  {line}");
    }
    out.push_str("  ret void\n}\n\n");

    for symbol in &decls {
        if let Symbol::Declaration(d) = symbol {
            let _ = writeln!(out, "{}\n", d.code);
        }
    }

    let _ = writeln!(
        out,
        "attributes #0 = {{ \"entry_point\" \"qir_profiles\"=\"base_profile\" \"output_labeling_schema\"=\"schema_id\" \"required_num_qubits\"=\"{}\" \"required_num_results\"=\"{}\" }}",
        entry.num_qubits, entry.num_clbits
    );
    out.push_str("attributes #1 = { \"irreversible\" }\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use skald_ir::{ClbitId, QubitId};

    fn bell() -> Module {
        let mut f = Function::new("bell", 2, 2);
        f.h(QubitId(0)).unwrap();
        f.cx(QubitId(0), QubitId(1)).unwrap();
        f.measure(QubitId(0), ClbitId(0)).unwrap();
        f.measure(QubitId(1), ClbitId(1)).unwrap();
        f.set_entry_point();
        let mut module = Module::new("bell");
        module.push_function(f).unwrap();
        module
    }

    #[test]
    fn test_bell_program() {
        let qir = emit_qir_base(&bell(), &CodegenOptions::default()).unwrap();

        assert!(qir.contains("%Qubit = type opaque"));
        assert!(qir.contains("define void @bell() #0 {"));
        assert!(qir.contains("call void @__quantum__qis__h__body(%Qubit* null)"));
        assert!(qir.contains(
            "call void @__quantum__qis__cnot__body(%Qubit* null, %Qubit* inttoptr (i64 1 to %Qubit*))"
        ));
        assert!(qir.contains("@cstr.7230 = private constant [3 x i8] c\"r0\\00\""));
        assert!(qir.contains("@cstr.7231 = private constant [3 x i8] c\"r1\\00\""));
        assert!(qir.contains("\"required_num_results\"=\"2\""));
        assert_eq!(qir.matches("declare void @__quantum__qis__mz__body").count(), 1);
    }

    #[test]
    fn test_declarations_follow_prerequisites() {
        let qir = emit_qir_base(&bell(), &CodegenOptions::default()).unwrap();
        let record = qir.find("declare void @__quantum__rt__result_record_output").unwrap();
        let measure = qir.find("declare void @__quantum__qis__mz__body").unwrap();
        assert!(record < measure);
    }

    #[test]
    fn test_rotation_angles_are_exact() {
        let mut f = Function::new("k", 1, 0);
        f.rx(0.5, QubitId(0)).unwrap();
        f.set_entry_point();
        let mut module = Module::new("k");
        module.push_function(f).unwrap();

        let qir = emit_qir_base(&module, &CodegenOptions::default()).unwrap();
        assert!(qir.contains("call void @__quantum__qis__rx__body(double 0x3FE0000000000000, %Qubit* null)"));
    }

    #[test]
    fn test_unsupported_gate() {
        let mut f = Function::new("k", 1, 0);
        f.push(skald_ir::Instruction::gate(
            StandardGate::U3(Angle::constant(0.1), Angle::constant(0.2), Angle::constant(0.3)),
            [QubitId(0)],
        ))
        .unwrap();
        f.set_entry_point();
        let mut module = Module::new("k");
        module.push_function(f).unwrap();
        let err = emit_qir_base(&module, &CodegenOptions::default()).unwrap_err();
        assert!(err.to_string().contains("u3"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(b"a b"), "a b\\00");
        assert_eq!(escape(b"q\"\n"), "q\\22\\0A\\00");
    }
}
