//! Local execution of a kernel function through the composer.

use std::collections::BTreeMap;

use skald_ir::{Angle, Function, InstructionKind, StandardGate};
use tracing::{debug, instrument};

use crate::allocator::QuditInfo;
use crate::composer::InstructionComposer;
use crate::error::{RuntimeError, RuntimeResult};
use crate::state::QuantumState;

/// What a local run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    /// Measured level per classical bit; `None` if never written.
    pub clbits: Vec<Option<usize>>,
    /// True if qudits were still allocated at teardown.
    pub leaked: bool,
}

impl Interpretation {
    /// Measured bits as a string, clbit 0 first; unwritten bits print `-`.
    pub fn bitstring(&self) -> String {
        self.clbits
            .iter()
            .map(|b| match b {
                Some(v) => char::from_digit(u32::try_from(*v).unwrap_or(u32::MAX), 36).unwrap_or('?'),
                None => '-',
            })
            .collect()
    }
}

/// Run `function` on `composer`, one qubit per function qubit.
///
/// Symbolic angles are resolved from `args`. Every qudit allocated for the
/// run is released before returning.
#[instrument(skip(function, args, composer), fields(kernel = %function.name))]
pub fn interpret<S: QuantumState>(
    function: &Function,
    args: &BTreeMap<String, f64>,
    composer: &mut InstructionComposer<S>,
) -> RuntimeResult<Interpretation> {
    let mut qudits = Vec::with_capacity(function.num_qubits as usize);
    for _ in 0..function.num_qubits {
        match composer.allocate(2) {
            Ok(qudit) => qudits.push(qudit),
            Err(e) => {
                for qudit in &qudits {
                    composer.release(qudit)?;
                }
                return Err(e);
            }
        }
    }
    let mut clbits = vec![None; function.num_clbits as usize];

    let run = execute_body(function, args, composer, &qudits, &mut clbits);

    for qudit in &qudits {
        composer.release(qudit)?;
    }
    run?;

    let leaked = composer.leak_check();
    debug!(ops = function.num_ops(), leaked, "kernel interpreted");
    Ok(Interpretation { clbits, leaked })
}

fn execute_body<S: QuantumState>(
    function: &Function,
    args: &BTreeMap<String, f64>,
    composer: &mut InstructionComposer<S>,
    qudits: &[QuditInfo],
    clbits: &mut [Option<usize>],
) -> RuntimeResult<()> {
    let lookup = |q: skald_ir::QubitId| -> RuntimeResult<QuditInfo> {
        qudits.get(q.index()).copied().ok_or_else(|| {
            RuntimeError::Interpretation(format!("{q} is outside the kernel's register"))
        })
    };

    for instruction in &function.body {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let controls = instruction
                    .controls
                    .iter()
                    .map(|&q| lookup(q).map(|i| i.id))
                    .collect::<RuntimeResult<Vec<_>>>()?;
                let targets = instruction
                    .qubits
                    .iter()
                    .map(|&q| lookup(q).map(|i| i.id))
                    .collect::<RuntimeResult<Vec<_>>>()?;
                apply_gate(composer, gate, args, &controls, &targets)?;
            }
            InstructionKind::Measure => {
                for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    let outcome = composer.measure(&lookup(*q)?)?;
                    let slot = clbits.get_mut(c.index()).ok_or_else(|| {
                        RuntimeError::Interpretation(format!("{c} is outside the kernel's register"))
                    })?;
                    *slot = Some(outcome);
                }
            }
            InstructionKind::Reset => {
                for q in &instruction.qubits {
                    let qudit = lookup(*q)?;
                    if composer.measure(&qudit)? != 0 {
                        composer.apply("x", &[], &[], &[qudit.id], false);
                    }
                }
            }
            InstructionKind::Barrier => composer.synchronize()?,
        }
    }
    composer.synchronize()
}

fn resolve(angle: &Angle, args: &BTreeMap<String, f64>) -> RuntimeResult<f64> {
    angle.bind(args).as_f64().ok_or_else(|| {
        RuntimeError::Interpretation(format!(
            "angle {angle} depends on unbound arguments {:?}",
            angle.arguments()
        ))
    })
}

fn apply_gate<S: QuantumState>(
    composer: &mut InstructionComposer<S>,
    gate: &StandardGate,
    args: &BTreeMap<String, f64>,
    controls: &[usize],
    targets: &[usize],
) -> RuntimeResult<()> {
    let params = gate
        .parameters()
        .into_iter()
        .map(|a| resolve(a, args))
        .collect::<RuntimeResult<Vec<f64>>>()?;

    // Named controlled gates become their base gate with leading controls.
    let (name, adjoint, split) = match gate {
        StandardGate::Sdg => ("s", true, 0),
        StandardGate::Tdg => ("t", true, 0),
        StandardGate::CX => ("x", false, 1),
        StandardGate::CZ => ("z", false, 1),
        StandardGate::CCX => ("x", false, 2),
        other => (other.name(), false, 0),
    };
    let (extra_controls, targets) = targets.split_at(split.min(targets.len()));
    let controls: Vec<usize> = controls.iter().chain(extra_controls).copied().collect();

    composer.apply(name, &params, &controls, targets, adjoint);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TraceState;
    use skald_ir::{ClbitId, QubitId};

    #[test]
    fn test_exhausted_pool_releases_partial_allocation() {
        let f = Function::new("wide", 3, 0);
        let mut composer = InstructionComposer::with_capacity(TraceState::new(), 2);

        let err = interpret(&f, &BTreeMap::new(), &mut composer).unwrap_err();
        assert!(matches!(err, RuntimeError::ResourceExhausted { capacity: 2 }));
        assert_eq!(composer.allocator().num_allocated(), 0);
        assert!(!composer.leak_check());
    }

    #[test]
    fn test_interpret_bell() {
        let mut f = Function::new("bell", 2, 2);
        f.h(QubitId(0)).unwrap();
        f.cx(QubitId(0), QubitId(1)).unwrap();
        f.measure(QubitId(0), ClbitId(0)).unwrap();
        f.measure(QubitId(1), ClbitId(1)).unwrap();

        let mut composer = InstructionComposer::new(TraceState::new());
        let run = interpret(&f, &BTreeMap::new(), &mut composer).unwrap();

        assert_eq!(run.bitstring(), "00");
        assert!(!run.leaked);
        assert_eq!(
            composer.state().log(),
            [
                "alloc q0",
                "alloc q1",
                "h q0",
                "x [q0] q1",
                "measure q0 -> 0",
                "measure q1 -> 0",
                "release q0",
                "release q1",
            ]
        );
    }

    #[test]
    fn test_interpret_binds_arguments() {
        let mut f = Function::new("rot", 1, 0).with_arguments(["theta"]);
        f.ry(Angle::arg("theta"), QubitId(0)).unwrap();

        let mut composer = InstructionComposer::new(TraceState::new());
        let args = BTreeMap::from([("theta".to_string(), 0.25)]);
        interpret(&f, &args, &mut composer).unwrap();
        assert!(composer.state().log().contains(&"ry(0.250000) q0".to_string()));
    }

    #[test]
    fn test_interpret_unbound_argument_releases_qudits() {
        let mut f = Function::new("rot", 1, 0).with_arguments(["theta"]);
        f.rx(Angle::arg("theta"), QubitId(0)).unwrap();

        let mut composer = InstructionComposer::new(TraceState::new());
        let err = interpret(&f, &BTreeMap::new(), &mut composer).unwrap_err();
        assert!(matches!(err, RuntimeError::Interpretation(_)));
        assert!(!composer.allocator().leak_check());
    }

    #[test]
    fn test_interpret_adjoint_gates() {
        let mut f = Function::new("phase", 1, 0);
        f.push(skald_ir::Instruction::gate(StandardGate::Tdg, [QubitId(0)]))
            .unwrap();
        let mut composer = InstructionComposer::new(TraceState::new());
        interpret(&f, &BTreeMap::new(), &mut composer).unwrap();
        assert!(composer.state().log().contains(&"adj t q0".to_string()));
    }
}
