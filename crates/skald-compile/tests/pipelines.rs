//! End-to-end pipeline behavior over the built-in stages.

use proptest::prelude::*;
use skald_compile::{
    ArgumentSynthesis, Canonicalize, CompileError, KernelArgs, ObserveAnsatz, Pass, PassManager,
    PassRegistry,
};
use skald_ir::{Angle, Function, Module, Observable, QubitId, StandardGate};

fn deuteron() -> Module {
    let mut f = Function::new("ansatz", 2, 0).with_arguments(["theta"]);
    f.x(QubitId(0)).unwrap();
    f.ry(Angle::arg("theta"), QubitId(1)).unwrap();
    f.ctrl(StandardGate::X, [QubitId(1)], [QubitId(0)]).unwrap();
    f.set_entry_point();
    let mut module = Module::new("deuteron");
    module.push_function(f).unwrap();
    module
}

#[test]
fn expand_then_map_to_cz() {
    let registry = PassRegistry::with_builtins();
    let pm = PassManager::from_pipeline("canonicalize,expand-controls,cz-gate-set-mapping", &registry)
        .unwrap();
    let mut module = deuteron();
    pm.run(&mut module).unwrap();

    let names: Vec<&str> = module
        .entry_point()
        .unwrap()
        .body
        .iter()
        .map(|i| i.name())
        .collect();
    assert_eq!(names, ["x", "ry", "h", "cz", "h"]);
}

#[test]
fn cz_mapping_without_expansion_leaves_generic_controls() {
    let registry = PassRegistry::with_builtins();
    let pm = PassManager::from_pipeline("cz-gate-set-mapping", &registry).unwrap();
    let mut module = deuteron();
    pm.run(&mut module).unwrap();
    assert_eq!(module, deuteron());
}

#[test]
fn observe_lowering_of_one_term() {
    let obs: Observable = "-2.1433 XX".parse().unwrap();
    let mut module = deuteron();

    let mut pm = PassManager::new();
    pm.add_pass(ArgumentSynthesis::new(
        "ansatz",
        KernelArgs::from([("theta".to_string(), 0.59)]),
    ));
    pm.add_pass(ObserveAnsatz::new(obs.terms()[0].symplectic.clone()));
    pm.add_pass(Canonicalize);
    pm.run(&mut module).unwrap();

    let f = module.entry_point().unwrap();
    assert!(f.arguments.is_empty());
    assert_eq!(f.num_clbits, 2);
    assert_eq!(f.body.iter().filter(|i| i.is_measure()).count(), 2);
}

#[test]
fn synthesis_failure_is_reported_as_stage_failure() {
    let mut pm = PassManager::new();
    pm.add_pass(ArgumentSynthesis::new("ansatz", KernelArgs::new()));
    let err = pm.run(&mut deuteron()).unwrap_err();
    assert!(matches!(err, CompileError::PassFailed { ref stage, .. } if stage == "argument-synthesis"));
}

fn gate_strategy() -> impl Strategy<Value = StandardGate> {
    prop_oneof![
        Just(StandardGate::H),
        Just(StandardGate::X),
        Just(StandardGate::S),
        Just(StandardGate::Sdg),
        Just(StandardGate::T),
        Just(StandardGate::Tdg),
        Just(StandardGate::I),
        (-1i32..=1).prop_map(|k| StandardGate::Rz(Angle::constant(f64::from(k) * 0.5))),
    ]
}

proptest! {
    #[test]
    fn canonicalize_is_idempotent(gates in prop::collection::vec((gate_strategy(), 0u32..2), 0..40)) {
        let mut f = Function::new("k", 2, 0);
        for (g, q) in gates {
            f.push(skald_ir::Instruction::gate(g, [QubitId(q)])).unwrap();
        }
        let mut module = Module::new("m");
        module.push_function(f).unwrap();

        Canonicalize.run(&mut module).unwrap();
        let once = module.clone();
        Canonicalize.run(&mut module).unwrap();
        prop_assert_eq!(once, module);
    }
}
