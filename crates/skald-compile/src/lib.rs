//! Skald Kernel Lowering
//!
//! Lowering stages transform a kernel [`Module`](skald_ir::Module) in place.
//! A [`PassManager`] runs them in order and reports the first failure as
//! [`CompileError::PassFailed`] naming the stage; a [`PassRegistry`] turns a
//! comma-separated pipeline string into a manager.
//!
//! # Example
//!
//! ```rust
//! use skald_compile::{PassManager, PassRegistry};
//! use skald_ir::{Function, Module, QubitId};
//!
//! let mut kernel = Function::new("bell", 2, 0);
//! kernel.h(QubitId(0)).unwrap();
//! kernel.cx(QubitId(0), QubitId(1)).unwrap();
//! let mut module = Module::new("bell");
//! module.push_function(kernel).unwrap();
//!
//! let registry = PassRegistry::with_builtins();
//! let pm = PassManager::from_pipeline("canonicalize,cz-gate-set-mapping", &registry).unwrap();
//! pm.run(&mut module).unwrap();
//!
//! assert_eq!(module.lookup_function("bell").unwrap().num_ops(), 4);
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod registry;

pub use error::{CompileError, CompileResult};
pub use manager::PassManager;
pub use pass::Pass;
pub use passes::{
    ArgumentSynthesis, Canonicalize, CzGateSetMapping, ExpandControls, KernelArgs, ObserveAnsatz,
};
pub use registry::PassRegistry;
