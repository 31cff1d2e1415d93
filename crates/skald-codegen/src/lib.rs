//! Skald Code Generation
//!
//! Turns lowered kernel modules into text a backend accepts.
//!
//! - [`IntrinsicLibrary`]: loads runtime declarations from a sorted static
//!   table, prerequisites first, and names read-only literals by content
//! - [`TranslationRegistry`]: target id → translator; built in are
//!   `qasm2`, `qir-base` and `ir-json`
//!
//! # Example
//!
//! ```rust
//! use skald_codegen::TranslationRegistry;
//! use skald_ir::{ClbitId, Function, Module, QubitId};
//!
//! let mut kernel = Function::new("coin", 1, 1);
//! kernel.h(QubitId(0)).unwrap();
//! kernel.measure(QubitId(0), ClbitId(0)).unwrap();
//! kernel.set_entry_point();
//! let mut module = Module::new("coin");
//! module.push_function(kernel).unwrap();
//!
//! let registry = TranslationRegistry::default();
//! let qasm = registry.translate("qasm2", &module).unwrap();
//! assert!(qasm.contains("measure q[0] -> c[0];"));
//! ```

pub mod error;
pub mod intrinsics;
pub mod qasm2;
pub mod qir;
pub mod translate;

pub use error::{CodegenError, CodegenResult};
pub use intrinsics::{
    CodegenOptions, DEFAULT_LITERAL_HASH_THRESHOLD, IntrinsicLibrary, IntrinsicRecord,
    intrinsic_table, lookup_intrinsic, table_is_sorted,
};
pub use qasm2::emit_qasm2;
pub use qir::emit_qir_base;
pub use translate::TranslationRegistry;
