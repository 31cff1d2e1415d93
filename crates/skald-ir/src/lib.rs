//! Skald Kernel Intermediate Representation
//!
//! This crate holds the data structures every other Skald crate passes
//! around: the kernel [`Module`] that lowering stages transform and
//! translators emit, and the [`Observable`] whose terms drive both remote
//! observe launches and local expectation measurement.
//!
//! # Core Components
//!
//! - **Addressing**: [`QubitId`], [`ClbitId`]
//! - **Angles**: [`Angle`]: constants or expressions over kernel arguments
//! - **Gates**: [`StandardGate`], with adjoints
//! - **Instructions**: [`Instruction`] with generic controls
//! - **Functions**: [`Function`]: register sizes, arguments, body
//! - **Modules**: [`Module`]: ordered symbol table with a JSON text form
//! - **Observables**: [`Observable`], [`PauliTerm`] in symplectic form
//!
//! # Example: Building a Kernel
//!
//! ```rust
//! use skald_ir::{Angle, Function, Module, QubitId};
//!
//! let mut ansatz = Function::new("ansatz", 2, 0).with_arguments(["theta"]);
//! ansatz.x(QubitId(0)).unwrap();
//! ansatz.ry(Angle::arg("theta"), QubitId(1)).unwrap();
//! ansatz.cx(QubitId(1), QubitId(0)).unwrap();
//!
//! let mut module = Module::new("deuteron");
//! module.push_function(ansatz).unwrap();
//!
//! let text = module.to_text().unwrap();
//! assert_eq!(Module::from_text(&text).unwrap(), module);
//! ```

pub mod error;
pub mod function;
pub mod gate;
pub mod instruction;
pub mod module;
pub mod observable;
pub mod parameter;
pub mod qubit;

pub use error::{IrError, IrResult};
pub use function::{ENTRY_POINT_ATTR, Function};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use module::{Declaration, GlobalConstant, Module, Symbol};
pub use observable::{Observable, PauliOp, PauliTerm};
pub use parameter::Angle;
pub use qubit::{ClbitId, QubitId};
