//! Skald Local Runtime
//!
//! Qudit resource management and instruction composition for kernels that
//! run in-process instead of being shipped to a remote backend.
//!
//! - [`QuditAllocator`]: fixed pool of ids, lowest free id first
//! - [`InstructionComposer`]: queues instructions under nested adjoint and
//!   control regions and flushes them into a [`QuantumState`]
//! - [`interpret`]: streams a [`skald_ir::Function`] through a composer
//!
//! # Example
//!
//! ```rust
//! use skald_runtime::{InstructionComposer, TraceState};
//!
//! let mut composer = InstructionComposer::new(TraceState::new());
//! let q = composer.allocate(2).unwrap();
//!
//! composer.start_adjoint_region();
//! composer.apply("t", &[], &[], &[q.id], false);
//! composer.end_adjoint_region().unwrap();
//!
//! assert_eq!(composer.measure(&q).unwrap(), 0);
//! assert_eq!(composer.state().log()[1], "adj t q0");
//! composer.release(&q).unwrap();
//! assert!(!composer.leak_check());
//! ```

pub mod allocator;
pub mod composer;
pub mod error;
pub mod instruction;
pub mod interpret;
pub mod state;

pub use allocator::{DEFAULT_CAPACITY, QuditAllocator, QuditInfo};
pub use composer::{DEFAULT_OBSERVE_SHOTS, InstructionComposer, ObserveResult};
pub use error::{RuntimeError, RuntimeResult};
pub use instruction::QuditInstruction;
pub use interpret::{Interpretation, interpret};
pub use state::{QuantumState, TraceState};
