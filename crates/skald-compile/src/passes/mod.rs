//! Built-in lowering stages.
//!
//! Registered by name in [`PassRegistry::with_builtins`](crate::PassRegistry::with_builtins):
//! - [`Canonicalize`]: constant folding and local cancellation
//! - [`CzGateSetMapping`]: rewrite `cx` into `h`/`cz`/`h`
//! - [`ExpandControls`]: turn generic controls into named controlled gates
//!
//! Constructed directly, since they carry per-run data:
//! - [`ObserveAnsatz`]: basis rotations and measurements for one Pauli term
//! - [`ArgumentSynthesis`]: substitute concrete kernel arguments

mod canonicalize;
mod controls;
mod gate_set;
mod observe;
mod synthesis;

pub use canonicalize::Canonicalize;
pub use controls::ExpandControls;
pub use gate_set::CzGateSetMapping;
pub use observe::ObserveAnsatz;
pub use synthesis::{ArgumentSynthesis, KernelArgs};
