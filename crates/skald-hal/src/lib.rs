//! Skald Transport Abstraction Layer
//!
//! This crate sits between the platform, which lowers kernels into target
//! code, and whatever actually executes that code. It defines:
//!
//! - [`JobTransport`]: the async trait every remote executor implements
//! - [`TransportRegistry`]: name → transport constructor lookup
//! - [`JobHandle`]: a dispatched batch that can be awaited later
//! - [`ExecutionContext`]: per-launch mode, shots and result storage
//! - [`ResultSet`]/[`Counts`]: labeled measurement results
//!
//! A [`LoopbackTransport`] is registered by default; it records batches and
//! answers deterministically, which makes the whole dispatch path testable
//! without a network.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use skald_hal::{dispatch, BackendConfig, JobTransport, LoweredArtifact, TransportRegistry};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> skald_hal::HalResult<()> {
//! let registry = TransportRegistry::with_builtins();
//! let mut transport = registry.create("loopback")?;
//! transport.initialize(&BackendConfig::new("loopback"))?;
//!
//! let batch = vec![LoweredArtifact::new("bell", "OPENQASM 2.0;")];
//! let handle = dispatch(Arc::from(transport), batch, Some(100));
//! let results = handle.wait().await?;
//! assert_eq!(results.get("bell").unwrap().counts.total_shots(), 100);
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod config;
pub mod context;
pub mod error;
pub mod job;
pub mod loopback;
pub mod registry;
pub mod result;
pub mod transport;

pub use artifact::LoweredArtifact;
pub use config::BackendConfig;
pub use context::{ExecutionContext, ExecutionMode};
pub use error::{HalError, HalResult};
pub use job::{JobHandle, JobId};
pub use loopback::{BatchLog, LoopbackTransport, RecordedBatch};
pub use registry::TransportRegistry;
pub use result::{Counts, ExecutionResult, ResultSet};
pub use transport::{JobTransport, dispatch};
