//! Skald Remote Platform
//!
//! Connects kernels to a remote backend. A [`RemoteQpu`] is pointed at a
//! backend with a selector string, reads the backend's
//! [`TargetDescriptor`] from the platform directory, lowers kernels through
//! the descriptor's pipeline and translation target, and hands the
//! resulting artifacts to the backend's transport.
//!
//! # Example
//!
//! ```rust,no_run
//! use skald_hal::ExecutionContext;
//! use skald_platform::{KernelRegistry, PlatformConfig, RemoteQpu};
//!
//! # async fn run(kernels: KernelRegistry) -> skald_platform::PlatformResult<()> {
//! let mut qpu = RemoteQpu::new(PlatformConfig::from_env(), kernels);
//! qpu.set_target_backend("loopback;outcome;11")?;
//! qpu.set_execution_context(ExecutionContext::sample().with_shots(100));
//! qpu.launch_kernel("bell", None).await?;
//!
//! let ctx = qpu.reset_execution_context().unwrap();
//! println!("{:?}", ctx.result());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod kernels;
pub mod qpu;
pub mod selector;

pub use config::{PLATFORM_DIR_ENV, PlatformConfig};
pub use descriptor::{BASELINE_PIPELINE, EMISSION_KEY, LOWERING_KEY, TargetDescriptor};
pub use error::{ConfigError, PlatformError, PlatformResult};
pub use kernels::KernelRegistry;
pub use qpu::RemoteQpu;
pub use selector::BackendSelector;
