//! Per-launch execution context.

use std::fmt;

use skald_ir::Observable;

use crate::error::{HalError, HalResult};
use crate::job::JobHandle;
use crate::result::ResultSet;

/// What a launch computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Measure the kernel and return counts.
    Sample,
    /// Estimate the expectation value of an observable.
    Observe,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Sample => write!(f, "sample"),
            ExecutionMode::Observe => write!(f, "observe"),
        }
    }
}

/// State of one launch: its mode, shot count, and where its results land.
///
/// The platform owns the context between
/// `set_execution_context` and `reset_execution_context`; a launch writes
/// either `result` (synchronous) or `pending` (asynchronous).
#[derive(Debug)]
pub struct ExecutionContext {
    mode: ExecutionMode,
    observable: Option<Observable>,
    shots: Option<u32>,
    asynchronous: bool,
    result: Option<ResultSet>,
    pending: Option<JobHandle>,
}

impl ExecutionContext {
    fn with_mode(mode: ExecutionMode, observable: Option<Observable>) -> Self {
        Self {
            mode,
            observable,
            shots: None,
            asynchronous: false,
            result: None,
            pending: None,
        }
    }

    /// A sampling context.
    pub fn sample() -> Self {
        Self::with_mode(ExecutionMode::Sample, None)
    }

    /// An observe context for `observable`.
    pub fn observe(observable: Observable) -> Self {
        Self::with_mode(ExecutionMode::Observe, Some(observable))
    }

    /// Request a shot count, overriding the platform default.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Make launches store a pending handle instead of waiting.
    #[must_use]
    pub fn asynchronous(mut self) -> Self {
        self.asynchronous = true;
        self
    }

    /// Launch mode.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Observable for observe launches.
    pub fn observable(&self) -> Option<&Observable> {
        self.observable.as_ref()
    }

    /// Requested shot count.
    pub fn shots(&self) -> Option<u32> {
        self.shots
    }

    /// True if launches should not wait.
    pub fn is_asynchronous(&self) -> bool {
        self.asynchronous
    }

    /// Completed results, if a synchronous launch has stored them.
    pub fn result(&self) -> Option<&ResultSet> {
        self.result.as_ref()
    }

    /// True if an asynchronous launch has left a handle behind.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Store completed results.
    pub fn set_result(&mut self, result: ResultSet) {
        self.result = Some(result);
    }

    /// Store a pending handle.
    pub fn set_pending(&mut self, handle: JobHandle) {
        self.pending = Some(handle);
    }

    /// Take the stored results.
    pub fn take_result(&mut self) -> Option<ResultSet> {
        self.result.take()
    }

    /// Take the pending handle.
    pub fn take_pending(&mut self) -> Option<JobHandle> {
        self.pending.take()
    }

    /// Wait for a pending handle, if any, and return the stored results.
    pub async fn resolve(&mut self) -> HalResult<&ResultSet> {
        if let Some(handle) = self.pending.take() {
            self.result = Some(handle.wait().await?);
        }
        self.result
            .as_ref()
            .ok_or_else(|| HalError::JobFailed("no launch recorded in this context".into()))
    }

    /// Expectation value of the observe launch recorded in this context.
    pub fn expectation(&self) -> Option<f64> {
        let observable = self.observable.as_ref()?;
        self.result.as_ref()?.expectation(observable)
    }
}
