//! The job transport trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::artifact::LoweredArtifact;
use crate::config::BackendConfig;
use crate::error::HalResult;
use crate::job::{JobHandle, JobId};
use crate::result::ResultSet;

/// Carries lowered artifacts to a remote executor and brings results back.
///
/// A transport is created by the [`TransportRegistry`](crate::TransportRegistry),
/// configured once through [`initialize`](JobTransport::initialize), and then
/// shared behind an `Arc` for every launch on that target.
#[async_trait]
pub trait JobTransport: Send + Sync {
    /// Transport name as registered.
    fn name(&self) -> &str;

    /// Apply backend configuration (credentials, machine name, …).
    fn initialize(&mut self, config: &BackendConfig) -> HalResult<()>;

    /// Execute a batch of artifacts.
    ///
    /// The batch is one unit: the returned [`ResultSet`] carries a result for
    /// each artifact label, or the whole call fails.
    async fn execute(&self, batch: Vec<LoweredArtifact>, shots: Option<u32>) -> HalResult<ResultSet>;
}

/// Hand `batch` to `transport` on the current runtime and return a handle.
#[instrument(skip(transport, batch), fields(transport = transport.name(), artifacts = batch.len()))]
pub fn dispatch(
    transport: Arc<dyn JobTransport>,
    batch: Vec<LoweredArtifact>,
    shots: Option<u32>,
) -> JobHandle {
    let id = JobId::generate();
    debug!(job = %id, "dispatching batch");
    JobHandle::spawn(id, async move { transport.execute(batch, shots).await })
}
