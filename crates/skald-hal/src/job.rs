//! Job identifiers and handles to in-flight dispatches.

use std::fmt;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::error::{HalError, HalResult};
use crate::result::ResultSet;

/// Unique identifier for a dispatched job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a job ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random ID.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a batch that has been handed to a transport.
///
/// Resolving the handle yields the transport's [`ResultSet`]. Dropping it
/// detaches the job; it keeps running on the runtime.
pub struct JobHandle {
    id: JobId,
    submitted_at: DateTime<Utc>,
    task: JoinHandle<HalResult<ResultSet>>,
}

impl JobHandle {
    /// Spawn `work` on the current tokio runtime.
    ///
    /// Must be called from within a runtime context.
    pub fn spawn<F>(id: JobId, work: F) -> Self
    where
        F: Future<Output = HalResult<ResultSet>> + Send + 'static,
    {
        Self {
            id,
            submitted_at: Utc::now(),
            task: tokio::spawn(work),
        }
    }

    /// Job identifier.
    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// When the batch was handed off.
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// True once the transport has answered (successfully or not).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the transport's answer.
    pub async fn wait(self) -> HalResult<ResultSet> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(HalError::JobFailed(format!("job {} aborted: {e}", self.id))),
        }
    }
}

impl fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobHandle")
            .field("id", &self.id)
            .field("submitted_at", &self.submitted_at)
            .field("finished", &self.is_finished())
            .finish()
    }
}
