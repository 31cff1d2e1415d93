//! In-process transport that records batches instead of sending them.
//!
//! The loopback transport answers every artifact with all shots landing on a
//! single fixed outcome (`"0"` unless configured). It keeps a log of every
//! batch it executes so callers can inspect what a launch produced.
//!
//! Recognized configuration keys:
//!
//! - `outcome`: bitstring reported for every artifact
//! - `fail`: if present, every execution fails with this message

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::artifact::LoweredArtifact;
use crate::config::BackendConfig;
use crate::error::{HalError, HalResult};
use crate::result::{Counts, ExecutionResult, ResultSet};
use crate::transport::JobTransport;

/// Shots used when a launch does not request a count.
pub const DEFAULT_SHOTS: u32 = 1000;

/// A batch as the loopback transport received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBatch {
    /// Artifacts, in submission order.
    pub artifacts: Vec<LoweredArtifact>,
    /// Requested shots.
    pub shots: Option<u32>,
}

/// Shared log of executed batches.
#[derive(Debug, Clone, Default)]
pub struct BatchLog {
    inner: Arc<Mutex<Vec<RecordedBatch>>>,
}

impl BatchLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, batch: RecordedBatch) -> HalResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| HalError::Backend("loopback log poisoned".into()))?;
        guard.push(batch);
        Ok(())
    }

    /// Snapshot of everything recorded so far.
    pub fn batches(&self) -> Vec<RecordedBatch> {
        self.inner.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of batches recorded.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|g| g.len()).unwrap_or(0)
    }

    /// True if nothing has been executed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Transport that executes nothing and answers deterministically.
#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    log: BatchLog,
    outcome: String,
    failure: Option<String>,
}

impl LoopbackTransport {
    /// Registered name.
    pub const NAME: &'static str = "loopback";

    /// Create a transport that records into `log`.
    pub fn with_log(log: BatchLog) -> Self {
        Self {
            log,
            outcome: "0".into(),
            failure: None,
        }
    }

    /// The log this transport records into.
    pub fn log(&self) -> &BatchLog {
        &self.log
    }
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::with_log(BatchLog::new())
    }
}

#[async_trait]
impl JobTransport for LoopbackTransport {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialize(&mut self, config: &BackendConfig) -> HalResult<()> {
        if let Some(outcome) = config.get("outcome") {
            if outcome.is_empty() || !outcome.chars().all(|c| c == '0' || c == '1') {
                return Err(HalError::Configuration(format!(
                    "outcome must be a non-empty bitstring, got '{outcome}'"
                )));
            }
            self.outcome = outcome.to_string();
        }
        self.failure = config.get("fail").map(str::to_string);
        info!(backend = %config.name, outcome = %self.outcome, "loopback transport initialized");
        Ok(())
    }

    async fn execute(&self, batch: Vec<LoweredArtifact>, shots: Option<u32>) -> HalResult<ResultSet> {
        if shots == Some(0) {
            return Err(HalError::InvalidShots("shots must be positive".into()));
        }
        debug!(artifacts = batch.len(), ?shots, "loopback executing batch");

        let results: ResultSet = batch
            .iter()
            .map(|artifact| {
                let n = u64::from(shots.unwrap_or(DEFAULT_SHOTS));
                ExecutionResult::new(&artifact.label, Counts::from_pairs([(self.outcome.clone(), n)]))
            })
            .collect();

        self.log.record(RecordedBatch {
            artifacts: batch,
            shots,
        })?;

        match &self.failure {
            Some(message) => Err(HalError::JobFailed(message.clone())),
            None => Ok(results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loopback_answers_every_label() {
        let transport = LoopbackTransport::default();
        let batch = vec![
            LoweredArtifact::new("XX", "code-a"),
            LoweredArtifact::new("ZI", "code-b"),
        ];
        let results = transport.execute(batch, Some(10)).await.unwrap();

        assert_eq!(results.labels().collect::<Vec<_>>(), vec!["XX", "ZI"]);
        assert_eq!(results.get("ZI").unwrap().counts.get("0"), 10);
        assert_eq!(transport.log().len(), 1);
        assert_eq!(transport.log().batches()[0].artifacts[1].code, "code-b");
    }

    #[tokio::test]
    async fn test_loopback_configured_outcome() {
        let mut transport = LoopbackTransport::default();
        transport
            .initialize(&BackendConfig::new("loopback").with_extra("outcome", "11"))
            .unwrap();
        let results = transport
            .execute(vec![LoweredArtifact::new("k", "")], None)
            .await
            .unwrap();
        assert_eq!(results.get("k").unwrap().counts.get("11"), u64::from(DEFAULT_SHOTS));
    }

    #[tokio::test]
    async fn test_loopback_failure_still_records() {
        let mut transport = LoopbackTransport::default();
        transport
            .initialize(&BackendConfig::new("loopback").with_extra("fail", "queue closed"))
            .unwrap();
        let err = transport.execute(vec![], None).await.unwrap_err();
        assert!(matches!(err, HalError::JobFailed(_)));
        assert_eq!(transport.log().len(), 1);
    }

    #[test]
    fn test_loopback_rejects_bad_outcome() {
        let mut transport = LoopbackTransport::default();
        let err = transport
            .initialize(&BackendConfig::new("loopback").with_extra("outcome", "01x"))
            .unwrap_err();
        assert!(matches!(err, HalError::Configuration(_)));
    }
}
