//! Registry-to-result dispatch through the loopback transport.

use std::sync::Arc;

use skald_hal::{
    BackendConfig, BatchLog, ExecutionContext, HalError, JobTransport, LoopbackTransport,
    LoweredArtifact, TransportRegistry, dispatch,
};

fn batch() -> Vec<LoweredArtifact> {
    vec![
        LoweredArtifact::new("ZI", "OPENQASM 2.0;"),
        LoweredArtifact::new("XX", "OPENQASM 2.0;"),
    ]
}

fn configured(log: &BatchLog, config: &BackendConfig) -> Arc<dyn JobTransport> {
    let log = log.clone();
    let mut registry = TransportRegistry::new();
    registry.register_factory(LoopbackTransport::NAME, move || {
        Box::new(LoopbackTransport::with_log(log.clone()))
    });
    let mut transport = registry.create(LoopbackTransport::NAME).unwrap();
    transport.initialize(config).unwrap();
    Arc::from(transport)
}

#[tokio::test]
async fn test_dispatch_returns_result_per_label() {
    let log = BatchLog::new();
    let transport = configured(&log, &BackendConfig::new("loopback").with_extra("outcome", "10"));

    let handle = dispatch(transport, batch(), Some(64));
    let results = handle.wait().await.unwrap();

    assert_eq!(results.labels().collect::<Vec<_>>(), ["ZI", "XX"]);
    assert_eq!(results.get("XX").unwrap().counts.get("10"), 64);
    assert_eq!(log.len(), 1);
    assert_eq!(log.batches()[0].artifacts.len(), 2);
}

#[tokio::test]
async fn test_failed_batch_reports_job_failure() {
    let log = BatchLog::new();
    let transport = configured(&log, &BackendConfig::new("loopback").with_extra("fail", "queue closed"));

    let err = dispatch(transport, batch(), None).wait().await.unwrap_err();
    assert!(matches!(err, HalError::JobFailed(ref m) if m.contains("queue closed")));
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn test_pending_handle_resolves_through_context() {
    let log = BatchLog::new();
    let transport = configured(&log, &BackendConfig::new("loopback").with_extra("outcome", "1"));

    let observable = "2.0 I + 0.5 X".parse().unwrap();
    let mut ctx = ExecutionContext::observe(observable).asynchronous();
    ctx.set_pending(dispatch(
        transport,
        vec![LoweredArtifact::new("X", "")],
        Some(10),
    ));

    let results = ctx.resolve().await.unwrap();
    assert_eq!(results.len(), 1);
    // outcome "1" has odd parity
    assert!((ctx.expectation().unwrap() - 1.5).abs() < 1e-12);
}
