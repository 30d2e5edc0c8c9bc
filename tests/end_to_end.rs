//! End-to-end runs through the facade crate
//!
//! Drives whole multi-round runs against the in-memory gateway, checking
//! the aggregate behavior a user of the published API would see.

use std::sync::Arc;

use parking_lot::Mutex;

use staleprobe::{
    ConsistencyProbe, Driver, Error, GatedSink, MemoryGateway, MetricSink, NoopWaiter,
    ProbeConfig, ProbeMode, RunConfig, SampleDigest, SinkError, StorageGateway,
};

#[derive(Default)]
struct RecordingSink {
    emitted: Mutex<Vec<(String, f64)>>,
}

impl MetricSink for RecordingSink {
    fn emit(&self, name: &str, value: f64) -> Result<(), SinkError> {
        self.emitted.lock().push((name.to_string(), value));
        Ok(())
    }
}

fn make_driver(
    gateway: Arc<dyn StorageGateway>,
    sink: Arc<dyn MetricSink>,
    run: RunConfig,
    probe_cfg: ProbeConfig,
) -> Driver {
    let metrics_enabled = run.metrics_enabled;
    let probe = ConsistencyProbe::new(gateway, GatedSink::new(sink, metrics_enabled), probe_cfg)
        .with_waiter(NoopWaiter)
        .with_digest(SampleDigest::new());
    Driver::new(probe, run)
}

#[test]
fn update_run_over_consistent_backend_is_clean() {
    let sink = Arc::new(RecordingSink::default());
    let driver = make_driver(
        Arc::new(MemoryGateway::new()),
        sink.clone(),
        RunConfig {
            iterations: Some(50),
            ..RunConfig::default()
        },
        ProbeConfig::default(),
    );

    let summary = driver.run().unwrap();
    assert_eq!(summary.rounds, 50);
    assert_eq!(summary.total_violations, 0);

    // 50 puts + 50 gets were timed.
    let latency = summary.latency.unwrap();
    assert_eq!(latency.count, 100);

    // Only the run markers reached the sink.
    let names: Vec<String> = sink.emitted.lock().iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(names, vec!["start".to_string(), "end".to_string()]);
}

#[test]
fn update_run_counts_violations_across_rounds() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.put("testKey", b"999999").unwrap();
    gateway.set_visibility_lag(2);

    let sink = Arc::new(RecordingSink::default());
    let driver = make_driver(
        gateway,
        sink.clone(),
        RunConfig {
            iterations: Some(3),
            ..RunConfig::default()
        },
        ProbeConfig::default(),
    );

    let summary = driver.run().unwrap();
    assert_eq!(summary.rounds, 3);
    // Every round's write lags by two observations.
    assert_eq!(summary.total_violations, 6);

    let violations: Vec<f64> = sink
        .emitted
        .lock()
        .iter()
        .filter(|(name, _)| name == "consistencyViolation")
        .map(|(_, value)| *value)
        .collect();
    assert_eq!(violations, vec![2.0, 2.0, 2.0]);
}

#[test]
fn list_run_with_lag_and_pagination_converges_and_cleans_up() {
    let gateway = Arc::new(MemoryGateway::with_config(staleprobe::MemoryGatewayConfig {
        visibility_lag: 0,
        page_size: 9,
    }));
    gateway.set_visibility_lag(1);

    let sink = Arc::new(RecordingSink::default());
    let driver = make_driver(
        gateway.clone(),
        sink.clone(),
        RunConfig {
            mode: ProbeMode::List,
            iterations: Some(4),
            batch_size: 30,
            ..RunConfig::default()
        },
        ProbeConfig::default(),
    );

    let summary = driver.run().unwrap();
    assert_eq!(summary.rounds, 4);
    assert!(summary.total_violations >= 4, "each round polls at least once while lagged");
    assert_eq!(gateway.key_count(), 0, "every round's keys were deleted");

    let missing_emissions = sink
        .emitted
        .lock()
        .iter()
        .filter(|(name, _)| name == "missingFromList")
        .count();
    assert!(missing_emissions >= 4);
}

#[test]
fn exhausted_run_aborts_without_end_marker() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.put("testKey", b"999999").unwrap();
    gateway.set_visibility_lag(1_000_000);

    let sink = Arc::new(RecordingSink::default());
    let driver = make_driver(
        gateway,
        sink.clone(),
        RunConfig {
            iterations: Some(10),
            ..RunConfig::default()
        },
        ProbeConfig {
            max_attempts: 3,
            ..ProbeConfig::default()
        },
    );

    let err = driver.run().unwrap_err();
    assert!(matches!(err, Error::VerificationExhausted { .. }));

    let names: Vec<String> = sink.emitted.lock().iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(names, vec!["start".to_string()], "no end marker after a fatal round");
}

#[test]
fn disabled_metrics_run_succeeds_without_sink_traffic() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.put("testKey", b"999999").unwrap();
    gateway.set_visibility_lag(3);

    let sink = Arc::new(RecordingSink::default());
    let driver = make_driver(
        gateway,
        sink.clone(),
        RunConfig {
            iterations: Some(2),
            metrics_enabled: false,
            ..RunConfig::default()
        },
        ProbeConfig::default(),
    );

    let summary = driver.run().unwrap();
    assert_eq!(summary.rounds, 2);
    assert_eq!(summary.total_violations, 6);
    assert!(sink.emitted.lock().is_empty());
}

#[test]
fn sequential_rounds_attribute_staleness_to_their_own_write() {
    // With lag 1, each round sees exactly the previous round's value once.
    let gateway = Arc::new(MemoryGateway::new());
    gateway.put("testKey", b"999999").unwrap();
    gateway.set_visibility_lag(1);

    let sink = Arc::new(RecordingSink::default());
    let driver = make_driver(
        gateway,
        sink.clone(),
        RunConfig {
            iterations: Some(5),
            ..RunConfig::default()
        },
        ProbeConfig::default(),
    );

    let summary = driver.run().unwrap();
    assert_eq!(summary.total_violations, 5);
    let per_round: Vec<f64> = sink
        .emitted
        .lock()
        .iter()
        .filter(|(name, _)| name == "consistencyViolation")
        .map(|(_, v)| *v)
        .collect();
    assert_eq!(per_round, vec![1.0; 5]);
}

#[test]
fn unbounded_run_is_expressible_in_config() {
    // No driver.run() here (it would not return); just the config contract.
    let config = RunConfig {
        iterations: None,
        ..RunConfig::default()
    };
    assert!(config.iterations.is_none());
}
