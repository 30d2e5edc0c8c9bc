//! Round iteration and run-level reporting
//!
//! The driver is sequential glue: it emits the start marker, calls the
//! selected verification routine once per round, and stops on the first
//! error. A single broken round stops the whole probe; there is no
//! partial-failure continuation.

use tracing::{error, info};

use staleprobe_core::{ProbeMode, Result, Round, RunConfig};

use crate::digest::LatencySummary;
use crate::probe::ConsistencyProbe;

/// Aggregate outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Rounds completed
    pub rounds: u64,
    /// Total violations observed across all rounds
    pub total_violations: u64,
    /// Latency digest summary, if a digest was attached and populated
    pub latency: Option<LatencySummary>,
}

/// Iterates the probe for N rounds (or forever)
pub struct Driver {
    probe: ConsistencyProbe,
    config: RunConfig,
}

impl Driver {
    /// Create a driver over a probe
    pub fn new(probe: ConsistencyProbe, config: RunConfig) -> Self {
        Driver { probe, config }
    }

    /// Run configuration in effect
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the configured number of rounds
    ///
    /// Emits the `start` marker, iterates rounds, then emits the `end`
    /// marker. Any round error is fatal: it is logged with context and
    /// returned without emitting the end marker.
    ///
    /// # Errors
    ///
    /// The first round-level failure, unchanged.
    pub fn run(&self) -> Result<RunSummary> {
        info!(
            target: "probe::driver",
            mode = %self.config.mode,
            iterations = ?self.config.iterations,
            key = %self.config.key,
            batch_size = self.config.batch_size,
            metrics_enabled = self.config.metrics_enabled,
            "run start"
        );
        self.probe.emit("start", 1.0)?;

        let mut rounds: u64 = 0;
        let mut total_violations: u64 = 0;

        loop {
            if let Some(limit) = self.config.iterations {
                if rounds >= limit {
                    break;
                }
            }
            let round = Round::new(rounds);

            let report = match self.config.mode {
                ProbeMode::Update => self.probe.verify_update(&self.config.key, round),
                ProbeMode::List => self.probe.verify_listing(self.config.batch_size, round),
            };
            let report = match report {
                Ok(report) => report,
                Err(err) => {
                    error!(
                        target: "probe::driver",
                        round = round.as_u64(),
                        error = %err,
                        "round failed, aborting run"
                    );
                    return Err(err);
                }
            };

            total_violations += report.violations;
            rounds += 1;
            if rounds % 100 == 0 {
                info!(target: "probe::driver", rounds, total_violations, "progress");
            }
        }

        self.probe.emit("end", 1.0)?;
        let latency = self.probe.latency_summary();
        info!(
            target: "probe::driver",
            rounds,
            total_violations,
            "run complete"
        );
        Ok(RunSummary {
            rounds,
            total_violations,
            latency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::SampleDigest;
    use crate::metrics::{GatedSink, NullSink};
    use crate::pacer::NoopWaiter;
    use parking_lot::Mutex;
    use staleprobe_core::{MetricSink, ProbeConfig, SinkError, StorageGateway};
    use staleprobe_gateway::MemoryGateway;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingSink {
        emitted: Mutex<Vec<(String, f64)>>,
    }

    impl MetricSink for RecordingSink {
        fn emit(&self, name: &str, value: f64) -> std::result::Result<(), SinkError> {
            self.emitted.lock().push((name.to_string(), value));
            Ok(())
        }
    }

    fn driver_with(
        gateway: Arc<dyn StorageGateway>,
        sink: Arc<dyn MetricSink>,
        config: RunConfig,
    ) -> Driver {
        let metrics_enabled = config.metrics_enabled;
        let probe = ConsistencyProbe::new(
            gateway,
            GatedSink::new(sink, metrics_enabled),
            ProbeConfig::default(),
        )
        .with_waiter(NoopWaiter);
        Driver::new(probe, config)
    }

    #[test]
    fn run_emits_start_and_end_markers() {
        let sink = Arc::new(RecordingSink::default());
        let driver = driver_with(
            Arc::new(MemoryGateway::new()),
            sink.clone(),
            RunConfig {
                iterations: Some(3),
                ..RunConfig::default()
            },
        );

        let summary = driver.run().unwrap();
        assert_eq!(summary.rounds, 3);
        assert_eq!(summary.total_violations, 0);

        let emitted = sink.emitted.lock();
        assert_eq!(emitted.first().unwrap().0, "start");
        assert_eq!(emitted.last().unwrap().0, "end");
    }

    #[test]
    fn run_with_zero_iterations_only_emits_markers() {
        let sink = Arc::new(RecordingSink::default());
        let driver = driver_with(
            Arc::new(MemoryGateway::new()),
            sink.clone(),
            RunConfig {
                iterations: Some(0),
                ..RunConfig::default()
            },
        );

        let summary = driver.run().unwrap();
        assert_eq!(summary.rounds, 0);
        assert_eq!(
            sink.emitted
                .lock()
                .iter()
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>(),
            vec!["start", "end"]
        );
    }

    #[test]
    fn list_mode_cleans_up_between_rounds() {
        let gateway = Arc::new(MemoryGateway::new());
        let driver = driver_with(
            gateway.clone(),
            Arc::new(NullSink),
            RunConfig {
                mode: staleprobe_core::ProbeMode::List,
                iterations: Some(2),
                batch_size: 10,
                ..RunConfig::default()
            },
        );

        let summary = driver.run().unwrap();
        assert_eq!(summary.rounds, 2);
        assert_eq!(gateway.key_count(), 0, "cleanup must delete every round's keys");
    }

    #[test]
    fn summary_includes_latency_when_digest_attached() {
        let probe = ConsistencyProbe::new(
            Arc::new(MemoryGateway::new()),
            GatedSink::disabled(),
            ProbeConfig::default(),
        )
        .with_waiter(NoopWaiter)
        .with_digest(SampleDigest::new());
        let driver = Driver::new(
            probe,
            RunConfig {
                iterations: Some(2),
                metrics_enabled: false,
                ..RunConfig::default()
            },
        );

        let summary = driver.run().unwrap();
        let latency = summary.latency.expect("digest was attached");
        // Two rounds of one put and one get each.
        assert_eq!(latency.count, 4);
    }
}
