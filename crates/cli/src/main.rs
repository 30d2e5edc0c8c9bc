//! Staleprobe CLI, running the probe against the in-memory gateway.
//!
//! Exit behavior: any round-level error terminates the process with a
//! non-zero status after logging the error; no partial-results exit code
//! distinction is made.

mod commands;

use std::process;
use std::sync::Arc;
use std::time::Duration;

use tracing::error;
use tracing_subscriber::EnvFilter;

use staleprobe_core::{ProbeConfig, ProbeMode, RunConfig, StorageGateway};
use staleprobe_engine::{ConsistencyProbe, Driver, GatedSink, LogSink, SampleDigest};
use staleprobe_gateway::{MemoryGateway, MemoryGatewayConfig};

use commands::build_cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = build_cli().get_matches();

    let mode = match matches
        .get_one::<String>("mode")
        .map(String::as_str)
        .unwrap_or("updateTest")
        .parse::<ProbeMode>()
    {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };

    let iterations = match *matches.get_one::<i64>("iterations").unwrap_or(&1) {
        n if n < 0 => None,
        n => Some(n as u64),
    };

    let run_config = RunConfig {
        mode,
        iterations,
        key: matches
            .get_one::<String>("key")
            .cloned()
            .unwrap_or_else(|| "testKey".to_string()),
        batch_size: *matches.get_one::<usize>("n_list").unwrap_or(&100),
        metrics_enabled: *matches.get_one::<bool>("cw").unwrap_or(&true),
    };

    let probe_config = ProbeConfig {
        initial_delay: Duration::from_millis(*matches.get_one::<u64>("delay").unwrap_or(&0)),
        ..ProbeConfig::default()
    };

    let visibility_lag = *matches.get_one::<u64>("lag").unwrap_or(&0);
    let gateway = Arc::new(MemoryGateway::with_config(MemoryGatewayConfig {
        visibility_lag: 0,
        page_size: *matches.get_one::<usize>("page-size").unwrap_or(&1000),
    }));
    if visibility_lag > 0 {
        // A lagged fresh key reads as NotFound, which is fatal by contract;
        // seed the update key with a sentinel that parses but never matches
        // a round counter the run can reach.
        if run_config.mode == ProbeMode::Update {
            if let Err(e) = StorageGateway::put(
                gateway.as_ref(),
                &run_config.key,
                u64::MAX.to_string().as_bytes(),
            ) {
                error!(target: "probe::driver", error = %e, "failed to seed update key");
                process::exit(1);
            }
        }
        gateway.set_visibility_lag(visibility_lag);
    }

    let probe = ConsistencyProbe::new(
        gateway,
        GatedSink::new(Arc::new(LogSink), run_config.metrics_enabled),
        probe_config,
    )
    .with_digest(SampleDigest::new());

    let driver = Driver::new(probe, run_config);
    match driver.run() {
        Ok(summary) => {
            println!(
                "rounds: {}, total violations: {}",
                summary.rounds, summary.total_violations
            );
            if let Some(latency) = summary.latency {
                println!("{latency}");
            }
        }
        Err(e) => {
            error!(target: "probe::driver", error = %e, "probe run failed");
            process::exit(1);
        }
    }
}
