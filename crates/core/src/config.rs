//! Explicit probe and run configuration
//!
//! The original tool kept bucket name, namespace, and retry bound in global
//! mutable constants; here they are plain structs passed into constructors
//! so the same core can be exercised against multiple fake backends and
//! bounds in parallel test runs.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Polling parameters shared by both verification loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Wait between the write and the first read (update mode only)
    pub initial_delay: Duration,
    /// Wait between consecutive polls of a stale key or listing
    pub poll_interval: Duration,
    /// Consistency bound: maximum stale polls before declaring
    /// non-convergence. Applies to both modes.
    pub max_attempts: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            initial_delay: Duration::ZERO,
            poll_interval: Duration::from_millis(100),
            max_attempts: 10_000,
        }
    }
}

/// Workload selector: the probe has exactly two fixed workload shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMode {
    /// Single-key update/verify
    #[default]
    Update,
    /// Batch key-set list/verify
    List,
}

impl fmt::Display for ProbeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeMode::Update => write!(f, "updateTest"),
            ProbeMode::List => write!(f, "listTest"),
        }
    }
}

/// Error returned when a mode string is not recognised
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown mode {0:?}, expected \"updateTest\" or \"listTest\"")]
pub struct ModeParseError(pub String);

impl FromStr for ProbeMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "updateTest" => Ok(ProbeMode::Update),
            "listTest" => Ok(ProbeMode::List),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}

/// Configuration for a whole probe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Which workload shape to run
    pub mode: ProbeMode,
    /// Number of rounds; `None` means run forever
    pub iterations: Option<u64>,
    /// Key written in update mode
    pub key: String,
    /// Number of keys per round in list mode
    pub batch_size: usize,
    /// When false, metric emission is a no-op
    pub metrics_enabled: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            mode: ProbeMode::Update,
            iterations: Some(1),
            key: "testKey".to_string(),
            batch_size: 100,
            metrics_enabled: true,
        }
    }
}
