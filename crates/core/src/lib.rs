//! Core types and traits for Staleprobe
//!
//! This crate defines the foundational pieces used throughout the probe:
//! - Round: monotonically increasing round counter (the written value)
//! - KeySet: expected key set for a batch/list round
//! - RoundReport / Convergence: per-round verification outcomes
//! - ProbeConfig / RunConfig: explicit configuration passed to constructors
//! - Error: error taxonomy for probe operations
//! - Traits: seams for the external collaborators (StorageGateway,
//!   MetricSink, LatencyDigest)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{ModeParseError, ProbeConfig, ProbeMode, RunConfig};
pub use error::{Error, GatewayError, GatewayResult, Result, SinkError};
pub use traits::{LatencyDigest, ListPage, MetricSink, StorageGateway};
pub use types::{batch_key, batch_prefix, Convergence, KeySet, Round, RoundReport};
