//! Staleprobe: an eventual-consistency probe for object-storage backends
//!
//! Staleprobe repeatedly writes a known value under a key, immediately
//! reads it back, and measures how often (and for how long) the read
//! returns a stale value, quantifying the read-after-write and
//! list-after-write consistency windows of a storage backend.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use staleprobe::{
//!     ConsistencyProbe, Driver, GatedSink, LogSink, MemoryGateway,
//!     ProbeConfig, RunConfig,
//! };
//!
//! let gateway = Arc::new(MemoryGateway::new());
//! let probe = ConsistencyProbe::new(
//!     gateway,
//!     GatedSink::new(Arc::new(LogSink), true),
//!     ProbeConfig::default(),
//! );
//! let driver = Driver::new(probe, RunConfig::default());
//! let summary = driver.run().expect("probe run failed");
//! assert_eq!(summary.total_violations, 0);
//! ```
//!
//! # Architecture
//!
//! The verification loops live in [`ConsistencyProbe`]; [`Driver`]
//! iterates them across rounds. External collaborators (the storage
//! backend, the metric sink, and the latency digest) are consumed
//! through the [`StorageGateway`], [`MetricSink`], and [`LatencyDigest`]
//! traits.

// Re-export the public API from the member crates
pub use staleprobe_core::*;
pub use staleprobe_engine::{
    ConsistencyProbe, Driver, GatedSink, LatencySummary, LogSink, NoopWaiter, NullSink,
    RunSummary, SampleDigest, SleepWaiter, WaitStrategy,
};
pub use staleprobe_gateway::{MemoryGateway, MemoryGatewayConfig};
