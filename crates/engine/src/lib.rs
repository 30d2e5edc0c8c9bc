//! Staleprobe engine: the consistency-verification loops
//!
//! [`ConsistencyProbe`] owns the two polling state machines:
//! - update mode: write a round counter, poll the key until the read
//!   reflects it, counting stale polls as violations;
//! - list mode: fan out a batch of concurrent writes, poll the listing
//!   until every expected key is observed, counting omissions.
//!
//! [`Driver`] iterates the probe across rounds and aggregates the run
//! summary. Everything else (wait strategy, digest, metric gating) exists
//! so the loops stay deterministic under test.

#![warn(clippy::all)]

pub mod digest;
pub mod driver;
mod fanout;
mod listing;
pub mod metrics;
pub mod pacer;
pub mod probe;

pub use digest::{LatencySummary, SampleDigest};
pub use driver::{Driver, RunSummary};
pub use metrics::{GatedSink, LogSink, NullSink};
pub use pacer::{NoopWaiter, SleepWaiter, WaitStrategy};
pub use probe::ConsistencyProbe;
