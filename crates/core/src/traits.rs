//! Seams for the probe's external collaborators
//!
//! The object-storage client, the metric sink, and the latency digest are
//! out of scope for the probe itself; these traits pin down the interface
//! boundary so implementations can be swapped (real backend, in-memory
//! gateway, test fakes) without touching the verification loops.

use std::time::Duration;

use crate::error::{GatewayResult, SinkError};

/// One page of a listing response
///
/// A truncated page is not a valid poll result on its own: callers must
/// follow `next` until it is `None` before treating the listing as
/// complete.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Keys on this page
    pub keys: Vec<String>,
    /// Continuation token for the next page, if the response was truncated
    pub next: Option<String>,
}

/// Put/get/list/delete against a keyed object namespace
///
/// Transport-level retry is the gateway's responsibility; the probe never
/// retries a failed operation, only polls successful-but-stale results.
///
/// Thread safety: `put` is called from concurrent batch writers, so
/// implementations must be safe to share across threads.
pub trait StorageGateway: Send + Sync {
    /// Write `value` under `key`
    ///
    /// The write must be acknowledged synchronously: once this returns
    /// `Ok`, the gateway has accepted the write and polling may begin.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected.
    fn put(&self, key: &str, value: &[u8]) -> GatewayResult<()>;

    /// Read the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the key is not found.
    fn get(&self, key: &str) -> GatewayResult<Vec<u8>>;

    /// List keys under `prefix`, one page at a time
    ///
    /// Pass `continuation` from the previous page's `next` to resume.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    fn list_prefix(&self, prefix: &str, continuation: Option<&str>) -> GatewayResult<ListPage>;

    /// Delete the given keys under `prefix`
    ///
    /// # Errors
    ///
    /// Returns an error if any deletion is rejected.
    fn delete_keys(&self, prefix: &str, keys: &[String]) -> GatewayResult<()>;
}

/// Best-effort emission of named numeric measurements
///
/// Failures are propagated, not swallowed: a sink error aborts the round.
pub trait MetricSink: Send + Sync {
    /// Emit one measurement
    ///
    /// # Errors
    ///
    /// Returns an error if the measurement could not be delivered.
    fn emit(&self, name: &str, value: f64) -> Result<(), SinkError>;
}

/// Streaming latency accumulator, consumed through a minimal interface
///
/// Written once per timed operation, read once at shutdown. The digest's
/// internal representation (trimmed mean, t-digest, plain samples) is
/// opaque to the probe.
pub trait LatencyDigest: Send {
    /// Add one latency sample
    fn record(&mut self, sample: Duration);

    /// Number of samples recorded so far
    fn count(&self) -> usize;

    /// Latency at quantile `q` in `[0.0, 1.0]`; `None` if no samples
    fn quantile(&self, q: f64) -> Option<Duration>;

    /// Mean latency; `None` if no samples
    fn mean(&self) -> Option<Duration>;
}
