//! Metric sinks and emission gating
//!
//! The probe reports violations through a [`MetricSink`]; gating lives in
//! [`GatedSink`] so the configuration flag is honoured in one place. With
//! metrics disabled, the inner sink is never called and emission always
//! succeeds, leaving round outcomes unchanged.

use std::sync::Arc;

use tracing::info;

use staleprobe_core::{MetricSink, SinkError};

/// Sink that reports measurements through the tracing pipeline
///
/// Stands in for a real telemetry backend when the probe runs locally.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MetricSink for LogSink {
    fn emit(&self, name: &str, value: f64) -> Result<(), SinkError> {
        info!(target: "probe::metrics", metric = name, value, "measurement");
        Ok(())
    }
}

/// Sink that discards every measurement
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MetricSink for NullSink {
    fn emit(&self, _name: &str, _value: f64) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Enable/disable wrapper around a shared sink
#[derive(Clone)]
pub struct GatedSink {
    inner: Arc<dyn MetricSink>,
    enabled: bool,
}

impl GatedSink {
    /// Wrap `inner`, forwarding only when `enabled`
    pub fn new(inner: Arc<dyn MetricSink>, enabled: bool) -> Self {
        GatedSink { inner, enabled }
    }

    /// A gate that drops everything without an inner sink
    pub fn disabled() -> Self {
        GatedSink {
            inner: Arc::new(NullSink),
            enabled: false,
        }
    }

    /// Whether measurements reach the inner sink
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl MetricSink for GatedSink {
    fn emit(&self, name: &str, value: f64) -> Result<(), SinkError> {
        if !self.enabled {
            return Ok(());
        }
        self.inner.emit(name, value)
    }
}

impl std::fmt::Debug for GatedSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatedSink")
            .field("enabled", &self.enabled)
            .finish()
    }
}
