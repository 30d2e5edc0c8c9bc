//! The consistency probe and its update-mode verification loop
//!
//! One probe instance is driven sequentially across rounds: round N+1
//! never starts before round N has fully resolved, so every observed
//! staleness is attributable to a specific write.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, warn};

use staleprobe_core::{
    Convergence, Error, GatewayResult, LatencyDigest, MetricSink, ProbeConfig, Result, Round,
    RoundReport, StorageGateway,
};

use crate::digest::LatencySummary;
use crate::metrics::GatedSink;
use crate::pacer::{SleepWaiter, WaitStrategy};

/// Owns the two polling state machines and the violation-reporting policy
pub struct ConsistencyProbe {
    pub(crate) gateway: Arc<dyn StorageGateway>,
    pub(crate) metrics: GatedSink,
    pub(crate) waiter: Box<dyn WaitStrategy>,
    pub(crate) digest: Option<Mutex<Box<dyn LatencyDigest>>>,
    pub(crate) config: ProbeConfig,
}

impl ConsistencyProbe {
    /// Create a probe over a gateway with a gated metric sink
    ///
    /// Defaults: wall-clock waits, no latency digest.
    pub fn new(gateway: Arc<dyn StorageGateway>, metrics: GatedSink, config: ProbeConfig) -> Self {
        ConsistencyProbe {
            gateway,
            metrics,
            waiter: Box::new(SleepWaiter),
            digest: None,
            config,
        }
    }

    /// Replace the wait strategy (tests pass a no-op waiter)
    pub fn with_waiter(mut self, waiter: impl WaitStrategy + 'static) -> Self {
        self.waiter = Box::new(waiter);
        self
    }

    /// Attach a latency digest; timed gateway operations feed it
    pub fn with_digest(mut self, digest: impl LatencyDigest + 'static) -> Self {
        self.digest = Some(Mutex::new(Box::new(digest)));
        self
    }

    /// Polling parameters in effect
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Shutdown summary of the attached digest, if populated
    pub fn latency_summary(&self) -> Option<LatencySummary> {
        let digest = self.digest.as_ref()?;
        let guard = digest.lock();
        LatencySummary::from_digest(&**guard)
    }

    /// Verify read-after-write consistency for one round
    ///
    /// Writes the round counter under `key`, waits the configured initial
    /// delay, then polls the key until the read reflects the write. Every
    /// stale read before convergence counts as one violation; when the
    /// round converges with violations, a single `consistencyViolation`
    /// measurement carries the count.
    ///
    /// # Errors
    ///
    /// Any write, read, conversion, or metric failure aborts the round.
    /// [`Error::VerificationExhausted`] means the backend never converged
    /// within the retry bound.
    pub fn verify_update(&self, key: &str, round: Round) -> Result<RoundReport> {
        debug!(target: "probe::update", round = round.as_u64(), key, "round start");

        let payload = round.payload();
        self.timed(|| self.gateway.put(key, &payload))
            .map_err(|source| Error::Write {
                key: key.to_string(),
                round,
                source,
            })?;
        self.waiter.pause(self.config.initial_delay);

        match self.poll_key(key, round)? {
            Convergence::Converged { polls } => {
                let violations = u64::from(polls - 1);
                if violations > 0 {
                    warn!(
                        target: "probe::update",
                        round = round.as_u64(),
                        key,
                        violations,
                        "consistency violation"
                    );
                    self.emit("consistencyViolation", violations as f64)?;
                }
                Ok(RoundReport {
                    round,
                    violations,
                    polls,
                })
            }
            Convergence::Exhausted { attempts } => Err(Error::VerificationExhausted {
                subject: key.to_string(),
                round,
                attempts,
            }),
        }
    }

    /// Poll `key` until it reflects `round` or the retry budget runs out
    fn poll_key(&self, key: &str, round: Round) -> Result<Convergence> {
        let expected = round.as_u64();
        let mut stale: u32 = 0;
        loop {
            let observed = self.read_round(key, round)?;
            if observed == expected {
                return Ok(Convergence::Converged { polls: stale + 1 });
            }
            stale += 1;
            if stale >= self.config.max_attempts {
                return Ok(Convergence::Exhausted { attempts: stale });
            }
            self.waiter.pause(self.config.poll_interval);
        }
    }

    /// Read `key` and parse its payload as a round counter
    fn read_round(&self, key: &str, round: Round) -> Result<u64> {
        let bytes = self
            .timed(|| self.gateway.get(key))
            .map_err(|source| Error::Read {
                key: key.to_string(),
                round,
                source,
            })?;
        let text = String::from_utf8_lossy(&bytes);
        text.parse().map_err(|_| Error::Conversion {
            key: key.to_string(),
            round,
            raw: text.into_owned(),
        })
    }

    /// Run a gateway operation, feeding its latency into the digest
    pub(crate) fn timed<T>(&self, op: impl FnOnce() -> GatewayResult<T>) -> GatewayResult<T> {
        let started = Instant::now();
        let result = op();
        if let Some(digest) = &self.digest {
            digest.lock().record(started.elapsed());
        }
        result
    }

    /// Emit a measurement through the gate, mapping sink failures
    pub(crate) fn emit(&self, name: &str, value: f64) -> Result<()> {
        self.metrics
            .emit(name, value)
            .map_err(|source| Error::Metric {
                name: name.to_string(),
                source,
            })
    }
}
