//! Round, key derivation, and per-round outcome types
//!
//! A round's written value is its counter: uniqueness of the value per
//! round is what makes staleness detectable. Batch-mode keys are derived
//! deterministically from (round, index) so rounds never collide.

use std::collections::BTreeSet;
use std::fmt;

/// One iteration of the probe, identified by a monotonically increasing
/// counter. The counter is both the value written and the value expected
/// on read-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Round(u64);

impl Round {
    /// Create a round from its counter value
    pub const fn new(counter: u64) -> Self {
        Round(counter)
    }

    /// The raw counter value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The payload written to the gateway for this round: the counter
    /// rendered as a decimal byte string.
    pub fn payload(&self) -> Vec<u8> {
        self.0.to_string().into_bytes()
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key namespace prefix for a batch round's writes
pub fn batch_prefix(round: Round) -> String {
    format!("list-test/{round}/")
}

/// Key for one item of a batch round
pub fn batch_key(round: Round, index: usize) -> String {
    format!("list-test/{round}/key-{index}")
}

/// The set of keys a batch round expects to find via listing
///
/// Built before the writes, compared against the observed listing result.
/// Fixed at round start and never mutated.
#[derive(Debug, Clone)]
pub struct KeySet {
    keys: Vec<String>,
    set: BTreeSet<String>,
}

impl KeySet {
    /// Build the expected key set for a batch round of `n` items
    pub fn for_batch(round: Round, n: usize) -> Self {
        let keys: Vec<String> = (0..n).map(|i| batch_key(round, i)).collect();
        let set = keys.iter().cloned().collect();
        KeySet { keys, set }
    }

    /// Number of expected keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if the set is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Expected keys in derivation order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Count of expected keys absent from an observed listing
    pub fn missing_from(&self, observed: &BTreeSet<String>) -> usize {
        self.set.difference(observed).count()
    }
}

/// Success summary of one verified round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    /// The round that was verified
    pub round: Round,
    /// Number of polls that observed stale data before convergence
    pub violations: u64,
    /// Total polls issued, including the one that converged
    pub polls: u32,
}

/// Tagged outcome of a bounded polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The backend converged within the bound
    Converged {
        /// Polls issued, including the one that converged
        polls: u32,
    },
    /// The retry budget ran out without convergence
    Exhausted {
        /// Stale polls observed before giving up
        attempts: u32,
    },
}
