//! Error types for the consistency probe
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every probe error is terminal for the current round and for the run as a
//! whole: the only retrying the probe performs is the staleness-polling loop
//! itself, which is a verification mechanism, not error recovery.

use crate::types::Round;
use std::io;
use thiserror::Error;

/// Result type alias for probe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for storage gateway operations
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Error surfaced by a storage gateway implementation
///
/// Gateway errors carry no round context; the probe wraps them into
/// [`Error`] variants that name the operation, key, and round.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// I/O error (network, file-backed gateways)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Key does not exist (or is not yet visible)
    #[error("key not found: {0}")]
    NotFound(String),

    /// Backend-specific failure
    #[error("backend error: {0}")]
    Backend(String),
}

/// Error surfaced by a metric sink implementation
#[derive(Debug, Error)]
#[error("metric sink error: {0}")]
pub struct SinkError(pub String);

/// Error taxonomy for the consistency probe
///
/// Each variant carries enough context (operation, key or prefix, round)
/// to diagnose which round and which operation failed.
#[derive(Debug, Error)]
pub enum Error {
    /// A write to the gateway failed
    #[error("PUT failed for key {key:?} in round {round}: {source}")]
    Write {
        /// Key being written
        key: String,
        /// Round the write belonged to
        round: Round,
        /// Underlying gateway failure
        source: GatewayError,
    },

    /// A read from the gateway failed
    #[error("GET failed for key {key:?} in round {round}: {source}")]
    Read {
        /// Key being read
        key: String,
        /// Round the read belonged to
        round: Round,
        /// Underlying gateway failure
        source: GatewayError,
    },

    /// A listing operation failed
    #[error("LIST failed for prefix {prefix:?} in round {round}: {source}")]
    List {
        /// Prefix being listed
        prefix: String,
        /// Round the listing belonged to
        round: Round,
        /// Underlying gateway failure
        source: GatewayError,
    },

    /// A cleanup deletion failed
    #[error("DELETE failed for prefix {prefix:?} in round {round}: {source}")]
    Delete {
        /// Prefix whose keys were being deleted
        prefix: String,
        /// Round the cleanup belonged to
        round: Round,
        /// Underlying gateway failure
        source: GatewayError,
    },

    /// A stored value was not parseable as the expected round number
    #[error("stored value for key {key:?} in round {round} is not a round number: {raw:?}")]
    Conversion {
        /// Key whose value failed to parse
        key: String,
        /// Round being verified
        round: Round,
        /// Raw stored bytes, lossily decoded
        raw: String,
    },

    /// Emitting a measurement to the metric sink failed
    #[error("failed to emit metric {name:?}: {source}")]
    Metric {
        /// Metric name
        name: String,
        /// Underlying sink failure
        source: SinkError,
    },

    /// The retry budget was exhausted without convergence
    ///
    /// This is a hard verification failure, not merely a violation: the
    /// backend never converged within the bound, distinguishing
    /// "eventually consistent" from "broken".
    #[error("verification exhausted after {attempts} attempts for {subject:?} in round {round}")]
    VerificationExhausted {
        /// Key (update mode) or prefix (list mode) that never converged
        subject: String,
        /// Round that failed to converge
        round: Round,
        /// Number of stale polls observed before giving up
        attempts: u32,
    },
}
