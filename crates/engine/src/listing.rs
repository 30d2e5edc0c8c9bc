//! List-mode verification: batch fan-out, listing poll, cleanup
//!
//! The batch's expected key set is fixed before any write; the listing
//! poll drains continuation pages every time, so a truncated intermediate
//! response is never mistaken for a converged one.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use staleprobe_core::{batch_prefix, Convergence, Error, KeySet, Result, Round, RoundReport};

use crate::fanout;
use crate::probe::ConsistencyProbe;

impl ConsistencyProbe {
    /// Verify list-after-write consistency for one batch round
    ///
    /// Writes `batch_size` marker objects concurrently under the round's
    /// prefix, then polls the listing until every expected key is
    /// observed. Each poll that misses keys emits one `missingFromList`
    /// measurement carrying the omission count. On convergence, the
    /// round's keys are deleted before returning.
    ///
    /// # Errors
    ///
    /// Any write, list, metric, or delete failure aborts the round.
    /// [`Error::VerificationExhausted`] means the listing never became
    /// complete within the retry bound.
    pub fn verify_listing(&self, batch_size: usize, round: Round) -> Result<RoundReport> {
        let expected = KeySet::for_batch(round, batch_size);
        let prefix = batch_prefix(round);
        debug!(
            target: "probe::list",
            round = round.as_u64(),
            batch_size,
            prefix,
            "round start"
        );

        fanout::put_all(self.gateway.as_ref(), expected.keys(), b"1").map_err(
            |(key, source)| Error::Write { key, round, source },
        )?;

        match self.poll_listing(&prefix, &expected, round)? {
            Convergence::Converged { polls } => {
                self.gateway
                    .delete_keys(&prefix, expected.keys())
                    .map_err(|source| Error::Delete {
                        prefix: prefix.clone(),
                        round,
                        source,
                    })?;
                Ok(RoundReport {
                    round,
                    violations: u64::from(polls - 1),
                    polls,
                })
            }
            Convergence::Exhausted { attempts } => Err(Error::VerificationExhausted {
                subject: prefix,
                round,
                attempts,
            }),
        }
    }

    /// Poll the listing until no expected key is missing or the retry
    /// budget runs out
    fn poll_listing(
        &self,
        prefix: &str,
        expected: &KeySet,
        round: Round,
    ) -> Result<Convergence> {
        let mut stale: u32 = 0;
        loop {
            let observed = self.drain_listing(prefix, round)?;
            let missing = expected.missing_from(&observed);
            if missing == 0 {
                return Ok(Convergence::Converged { polls: stale + 1 });
            }

            warn!(
                target: "probe::list",
                round = round.as_u64(),
                prefix,
                missing,
                "listing omits expected keys"
            );
            self.emit("missingFromList", missing as f64)?;

            stale += 1;
            if stale >= self.config.max_attempts {
                return Ok(Convergence::Exhausted { attempts: stale });
            }
            self.waiter.pause(self.config.poll_interval);
        }
    }

    /// One complete listing poll: follow continuation tokens until the
    /// response is exhausted
    fn drain_listing(&self, prefix: &str, round: Round) -> Result<BTreeSet<String>> {
        let mut observed = BTreeSet::new();
        let mut continuation: Option<String> = None;
        loop {
            let page = self
                .timed(|| self.gateway.list_prefix(prefix, continuation.as_deref()))
                .map_err(|source| Error::List {
                    prefix: prefix.to_string(),
                    round,
                    source,
                })?;
            observed.extend(page.keys);
            match page.next {
                Some(token) => continuation = Some(token),
                None => return Ok(observed),
            }
        }
    }
}
