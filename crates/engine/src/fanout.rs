//! Concurrent batch-write fan-out
//!
//! One scoped worker per key, joined before returning. The join is a
//! barrier: either every write succeeded, or the first failure (in key
//! order) is returned and the round fails without partial-success
//! handling.

use std::panic;
use std::thread;

use staleprobe_core::{GatewayError, StorageGateway};

/// Write `payload` under every key concurrently; first error wins.
///
/// Returns the failing key alongside the gateway error so the caller can
/// attach round context.
pub(crate) fn put_all(
    gateway: &dyn StorageGateway,
    keys: &[String],
    payload: &[u8],
) -> Result<(), (String, GatewayError)> {
    thread::scope(|scope| {
        let handles: Vec<_> = keys
            .iter()
            .map(|key| {
                scope.spawn(move || {
                    gateway
                        .put(key, payload)
                        .map_err(|source| (key.clone(), source))
                })
            })
            .collect();

        let mut first_err = None;
        for handle in handles {
            let result = handle
                .join()
                .unwrap_or_else(|cause| panic::resume_unwind(cause));
            if let Err(err) = result {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    })
}
