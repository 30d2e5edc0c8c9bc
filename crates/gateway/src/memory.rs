//! Eventually consistent in-memory gateway
//!
//! Visibility is modeled with an observation clock rather than wall time:
//! every `get` and every `list_prefix` page advances the clock by one, and
//! a write becomes visible once the clock has advanced `visibility_lag`
//! observations past the write. Lag zero gives a strongly consistent
//! store; lag K makes exactly K polls see the pre-write state, which is
//! what the probe's staleness-counting tests rely on.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use staleprobe_core::{GatewayError, GatewayResult, ListPage, StorageGateway};

/// Tunables for [`MemoryGateway`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryGatewayConfig {
    /// Observations (gets or listing pages) a write stays invisible for
    pub visibility_lag: u64,
    /// Maximum keys per listing page
    pub page_size: usize,
}

impl Default for MemoryGatewayConfig {
    fn default() -> Self {
        MemoryGatewayConfig {
            visibility_lag: 0,
            page_size: 1000,
        }
    }
}

/// One stored version of an object
#[derive(Debug, Clone)]
struct Version {
    value: Vec<u8>,
    visible_at: u64,
}

#[derive(Debug, Default)]
struct State {
    /// Versions per key, in write order (visible_at is monotonic per key)
    objects: BTreeMap<String, Vec<Version>>,
    /// Observation clock: advanced by each get and each listing page
    clock: u64,
    visibility_lag: u64,
}

/// In-memory [`StorageGateway`] with configurable eventual consistency
#[derive(Debug)]
pub struct MemoryGateway {
    state: Mutex<State>,
    page_size: usize,
}

impl MemoryGateway {
    /// Create a strongly consistent gateway (lag zero, default paging)
    pub fn new() -> Self {
        Self::with_config(MemoryGatewayConfig::default())
    }

    /// Create a gateway with explicit lag and paging
    pub fn with_config(config: MemoryGatewayConfig) -> Self {
        MemoryGateway {
            state: Mutex::new(State {
                objects: BTreeMap::new(),
                clock: 0,
                visibility_lag: config.visibility_lag,
            }),
            page_size: config.page_size.max(1),
        }
    }

    /// Change the visibility lag for subsequent writes
    ///
    /// Earlier writes keep the visibility they were given. Useful for
    /// seeding a key through a lag-free `put` before making the store
    /// misbehave.
    pub fn set_visibility_lag(&self, lag: u64) {
        self.state.lock().visibility_lag = lag;
    }

    /// Number of keys currently stored, visible or not
    pub fn key_count(&self) -> usize {
        self.state.lock().objects.len()
    }

    fn visible<'a>(versions: &'a [Version], now: u64) -> Option<&'a Version> {
        versions.iter().rev().find(|v| v.visible_at <= now)
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageGateway for MemoryGateway {
    fn put(&self, key: &str, value: &[u8]) -> GatewayResult<()> {
        let mut state = self.state.lock();
        let visible_at = state.clock + state.visibility_lag;
        state
            .objects
            .entry(key.to_string())
            .or_default()
            .push(Version {
                value: value.to_vec(),
                visible_at,
            });
        Ok(())
    }

    fn get(&self, key: &str) -> GatewayResult<Vec<u8>> {
        let mut state = self.state.lock();
        let now = state.clock;
        state.clock += 1;
        state
            .objects
            .get(key)
            .and_then(|versions| Self::visible(versions, now))
            .map(|v| v.value.clone())
            .ok_or_else(|| GatewayError::NotFound(key.to_string()))
    }

    fn list_prefix(&self, prefix: &str, continuation: Option<&str>) -> GatewayResult<ListPage> {
        let mut state = self.state.lock();
        let now = state.clock;
        state.clock += 1;

        let mut keys: Vec<String> = state
            .objects
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .filter(|(_, versions)| Self::visible(versions, now).is_some())
            .map(|(k, _)| k.clone())
            .collect();

        if let Some(after) = continuation {
            keys.retain(|k| k.as_str() > after);
        }

        let next = if keys.len() > self.page_size {
            keys.truncate(self.page_size);
            keys.last().cloned()
        } else {
            None
        };

        Ok(ListPage { keys, next })
    }

    fn delete_keys(&self, _prefix: &str, keys: &[String]) -> GatewayResult<()> {
        let mut state = self.state.lock();
        for key in keys {
            state.objects.remove(key);
        }
        Ok(())
    }
}
