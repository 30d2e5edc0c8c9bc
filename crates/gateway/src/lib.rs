//! In-memory reference gateway for Staleprobe
//!
//! Implements [`staleprobe_core::StorageGateway`] over a guarded map with an
//! injectable visibility lag, so the probe can be exercised end-to-end
//! (and deterministically tested) without a real object-storage backend.

#![warn(clippy::all)]

pub mod memory;

pub use memory::{MemoryGateway, MemoryGatewayConfig};
