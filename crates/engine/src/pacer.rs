//! Wait strategy for the polling loops
//!
//! The retry loops never busy-spin; between polls they hand the wait to a
//! [`WaitStrategy`] so production code blocks on the wall clock while
//! tests substitute a no-op and run the same loops instantly.

use std::thread;
use std::time::Duration;

/// How a verification loop spends the time between polls
pub trait WaitStrategy: Send + Sync {
    /// Block for roughly `duration`
    fn pause(&self, duration: Duration);
}

/// Production waiter: blocks the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct SleepWaiter;

impl WaitStrategy for SleepWaiter {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Test waiter: returns immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWaiter;

impl WaitStrategy for NoopWaiter {
    fn pause(&self, _duration: Duration) {}
}
