//! Clock port for reading time and pausing between poll cycles.

use std::time::{Duration, Instant};

/// Provides the current time and blocking sleeps.
///
/// Abstracting time access allows the watch loop's timing behavior to be
/// tested deterministically by substituting a scripted clock that advances
/// virtually instead of sleeping for real.
pub trait Clock: Send + Sync {
    /// Returns the current monotonic instant.
    fn now(&self) -> Instant;

    /// Blocks the calling thread for the given duration.
    fn sleep(&self, duration: Duration);
}
