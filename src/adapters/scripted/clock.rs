//! Scripted clock that advances virtually instead of sleeping.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::ports::clock::Clock;

#[derive(Default)]
struct Inner {
    offset: Duration,
    sleeps: Vec<Duration>,
}

/// Clock whose time only moves when something sleeps on it.
///
/// `sleep` returns immediately after advancing virtual time by the
/// requested duration, so a watch with a two-minute deadline finishes in
/// microseconds while observing exactly the timing it would see live.
/// Every sleep is recorded for assertions on settle behavior.
pub struct ScriptedClock {
    start: Instant,
    inner: Mutex<Inner>,
}

impl ScriptedClock {
    /// Creates a clock starting at the current instant with zero offset.
    #[must_use]
    pub fn new() -> Self {
        Self { start: Instant::now(), inner: Mutex::new(Inner::default()) }
    }

    /// Moves virtual time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.inner.lock().expect("clock lock poisoned").offset += duration;
    }

    /// Every sleep requested so far, in order.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.lock().expect("clock lock poisoned").sleeps.clone()
    }
}

impl Default for ScriptedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> Instant {
        self.start + self.inner.lock().expect("clock lock poisoned").offset
    }

    fn sleep(&self, duration: Duration) {
        let mut inner = self.inner.lock().expect("clock lock poisoned");
        inner.offset += duration;
        inner.sleeps.push(duration);
    }
}
