//! Watch engine — timeout-bounded polling of signal sources for a text match.
//!
//! A watch repeatedly queries an ordered set of [`SignalSource`]s against a
//! [`MatchPredicate`] until one matches or the deadline expires. Sources are
//! checked in priority order every cycle (most reliable first) rather than
//! round-robin, because fast-vanishing surfaces such as toasts must be polled
//! every cycle or a real event could be missed.

pub mod source;
pub mod sources;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ports::clock::Clock;
use crate::ports::device::DeviceSession;

pub use source::SignalSource;

/// Rejection of a malformed watch request, raised before any polling begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The source list was empty.
    #[error("watch request needs at least one signal source")]
    EmptySources,
    /// The poll interval was zero.
    #[error("poll interval must be positive")]
    ZeroPollInterval,
}

/// Text predicate applied to each signal payload.
///
/// Supplied per watch request and never mutated. The payload is opaque
/// text; the predicate is the only interpretation the engine performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum MatchPredicate {
    /// Case-sensitive substring test.
    Contains(String),
    /// Case-insensitive substring test.
    ContainsIgnoreCase(String),
}

impl MatchPredicate {
    /// Returns `true` when the payload satisfies the predicate.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Contains(needle) => text.contains(needle),
            Self::ContainsIgnoreCase(needle) => {
                text.to_lowercase().contains(&needle.to_lowercase())
            }
        }
    }
}

/// A validated watch request.
///
/// Construction fails fast on an empty source list or a zero poll
/// interval; a constructed request is always pollable. `deadline` may be
/// shorter than `poll_interval`, in which case at most one cycle runs.
pub struct WatchRequest<'a> {
    sources: Vec<&'a dyn SignalSource>,
    predicate: MatchPredicate,
    poll_interval: Duration,
    deadline: Duration,
}

impl<'a> WatchRequest<'a> {
    /// Builds a request over the given sources, in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if `sources` is empty or `poll_interval`
    /// is zero.
    pub fn new(
        sources: Vec<&'a dyn SignalSource>,
        predicate: MatchPredicate,
        poll_interval: Duration,
        deadline: Duration,
    ) -> Result<Self, RequestError> {
        if sources.is_empty() {
            return Err(RequestError::EmptySources);
        }
        if poll_interval.is_zero() {
            return Err(RequestError::ZeroPollInterval);
        }
        Ok(Self { sources, predicate, poll_interval, deadline })
    }

    /// The configured overall deadline.
    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

/// Outcome of a watch, returned once and never partially filled.
///
/// `matched == true` implies both `matched_source` and `matched_text`
/// are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchResult {
    /// Whether any source matched before the deadline.
    pub matched: bool,
    /// Identity of the source that matched, if any.
    pub matched_source: Option<String>,
    /// The payload that satisfied the predicate, if any.
    pub matched_text: Option<String>,
    /// Wall-clock time spent watching.
    pub elapsed: Duration,
}

impl WatchResult {
    fn matched(source: &dyn SignalSource, text: String, elapsed: Duration) -> Self {
        Self {
            matched: true,
            matched_source: Some(source.name().to_owned()),
            matched_text: Some(text),
            elapsed,
        }
    }

    fn no_match(elapsed: Duration) -> Self {
        Self { matched: false, matched_source: None, matched_text: None, elapsed }
    }
}

/// Polls signal sources until one matches or the deadline expires.
pub struct EventWatcher<'a> {
    device: &'a dyn DeviceSession,
    clock: &'a dyn Clock,
}

impl<'a> EventWatcher<'a> {
    /// Creates a watcher over the given device and clock.
    #[must_use]
    pub fn new(device: &'a dyn DeviceSession, clock: &'a dyn Clock) -> Self {
        Self { device, clock }
    }

    /// Runs the watch to completion.
    ///
    /// Each cycle queries every source in the request's order and returns
    /// immediately on the first match, skipping the rest of the cycle.
    /// Between cycles the watcher sleeps the poll interval, clamped to the
    /// remaining deadline so the result lands at the deadline even when it
    /// falls mid-interval.
    #[must_use]
    pub fn wait(&self, request: &WatchRequest<'_>) -> WatchResult {
        let start = self.clock.now();
        let mut elapsed = Duration::ZERO;

        while elapsed < request.deadline {
            for source in &request.sources {
                let Some(text) = source.query(self.device, self.clock) else {
                    continue;
                };
                debug!(source = source.name(), %text, "signal observed");
                if request.predicate.matches(&text) {
                    let elapsed = self.clock.now().duration_since(start);
                    info!(source = source.name(), %text, ?elapsed, "signal matched");
                    return WatchResult::matched(*source, text, elapsed);
                }
            }

            elapsed = self.clock.now().duration_since(start);
            if elapsed >= request.deadline {
                break;
            }
            self.clock.sleep(request.poll_interval.min(request.deadline - elapsed));
            elapsed = self.clock.now().duration_since(start);
        }

        warn!(deadline = ?request.deadline, "no signal matched within deadline");
        WatchResult::no_match(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::adapters::scripted::clock::ScriptedClock;
    use crate::adapters::scripted::device::ScriptedDevice;

    struct FixedSource {
        name: &'static str,
        text: Option<&'static str>,
    }

    impl SignalSource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }
        fn query(&self, _device: &dyn DeviceSession, _clock: &dyn Clock) -> Option<String> {
            self.text.map(str::to_owned)
        }
    }

    struct CountingSource {
        name: &'static str,
        calls: AtomicUsize,
        matches_on_call: usize,
        text: &'static str,
    }

    impl CountingSource {
        fn new(name: &'static str, matches_on_call: usize, text: &'static str) -> Self {
            Self { name, calls: AtomicUsize::new(0), matches_on_call, text }
        }
    }

    impl SignalSource for CountingSource {
        fn name(&self) -> &str {
            self.name
        }
        fn query(&self, _device: &dyn DeviceSession, _clock: &dyn Clock) -> Option<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            (call >= self.matches_on_call).then(|| self.text.to_owned())
        }
    }

    fn millis(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn empty_source_list_fails_fast() {
        let result = WatchRequest::new(
            Vec::new(),
            MatchPredicate::Contains("EXIT".into()),
            millis(100),
            millis(1000),
        );
        assert_eq!(result.err(), Some(RequestError::EmptySources));
    }

    #[test]
    fn zero_poll_interval_fails_fast() {
        let source = FixedSource { name: "status", text: None };
        let result = WatchRequest::new(
            vec![&source],
            MatchPredicate::Contains("EXIT".into()),
            Duration::ZERO,
            millis(1000),
        );
        assert_eq!(result.err(), Some(RequestError::ZeroPollInterval));
    }

    #[test]
    fn first_query_match_returns_within_one_interval() {
        let device = ScriptedDevice::default();
        let clock = ScriptedClock::new();
        let source = FixedSource { name: "status", text: Some("GEOFENCE_TRANSITION_EXIT") };
        let request = WatchRequest::new(
            vec![&source],
            MatchPredicate::Contains("EXIT".into()),
            millis(100),
            millis(1000),
        )
        .unwrap();

        let result = EventWatcher::new(&device, &clock).wait(&request);

        assert!(result.matched);
        assert_eq!(result.matched_source.as_deref(), Some("status"));
        assert_eq!(result.matched_text.as_deref(), Some("GEOFENCE_TRANSITION_EXIT"));
        assert!(result.elapsed <= millis(100));
    }

    #[test]
    fn no_match_runs_to_deadline() {
        let device = ScriptedDevice::default();
        let clock = ScriptedClock::new();
        let source = FixedSource { name: "status", text: Some("nothing relevant") };
        let request = WatchRequest::new(
            vec![&source],
            MatchPredicate::Contains("EXIT".into()),
            millis(100),
            millis(1000),
        )
        .unwrap();

        let result = EventWatcher::new(&device, &clock).wait(&request);

        assert!(!result.matched);
        assert_eq!(result.matched_source, None);
        assert_eq!(result.matched_text, None);
        assert!(result.elapsed >= millis(1000));
        assert!(result.elapsed < millis(1100));
    }

    #[test]
    fn earlier_source_wins_the_cycle_tie_break() {
        let device = ScriptedDevice::default();
        let clock = ScriptedClock::new();
        let first = FixedSource { name: "alert", text: Some("EXIT via alert") };
        let second = FixedSource { name: "toast", text: Some("EXIT via toast") };
        let request = WatchRequest::new(
            vec![&first, &second],
            MatchPredicate::Contains("EXIT".into()),
            millis(100),
            millis(1000),
        )
        .unwrap();

        let result = EventWatcher::new(&device, &clock).wait(&request);

        assert_eq!(result.matched_source.as_deref(), Some("alert"));
        assert_eq!(result.matched_text.as_deref(), Some("EXIT via alert"));
    }

    #[test]
    fn later_match_reports_elapsed_cycles() {
        let device = ScriptedDevice::default();
        let clock = ScriptedClock::new();
        let source = CountingSource::new("status", 3, "EXIT confirmed");
        let request = WatchRequest::new(
            vec![&source],
            MatchPredicate::Contains("EXIT".into()),
            millis(100),
            millis(1000),
        )
        .unwrap();

        let result = EventWatcher::new(&device, &clock).wait(&request);

        assert!(result.matched);
        assert!(result.elapsed >= millis(200), "elapsed was {:?}", result.elapsed);
        assert!(result.elapsed <= millis(400), "elapsed was {:?}", result.elapsed);
    }

    #[test]
    fn deadline_shorter_than_interval_runs_one_cycle() {
        let device = ScriptedDevice::default();
        let clock = ScriptedClock::new();
        let source = CountingSource::new("status", usize::MAX, "never");
        let request = WatchRequest::new(
            vec![&source],
            MatchPredicate::Contains("EXIT".into()),
            millis(100),
            millis(50),
        )
        .unwrap();

        let result = EventWatcher::new(&device, &clock).wait(&request);

        assert!(!result.matched);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(result.elapsed >= millis(50));
        assert!(result.elapsed < millis(100));
    }

    #[test]
    fn predicate_case_sensitivity() {
        let sensitive = MatchPredicate::Contains("EXIT".into());
        let insensitive = MatchPredicate::ContainsIgnoreCase("EXIT".into());

        assert!(sensitive.matches("GEOFENCE_TRANSITION_EXIT"));
        assert!(!sensitive.matches("geofence exit detected"));
        assert!(insensitive.matches("geofence exit detected"));
    }
}
