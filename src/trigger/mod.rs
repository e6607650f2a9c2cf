//! Trigger engine — fallback-chain dispatch of event trigger strategies.
//!
//! Driving an event through a device automation layer is unreliable by
//! mechanism: different primitives succeed on different device, OS, and
//! backend combinations. The dispatcher therefore degrades gracefully
//! through an ordered chain, most-direct first, accepting the first
//! success and aggregating every failure when the chain is exhausted.

pub mod strategies;
pub mod strategy;
pub mod transition;

use tracing::{error, info, warn};

use crate::ports::clock::Clock;
use crate::ports::device::DeviceSession;

pub use strategy::{TriggerError, TriggerStrategy};
pub use transition::Transition;

/// A recorded failure of one strategy in the chain.
#[derive(Debug)]
pub struct StrategyFailure {
    /// Identity of the failed strategy.
    pub strategy: String,
    /// Why the attempt failed.
    pub error: TriggerError,
}

/// Result of running a trigger chain, returned once.
///
/// `succeeded == true` implies `strategy_used` is present; `attempts`
/// holds every failure recorded before success or final exhaustion.
#[derive(Debug)]
pub struct TriggerOutcome {
    /// Whether any strategy in the chain succeeded.
    pub succeeded: bool,
    /// Identity of the strategy that succeeded, if any.
    pub strategy_used: Option<String>,
    /// Failed attempts, in chain order.
    pub attempts: Vec<StrategyFailure>,
}

impl TriggerOutcome {
    /// One-line description of the failures, for error reporting.
    #[must_use]
    pub fn failure_summary(&self) -> String {
        self.attempts
            .iter()
            .map(|attempt| format!("{}: {}", attempt.strategy, attempt.error))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Tries trigger strategies in priority order until one succeeds.
pub struct ActionDispatcher<'a> {
    device: &'a dyn DeviceSession,
    clock: &'a dyn Clock,
}

impl<'a> ActionDispatcher<'a> {
    /// Creates a dispatcher over the given device and clock.
    #[must_use]
    pub fn new(device: &'a dyn DeviceSession, clock: &'a dyn Clock) -> Self {
        Self { device, clock }
    }

    /// Runs the chain.
    ///
    /// Strategies are attempted in order; the first success short-circuits
    /// the rest. A failed attempt is recorded and never retried. An empty
    /// chain yields the exhausted outcome with zero attempts.
    #[must_use]
    pub fn trigger(&self, chain: &[Box<dyn TriggerStrategy>]) -> TriggerOutcome {
        let mut attempts = Vec::new();

        for strategy in chain {
            info!(strategy = strategy.name(), "attempting trigger");
            match strategy.attempt(self.device, self.clock) {
                Ok(()) => {
                    info!(strategy = strategy.name(), "trigger succeeded");
                    return TriggerOutcome {
                        succeeded: true,
                        strategy_used: Some(strategy.name().to_owned()),
                        attempts,
                    };
                }
                Err(error) => {
                    warn!(strategy = strategy.name(), %error, "trigger strategy failed, falling through");
                    attempts.push(StrategyFailure { strategy: strategy.name().to_owned(), error });
                }
            }
        }

        error!(attempted = attempts.len(), "all trigger strategies failed");
        TriggerOutcome { succeeded: false, strategy_used: None, attempts }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::adapters::scripted::clock::ScriptedClock;
    use crate::adapters::scripted::device::ScriptedDevice;
    use crate::ports::device::DeviceError;

    struct SpyStrategy {
        name: &'static str,
        succeeds: bool,
        calls: Arc<AtomicUsize>,
    }

    impl SpyStrategy {
        fn boxed(name: &'static str, succeeds: bool) -> Box<Self> {
            Box::new(Self { name, succeeds, calls: Arc::new(AtomicUsize::new(0)) })
        }

        fn counted(
            name: &'static str,
            succeeds: bool,
            calls: Arc<AtomicUsize>,
        ) -> Box<Self> {
            Box::new(Self { name, succeeds, calls })
        }
    }

    impl TriggerStrategy for SpyStrategy {
        fn name(&self) -> &str {
            self.name
        }
        fn attempt(
            &self,
            _device: &dyn DeviceSession,
            _clock: &dyn Clock,
        ) -> Result<(), TriggerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeeds {
                Ok(())
            } else {
                Err(TriggerError::Device(DeviceError::Transport(format!(
                    "{} unreachable",
                    self.name
                ))))
            }
        }
    }

    fn dispatch(chain: &[Box<dyn TriggerStrategy>]) -> TriggerOutcome {
        let device = ScriptedDevice::default();
        let clock = ScriptedClock::new();
        ActionDispatcher::new(&device, &clock).trigger(chain)
    }

    #[test]
    fn first_success_short_circuits() {
        let chain: Vec<Box<dyn TriggerStrategy>> =
            vec![SpyStrategy::boxed("a", true), SpyStrategy::boxed("b", true)];

        let outcome = dispatch(&chain);

        assert!(outcome.succeeded);
        assert_eq!(outcome.strategy_used.as_deref(), Some("a"));
        assert!(outcome.attempts.is_empty());
    }

    #[test]
    fn fallback_reaches_later_strategy_and_records_failures() {
        let chain: Vec<Box<dyn TriggerStrategy>> = vec![
            SpyStrategy::boxed("a", false),
            SpyStrategy::boxed("b", false),
            SpyStrategy::boxed("c", true),
        ];

        let outcome = dispatch(&chain);

        assert!(outcome.succeeded);
        assert_eq!(outcome.strategy_used.as_deref(), Some("c"));
        let failed: Vec<&str> =
            outcome.attempts.iter().map(|attempt| attempt.strategy.as_str()).collect();
        assert_eq!(failed, vec!["a", "b"]);
    }

    #[test]
    fn later_strategies_are_not_invoked_after_success() {
        let second_calls = Arc::new(AtomicUsize::new(0));
        let chain: Vec<Box<dyn TriggerStrategy>> = vec![
            SpyStrategy::boxed("first", true),
            SpyStrategy::counted("second", true, Arc::clone(&second_calls)),
        ];

        let _ = dispatch(&chain);

        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn exhaustion_reports_every_failure() {
        let chain: Vec<Box<dyn TriggerStrategy>> =
            vec![SpyStrategy::boxed("a", false), SpyStrategy::boxed("b", false)];

        let outcome = dispatch(&chain);

        assert!(!outcome.succeeded);
        assert_eq!(outcome.strategy_used, None);
        assert_eq!(outcome.attempts.len(), 2);
        assert!(outcome.failure_summary().contains("a: "));
        assert!(outcome.failure_summary().contains("b: "));
    }

    #[test]
    fn empty_chain_is_exhausted_with_no_attempts() {
        let outcome = dispatch(&[]);

        assert!(!outcome.succeeded);
        assert!(outcome.attempts.is_empty());
    }
}
