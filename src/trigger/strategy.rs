//! Trigger strategy trait — one mechanism for inducing an external event.

use thiserror::Error;

use crate::ports::clock::Clock;
use crate::ports::device::{DeviceError, DeviceSession};

/// Failure of a single trigger attempt.
///
/// Carries only what the dispatcher needs: a human-readable cause. The
/// dispatcher records it and moves on; it never aborts the chain.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// The automation channel rejected or dropped a command.
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// One mechanism for driving an event into the system under test.
///
/// An attempt may run several sub-steps (stop a process, relaunch it,
/// deliver a payload) and may pause for a fixed settle delay before
/// reporting, giving the target time to process the induced event. The
/// settle delay belongs to the strategy's own budget, not the
/// dispatcher's. Strategies are stateless and reusable.
pub trait TriggerStrategy: Send + Sync {
    /// Stable identity used in outcomes and logs.
    fn name(&self) -> &str;

    /// Performs one attempt.
    ///
    /// # Errors
    ///
    /// Returns a [`TriggerError`] describing why the mechanism failed;
    /// the caller decides whether to fall through to another strategy.
    fn attempt(&self, device: &dyn DeviceSession, clock: &dyn Clock) -> Result<(), TriggerError>;
}
