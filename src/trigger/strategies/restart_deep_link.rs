//! Terminate-then-deep-link trigger strategy.
//!
//! Stopping the app first guarantees the relaunch delivers the intent to
//! a fresh process instead of an activity that may ignore `onNewIntent`.

use std::time::Duration;

use crate::ports::clock::Clock;
use crate::ports::device::DeviceSession;
use crate::trigger::strategy::{TriggerError, TriggerStrategy};

/// Pause between terminating the app and relaunching it.
const TERMINATE_SETTLE: Duration = Duration::from_millis(1000);
/// Pause after the deep link, letting the app process the event.
const LAUNCH_SETTLE: Duration = Duration::from_millis(3000);

/// Terminates the target app and relaunches it via deep link.
pub struct RestartDeepLink {
    app_id: String,
    url: String,
}

impl RestartDeepLink {
    /// Creates the strategy for the given app and trigger URL.
    #[must_use]
    pub fn new(app_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self { app_id: app_id.into(), url: url.into() }
    }
}

impl TriggerStrategy for RestartDeepLink {
    fn name(&self) -> &str {
        "restart_deep_link"
    }

    fn attempt(&self, device: &dyn DeviceSession, clock: &dyn Clock) -> Result<(), TriggerError> {
        device.terminate_app(&self.app_id)?;
        clock.sleep(TERMINATE_SETTLE);
        device.deep_link(&self.url, &self.app_id)?;
        clock.sleep(LAUNCH_SETTLE);
        Ok(())
    }
}
