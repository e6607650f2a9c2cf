//! Plain URL-navigation trigger strategy, the generic last resort.

use std::time::Duration;

use crate::ports::clock::Clock;
use crate::ports::device::DeviceSession;
use crate::trigger::strategy::{TriggerError, TriggerStrategy};

const SETTLE: Duration = Duration::from_millis(2000);

/// Asks the session to navigate straight to the trigger URI.
pub struct DirectNavigation {
    url: String,
}

impl DirectNavigation {
    /// Creates the strategy for the given URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl TriggerStrategy for DirectNavigation {
    fn name(&self) -> &str {
        "navigate"
    }

    fn attempt(&self, device: &dyn DeviceSession, clock: &dyn Clock) -> Result<(), TriggerError> {
        device.navigate(&self.url)?;
        clock.sleep(SETTLE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scripted::clock::ScriptedClock;
    use crate::adapters::scripted::device::ScriptedDevice;

    #[test]
    fn navigates_to_trigger_url() {
        let device = ScriptedDevice::default();
        let clock = ScriptedClock::new();

        DirectNavigation::new("geofence://test/trigger?transition=2")
            .attempt(&device, &clock)
            .unwrap();

        assert_eq!(device.calls(), vec!["navigate geofence://test/trigger?transition=2"]);
        assert_eq!(clock.sleeps(), vec![SETTLE]);
    }

    #[test]
    fn navigation_failure_surfaces_as_trigger_error() {
        let device = ScriptedDevice::default();
        device.make_unavailable("navigate");
        let clock = ScriptedClock::new();

        assert!(DirectNavigation::new("geofence://x").attempt(&device, &clock).is_err());
    }
}
