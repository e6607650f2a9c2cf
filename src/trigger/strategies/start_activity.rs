//! Explicit VIEW-intent trigger strategy.

use std::time::Duration;

use crate::ports::clock::Clock;
use crate::ports::device::{DeviceSession, StartActivityArgs};
use crate::trigger::strategy::{TriggerError, TriggerStrategy};

const SETTLE: Duration = Duration::from_millis(2000);

/// Starts the handling activity directly with a VIEW intent carrying the
/// trigger URI as its data argument.
pub struct StartActivity {
    package: String,
    activity: String,
    url: String,
}

impl StartActivity {
    /// Creates the strategy for the given package, activity, and URL.
    #[must_use]
    pub fn new(
        package: impl Into<String>,
        activity: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self { package: package.into(), activity: activity.into(), url: url.into() }
    }
}

impl TriggerStrategy for StartActivity {
    fn name(&self) -> &str {
        "start_activity"
    }

    fn attempt(&self, device: &dyn DeviceSession, clock: &dyn Clock) -> Result<(), TriggerError> {
        device.start_activity(&StartActivityArgs {
            intent: "android.intent.action.VIEW".to_owned(),
            package: self.package.clone(),
            activity: self.activity.clone(),
            optional_arguments: Some(format!("-d {}", self.url)),
        })?;
        clock.sleep(SETTLE);
        Ok(())
    }
}
