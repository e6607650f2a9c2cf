//! In-app status text source.
//!
//! The target app mirrors its latest geofence event into a dedicated
//! status `TextView`. A plain element visible in the UI outlives toasts
//! and survives panel state, making this the most reliable source.

use tracing::debug;

use crate::ports::clock::Clock;
use crate::ports::device::{DeviceSession, Selector};
use crate::watch::source::SignalSource;

/// Default resource id of the status element in the reference app.
pub const DEFAULT_STATUS_TEXT_ID: &str = "com.eebax.geofencing:id/testStatusText";

/// Reads the app's status text element by resource id.
pub struct StatusTextSource {
    selector: Selector,
}

impl StatusTextSource {
    /// Creates the source for the given status element resource id.
    #[must_use]
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self { selector: Selector::Id(resource_id.into()) }
    }
}

impl Default for StatusTextSource {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_TEXT_ID)
    }
}

impl SignalSource for StatusTextSource {
    fn name(&self) -> &str {
        "status_text"
    }

    fn query(&self, device: &dyn DeviceSession, _clock: &dyn Clock) -> Option<String> {
        match device.find_texts(&self.selector) {
            Ok(texts) => texts.into_iter().find(|text| !text.is_empty()),
            Err(err) => {
                debug!(source = "status_text", %err, "query folded to absence");
                None
            }
        }
    }
}
