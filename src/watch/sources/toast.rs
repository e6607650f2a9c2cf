//! Toast message source.
//!
//! Android toasts live for two to three seconds, so this source must be
//! polled every cycle. When no toast container is on screen it falls back
//! to a broader query for event-related visible text.

use tracing::debug;

use crate::ports::clock::Clock;
use crate::ports::device::{DeviceSession, Selector};
use crate::watch::source::SignalSource;

const TOAST_XPATH: &str = "//android.widget.Toast//android.widget.TextView | \
     //android.widget.Toast | \
     //*[contains(@class, 'Toast')]//android.widget.TextView";

const FALLBACK_XPATH: &str =
    "//android.widget.TextView[contains(@text, 'GEOFENCE') or contains(@text, 'Test:')]";

/// Scrapes the current toast, falling back to event-related screen text.
pub struct ToastSource {
    toast: Selector,
    fallback: Selector,
}

impl ToastSource {
    /// Creates the source with the standard toast and fallback selectors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            toast: Selector::Xpath(TOAST_XPATH.to_owned()),
            fallback: Selector::Xpath(FALLBACK_XPATH.to_owned()),
        }
    }

    fn first_text(device: &dyn DeviceSession, selector: &Selector) -> Option<String> {
        match device.find_texts(selector) {
            Ok(texts) => texts.into_iter().find(|text| !text.is_empty()),
            Err(err) => {
                debug!(source = "toast", %err, "element query folded to absence");
                None
            }
        }
    }
}

impl Default for ToastSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for ToastSource {
    fn name(&self) -> &str {
        "toast"
    }

    fn query(&self, device: &dyn DeviceSession, _clock: &dyn Clock) -> Option<String> {
        Self::first_text(device, &self.toast)
            .or_else(|| Self::first_text(device, &self.fallback))
    }
}
