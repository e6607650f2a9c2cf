//! Notification panel source.
//!
//! Prefers the device's notification listing command; when that fails or
//! comes back empty, drags the panel open with a swipe, scrapes its text
//! elements, and closes it again. The panel is always closed before the
//! query returns so later cycles see an undisturbed screen.

use std::time::Duration;

use tracing::{debug, warn};

use crate::ports::clock::Clock;
use crate::ports::device::{DeviceSession, Notification, Selector, SwipeGesture};
use crate::watch::source::SignalSource;

const PANEL_TEXT_XPATH: &str = "//android.widget.TextView[contains(@resource-id, \
     'android:id/text') or contains(@resource-id, 'android:id/title')]";

/// Settle time after the open swipe, letting the panel animation finish.
const OPEN_SETTLE: Duration = Duration::from_millis(1000);
/// Settle time after the close swipe.
const CLOSE_SETTLE: Duration = Duration::from_millis(500);

/// Reads notification text via the listing command, with a panel-scrape
/// fallback.
pub struct NotificationPanelSource {
    panel_text: Selector,
}

impl NotificationPanelSource {
    /// Creates the source with the standard panel text selector.
    #[must_use]
    pub fn new() -> Self {
        Self { panel_text: Selector::Xpath(PANEL_TEXT_XPATH.to_owned()) }
    }

    fn from_listing(device: &dyn DeviceSession) -> Option<String> {
        match device.notifications() {
            Ok(entries) => {
                let text = entries
                    .iter()
                    .map(Notification::joined_text)
                    .filter(|joined| !joined.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                (!text.is_empty()).then_some(text)
            }
            Err(err) => {
                debug!(source = "notifications", %err, "listing command folded to absence");
                None
            }
        }
    }

    fn from_panel_scrape(&self, device: &dyn DeviceSession, clock: &dyn Clock) -> Option<String> {
        if let Err(err) = device.swipe(&SwipeGesture::open_panel()) {
            warn!(source = "notifications", %err, "panel open swipe failed");
            return None;
        }
        clock.sleep(OPEN_SETTLE);

        let scraped = match device.find_texts(&self.panel_text) {
            Ok(texts) => {
                let joined = texts
                    .into_iter()
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                (!joined.is_empty()).then_some(joined)
            }
            Err(err) => {
                warn!(source = "notifications", %err, "panel scrape folded to absence");
                None
            }
        };

        Self::close_panel(device, clock);
        scraped
    }

    fn close_panel(device: &dyn DeviceSession, clock: &dyn Clock) {
        if let Err(err) = device.swipe(&SwipeGesture::close_panel()) {
            warn!(source = "notifications", %err, "panel close swipe failed");
            return;
        }
        clock.sleep(CLOSE_SETTLE);
    }
}

impl Default for NotificationPanelSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for NotificationPanelSource {
    fn name(&self) -> &str {
        "notifications"
    }

    fn query(&self, device: &dyn DeviceSession, clock: &dyn Clock) -> Option<String> {
        Self::from_listing(device).or_else(|| self.from_panel_scrape(device, clock))
    }
}
