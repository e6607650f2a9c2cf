//! Native alert dialog source.
//!
//! iOS builds surface geofence transitions as `UIAlertController` dialogs,
//! so the alert text is the primary signal there.

use tracing::debug;

use crate::ports::clock::Clock;
use crate::ports::device::DeviceSession;
use crate::watch::source::SignalSource;

/// Reads the text of the currently displayed native alert.
pub struct AlertSource;

impl SignalSource for AlertSource {
    fn name(&self) -> &str {
        "alert"
    }

    fn query(&self, device: &dyn DeviceSession, _clock: &dyn Clock) -> Option<String> {
        match device.alert_text() {
            Ok(Some(text)) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(err) => {
                debug!(source = "alert", %err, "query folded to absence");
                None
            }
        }
    }
}
