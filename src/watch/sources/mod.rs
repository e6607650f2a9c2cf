//! Concrete signal sources, one per observable surface.
//!
//! Ordered most-reliable-first by convention: in-app status text, native
//! alert, toast, notification panel. Each source hides its own acquisition
//! quirks behind the uniform [`SignalSource`](super::SignalSource) contract.

pub mod alert;
pub mod notifications;
pub mod status_text;
pub mod toast;

pub use alert::AlertSource;
pub use notifications::NotificationPanelSource;
pub use status_text::StatusTextSource;
pub use toast::ToastSource;

use super::source::SignalSource;

/// Builds the standard source set in priority order.
///
/// The in-app status element leads because it outlives transient
/// surfaces; the panel comes last because scraping it disturbs the
/// screen for the rest of the cycle.
#[must_use]
pub fn standard_sources(status_text_id: &str) -> Vec<Box<dyn SignalSource>> {
    vec![
        Box::new(StatusTextSource::new(status_text_id)),
        Box::new(AlertSource),
        Box::new(ToastSource::new()),
        Box::new(NotificationPanelSource::new()),
    ]
}
