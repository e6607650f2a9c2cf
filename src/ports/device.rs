//! Device session port for the mobile automation channel.
//!
//! The trait covers the vendor commands the engine needs: alert and element
//! text queries, notification listing, gestures, app lifecycle, deep links,
//! URL navigation, GPS simulation, and screenshot capture. Session creation
//! and capability construction happen outside this crate; an adapter is
//! handed an already-established session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised by the automation channel.
///
/// Sources and strategies fold these into absence or recorded failures;
/// a channel error never aborts a watch or a trigger chain on its own.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The HTTP transport failed (connection refused, timeout, DNS).
    #[error("transport error: {0}")]
    Transport(String),
    /// The automation server answered with an error status.
    #[error("command {command} failed ({status}): {message}")]
    Command {
        /// The command or endpoint that failed.
        command: String,
        /// HTTP status code returned by the server.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("malformed response for {command}: {detail}")]
    MalformedResponse {
        /// The command whose response was unreadable.
        command: String,
        /// Decoding failure detail.
        detail: String,
    },
    /// The command is not supported on the configured platform.
    #[error("{command} is not supported on {platform}")]
    Unsupported {
        /// The rejected command.
        command: String,
        /// The platform that rejects it.
        platform: String,
    },
}

/// Locator for visible elements on the device screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Selector {
    /// Android resource id (e.g. `com.example:id/statusText`).
    Id(String),
    /// XPath over the native UI hierarchy.
    Xpath(String),
}

/// One entry returned by the device's notification listing.
///
/// All fields are optional; the platform populates whichever it has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification title line.
    pub title: Option<String>,
    /// Main notification text.
    pub text: Option<String>,
    /// Secondary text line.
    pub sub_text: Option<String>,
    /// Expanded text for big-text style notifications.
    pub big_text: Option<String>,
}

impl Notification {
    /// Joins all populated fields into one space-separated string,
    /// title first, in the order title, text, sub text, big text.
    #[must_use]
    pub fn joined_text(&self) -> String {
        [&self.title, &self.text, &self.sub_text, &self.big_text]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Direction of a swipe gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    /// Swipe downward (opens the notification panel from the top edge).
    Down,
    /// Swipe upward (closes the notification panel).
    Up,
}

/// A swipe gesture over a screen region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeGesture {
    /// Left edge of the gesture region, in pixels.
    pub left: u32,
    /// Top edge of the gesture region, in pixels.
    pub top: u32,
    /// Region width, in pixels.
    pub width: u32,
    /// Region height, in pixels.
    pub height: u32,
    /// Swipe direction.
    pub direction: SwipeDirection,
    /// Portion of the region the swipe covers, 0.0..=1.0.
    pub percent: f64,
}

impl SwipeGesture {
    /// Gesture that drags the notification shade down from the top edge.
    #[must_use]
    pub fn open_panel() -> Self {
        Self { left: 500, top: 0, width: 100, height: 500, direction: SwipeDirection::Down, percent: 0.75 }
    }

    /// Gesture that pushes the notification shade back up.
    #[must_use]
    pub fn close_panel() -> Self {
        Self { left: 500, top: 500, width: 100, height: 500, direction: SwipeDirection::Up, percent: 0.75 }
    }
}

/// Arguments for launching an activity with a VIEW intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartActivityArgs {
    /// Intent action (e.g. `android.intent.action.VIEW`).
    pub intent: String,
    /// Target application package.
    pub package: String,
    /// Target activity, relative (`.MapsActivity`) or fully qualified.
    pub activity: String,
    /// Extra intent arguments (e.g. `-d <uri>` to attach a data URI).
    pub optional_arguments: Option<String>,
}

/// A GPS coordinate for location simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Altitude in meters.
    #[serde(default)]
    pub altitude: f64,
}

/// The mobile automation channel.
///
/// Every method is a single round trip to the automation server and is
/// bounded by the channel's own request timeout. Absence of an alert is
/// `Ok(None)`, not an error; errors mean the channel itself misbehaved.
pub trait DeviceSession: Send + Sync {
    /// Returns the text of the currently displayed native alert, or
    /// `None` when no alert is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot be reached or answers
    /// with an unexpected failure (not for mere alert absence).
    fn alert_text(&self) -> Result<Option<String>, DeviceError>;

    /// Returns the visible text of every element matching the selector.
    /// Elements without text are skipped; no match yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the element query cannot be executed.
    fn find_texts(&self, selector: &Selector) -> Result<Vec<String>, DeviceError>;

    /// Lists the device's current notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification listing command fails.
    fn notifications(&self) -> Result<Vec<Notification>, DeviceError>;

    /// Performs a swipe gesture.
    ///
    /// # Errors
    ///
    /// Returns an error if the gesture command fails.
    fn swipe(&self, gesture: &SwipeGesture) -> Result<(), DeviceError>;

    /// Force-stops the application with the given package id.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminate command fails.
    fn terminate_app(&self, app_id: &str) -> Result<(), DeviceError>;

    /// Launches the application via a deep link URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the deep link command fails.
    fn deep_link(&self, url: &str, package: &str) -> Result<(), DeviceError>;

    /// Starts an activity with explicit intent arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the activity cannot be started.
    fn start_activity(&self, args: &StartActivityArgs) -> Result<(), DeviceError>;

    /// Navigates the session to a URL (the generic WebDriver navigation).
    ///
    /// # Errors
    ///
    /// Returns an error if navigation fails.
    fn navigate(&self, url: &str) -> Result<(), DeviceError>;

    /// Sets the device's simulated GPS position.
    ///
    /// # Errors
    ///
    /// Returns an error if the location command fails.
    fn set_location(&self, position: &Coordinates) -> Result<(), DeviceError>;

    /// Captures a screenshot as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the capture fails.
    fn screenshot(&self) -> Result<Vec<u8>, DeviceError>;
}
