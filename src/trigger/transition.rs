//! Geofence transition types and their deep link encoding.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A geofence transition to drive into the app.
///
/// Codes match the Android `Geofence` transition constants so the deep
/// link handler in the debug build can forward them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Device entered the zone (code 1).
    Enter,
    /// Device left the zone (code 2).
    Exit,
}

impl Transition {
    /// The Android transition constant.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Enter => 1,
            Self::Exit => 2,
        }
    }

    /// The event name the app renders for this transition.
    #[must_use]
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Enter => "GEOFENCE_TRANSITION_ENTER",
            Self::Exit => "GEOFENCE_TRANSITION_EXIT",
        }
    }

    /// Builds the trigger deep link for this transition.
    ///
    /// The base must match the app manifest's intent filter
    /// (e.g. `geofence://test/trigger`).
    #[must_use]
    pub fn deep_link_url(self, base: &str) -> String {
        format!("{base}?transition={}", self.code())
    }
}
