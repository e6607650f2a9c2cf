//! Suite configuration loaded from YAML with environment overrides.
//!
//! Precedence per key: environment variable, then config file, then the
//! built-in default. Empty environment variables count as unset. A `.env`
//! file is honored via `dotenvy` before the binary reads the environment.

use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Target mobile platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Android device or emulator.
    Android,
    /// iOS device or simulator.
    Ios,
}

/// Process-wide test-suite configuration, read-only after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Target platform.
    pub platform: Platform,
    /// Automation server base URL.
    pub server_url: String,
    /// Existing automation session to attach to.
    pub session_id: Option<String>,
    /// Target application package id.
    pub app_id: String,
    /// Activity handling VIEW intents (relative names allowed).
    pub activity: String,
    /// Deep link base matching the app manifest's intent filter.
    pub deep_link_base: String,
    /// Resource id of the in-app status text element.
    pub status_text_id: String,
    /// Default element wait, in seconds.
    pub default_timeout_secs: u64,
    /// Watch deadline for geofence events, in seconds.
    pub event_wait_timeout_secs: u64,
    /// Poll cadence of the watch loop, in milliseconds.
    pub poll_interval_millis: u64,
    /// Per-request timeout of the automation channel, in milliseconds.
    pub request_timeout_millis: u64,
    /// Scenario re-executions allowed after a failure.
    pub retry_max: u32,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Android,
            server_url: "http://localhost:4723".to_owned(),
            session_id: None,
            app_id: "com.eebax.geofencing".to_owned(),
            activity: ".MapsActivity".to_owned(),
            deep_link_base: "geofence://test/trigger".to_owned(),
            status_text_id: "com.eebax.geofencing:id/testStatusText".to_owned(),
            default_timeout_secs: 30,
            event_wait_timeout_secs: 120,
            poll_interval_millis: 2000,
            request_timeout_millis: 10_000,
            retry_max: 2,
        }
    }
}

impl SuiteConfig {
    /// Loads configuration, applying environment overrides on top.
    ///
    /// With `path` given the file must parse; without it, `vigil.yaml` in
    /// the working directory is used when present, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error string if the file cannot be read or parsed, or
    /// an override variable holds an unparseable value.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let default_path = Path::new("vigil.yaml");
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if default_path.exists() => Self::from_file(default_path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Applies per-key overrides from a lookup (the environment in
    /// production). Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error string when a numeric or enum value fails to parse.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), String> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(value) = get("VIGIL_PLATFORM") {
            self.platform = match value.as_str() {
                "android" => Platform::Android,
                "ios" => Platform::Ios,
                other => return Err(format!("VIGIL_PLATFORM: unknown platform {other}")),
            };
        }
        if let Some(value) = get("VIGIL_SERVER_URL") {
            self.server_url = value;
        }
        if let Some(value) = get("VIGIL_SESSION_ID") {
            self.session_id = Some(value);
        }
        if let Some(value) = get("VIGIL_APP_ID") {
            self.app_id = value;
        }
        if let Some(value) = get("VIGIL_DEEP_LINK_BASE") {
            self.deep_link_base = value;
        }
        if let Some(value) = get("VIGIL_STATUS_TEXT_ID") {
            self.status_text_id = value;
        }
        if let Some(value) = get("VIGIL_EVENT_WAIT_TIMEOUT_SECS") {
            self.event_wait_timeout_secs = parse_number("VIGIL_EVENT_WAIT_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = get("VIGIL_POLL_INTERVAL_MILLIS") {
            self.poll_interval_millis = parse_number("VIGIL_POLL_INTERVAL_MILLIS", &value)?;
        }
        if let Some(value) = get("VIGIL_RETRY_MAX") {
            self.retry_max = parse_number("VIGIL_RETRY_MAX", &value)?;
        }
        Ok(())
    }

    /// Watch deadline as a duration.
    #[must_use]
    pub fn event_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.event_wait_timeout_secs)
    }

    /// Poll cadence as a duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }

    /// Channel request timeout as a duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_millis)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value.parse().map_err(|_| format!("{key}: expected a number, got {value:?}"))
}
