//! Scripted device session serving canned per-channel responses.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::ports::device::{
    Coordinates, DeviceError, DeviceSession, Notification, Selector, StartActivityArgs,
    SwipeDirection, SwipeGesture,
};

/// On-disk script for a [`ScriptedDevice`].
///
/// Each channel is a queue of successive answers: `alerts` feeds
/// `alert_text` call by call, `elements` maps a selector value to the
/// element-text lists it returns, `notifications` feeds the listing
/// command. The final entry of a queue repeats once the queue drains, so
/// a signal that has appeared stays visible to later poll cycles.
/// Channels named in `unavailable` fail every call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceScript {
    /// Successive `alert_text` answers; `null` entries mean no alert.
    #[serde(default)]
    pub alerts: Vec<Option<String>>,
    /// Successive `find_texts` answers, keyed by selector value.
    #[serde(default)]
    pub elements: HashMap<String, Vec<Vec<String>>>,
    /// Successive `notifications` answers.
    #[serde(default)]
    pub notifications: Vec<Vec<Notification>>,
    /// Channel method names that fail every call.
    #[serde(default)]
    pub unavailable: Vec<String>,
}

impl DeviceScript {
    /// Loads a script from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error string if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read device script {}: {e}", path.display()))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse device script {}: {e}", path.display()))
    }
}

#[derive(Default)]
struct Inner {
    alerts: VecDeque<Option<String>>,
    elements: HashMap<String, VecDeque<Vec<String>>>,
    notifications: VecDeque<Vec<Notification>>,
    unavailable: HashSet<String>,
    calls: Vec<String>,
}

/// Device session that answers from scripted queues.
///
/// Every call is recorded, so tests can assert on the exact command
/// sequence a source or strategy produced. Commands with no scripted
/// answer succeed with an empty result.
#[derive(Default)]
pub struct ScriptedDevice {
    inner: Mutex<Inner>,
}

impl ScriptedDevice {
    /// Builds a device preloaded from a script.
    #[must_use]
    pub fn from_script(script: DeviceScript) -> Self {
        let inner = Inner {
            alerts: script.alerts.into(),
            elements: script
                .elements
                .into_iter()
                .map(|(selector, queue)| (selector, queue.into()))
                .collect(),
            notifications: script.notifications.into(),
            unavailable: script.unavailable.into_iter().collect(),
            calls: Vec::new(),
        };
        Self { inner: Mutex::new(inner) }
    }

    /// Queues the next `alert_text` answer.
    pub fn push_alert(&self, text: Option<&str>) {
        self.lock().alerts.push_back(text.map(str::to_owned));
    }

    /// Queues the next `find_texts` answer for a selector value.
    pub fn push_elements(&self, selector_value: &str, texts: Vec<&str>) {
        self.lock()
            .elements
            .entry(selector_value.to_owned())
            .or_default()
            .push_back(texts.into_iter().map(str::to_owned).collect());
    }

    /// Queues the next `notifications` answer.
    pub fn push_notifications(&self, entries: Vec<Notification>) {
        self.lock().notifications.push_back(entries);
    }

    /// Makes every call to the named channel method fail.
    pub fn make_unavailable(&self, method: &str) {
        self.lock().unavailable.insert(method.to_owned());
    }

    /// Every recorded call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("device lock poisoned")
    }

    fn record_and_check(&self, method: &str, call: String) -> Result<(), DeviceError> {
        let mut inner = self.lock();
        inner.calls.push(call);
        if inner.unavailable.contains(method) {
            return Err(DeviceError::Transport(format!("scripted: {method} unavailable")));
        }
        Ok(())
    }
}

/// Pops the next answer, keeping the last entry around to repeat.
fn next<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

impl DeviceSession for ScriptedDevice {
    fn alert_text(&self) -> Result<Option<String>, DeviceError> {
        self.record_and_check("alert_text", "alert_text".to_owned())?;
        Ok(next(&mut self.lock().alerts).flatten())
    }

    fn find_texts(&self, selector: &Selector) -> Result<Vec<String>, DeviceError> {
        let value = match selector {
            Selector::Id(value) | Selector::Xpath(value) => value.clone(),
        };
        self.record_and_check("find_texts", format!("find_texts {value}"))?;
        Ok(self
            .lock()
            .elements
            .get_mut(&value)
            .and_then(next)
            .unwrap_or_default())
    }

    fn notifications(&self) -> Result<Vec<Notification>, DeviceError> {
        self.record_and_check("notifications", "notifications".to_owned())?;
        Ok(next(&mut self.lock().notifications).unwrap_or_default())
    }

    fn swipe(&self, gesture: &SwipeGesture) -> Result<(), DeviceError> {
        let direction = match gesture.direction {
            SwipeDirection::Down => "down",
            SwipeDirection::Up => "up",
        };
        self.record_and_check("swipe", format!("swipe {direction}"))
    }

    fn terminate_app(&self, app_id: &str) -> Result<(), DeviceError> {
        self.record_and_check("terminate_app", format!("terminate_app {app_id}"))
    }

    fn deep_link(&self, url: &str, package: &str) -> Result<(), DeviceError> {
        self.record_and_check("deep_link", format!("deep_link {url} {package}"))
    }

    fn start_activity(&self, args: &StartActivityArgs) -> Result<(), DeviceError> {
        let extra = args
            .optional_arguments
            .as_ref()
            .map(|arguments| format!(" {arguments}"))
            .unwrap_or_default();
        self.record_and_check(
            "start_activity",
            format!("start_activity {} {}/{}{extra}", args.intent, args.package, args.activity),
        )
    }

    fn navigate(&self, url: &str) -> Result<(), DeviceError> {
        self.record_and_check("navigate", format!("navigate {url}"))
    }

    fn set_location(&self, position: &Coordinates) -> Result<(), DeviceError> {
        self.record_and_check(
            "set_location",
            format!("set_location {},{}", position.latitude, position.longitude),
        )
    }

    fn screenshot(&self) -> Result<Vec<u8>, DeviceError> {
        self.record_and_check("screenshot", "screenshot".to_owned())?;
        Ok(Vec::new())
    }
}
