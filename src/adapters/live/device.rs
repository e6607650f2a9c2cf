//! Live device session speaking the W3C WebDriver protocol with vendor
//! `mobile:` extensions.
//!
//! The adapter attaches to an already-established automation session;
//! creating sessions and building capabilities happen outside this crate.
//! Every request is bounded by the client's request timeout, so a hung
//! server surfaces as a transport error instead of a stalled poll cycle.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::config::Platform;
use crate::ports::device::{
    Coordinates, DeviceError, DeviceSession, Notification, Selector, StartActivityArgs,
    SwipeDirection, SwipeGesture,
};

/// Live WebDriver/Appium HTTP client bound to one session.
pub struct HttpDeviceSession {
    client: Client,
    base: String,
    platform: Platform,
}

impl HttpDeviceSession {
    /// Creates a client attached to an existing session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        server_url: &str,
        session_id: &str,
        platform: Platform,
        request_timeout: Duration,
    ) -> Result<Self, DeviceError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DeviceError::Transport(e.to_string()))?;
        let base = format!("{}/session/{}", server_url.trim_end_matches('/'), session_id);
        Ok(Self { client, base, platform })
    }

    fn get(&self, path: &str) -> Result<Value, DeviceError> {
        let response = self
            .client
            .get(format!("{}/{path}", self.base))
            .send()
            .map_err(|e| DeviceError::Transport(e.to_string()))?;
        Self::unwrap_value(path, response)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, DeviceError> {
        let response = self
            .client
            .post(format!("{}/{path}", self.base))
            .json(body)
            .send()
            .map_err(|e| DeviceError::Transport(e.to_string()))?;
        Self::unwrap_value(path, response)
    }

    fn execute(&self, script: &str, args: Value) -> Result<Value, DeviceError> {
        self.post("execute/sync", &json!({ "script": script, "args": [args] }))
    }

    /// Extracts the `value` field, mapping non-success statuses onto the
    /// error message the server put in the body.
    fn unwrap_value(
        command: &str,
        response: reqwest::blocking::Response,
    ) -> Result<Value, DeviceError> {
        let status = response.status();
        let body: Value = response.json().map_err(|e| DeviceError::MalformedResponse {
            command: command.to_owned(),
            detail: e.to_string(),
        })?;

        if status.is_success() {
            return Ok(body.get("value").cloned().unwrap_or(Value::Null));
        }
        Err(DeviceError::Command {
            command: command.to_owned(),
            status: status.as_u16(),
            message: wire_error_message(&body),
        })
    }
}

/// Pulls `error`/`message` out of a WebDriver error body.
fn wire_error_message(body: &Value) -> String {
    let value = body.get("value").unwrap_or(body);
    let error = value.get("error").and_then(Value::as_str);
    let message = value.get("message").and_then(Value::as_str);
    match (error, message) {
        (Some(error), Some(message)) => format!("{error}: {message}"),
        (Some(text), None) | (None, Some(text)) => text.to_owned(),
        (None, None) => body.to_string(),
    }
}

/// Maps a selector onto a WebDriver locator strategy pair.
fn locator(selector: &Selector) -> (&'static str, &str) {
    match selector {
        Selector::Id(value) => ("id", value.as_str()),
        Selector::Xpath(value) => ("xpath", value.as_str()),
    }
}

/// Decodes the notification listing, which arrives either as a bare array
/// or wrapped in a `statusBarNotifications` object depending on the
/// automation backend.
fn parse_notifications(value: &Value) -> Vec<Notification> {
    let entries = value
        .as_array()
        .or_else(|| value.get("statusBarNotifications").and_then(Value::as_array));
    let Some(entries) = entries else {
        return Vec::new();
    };

    let field = |entry: &Value, key: &str| {
        entry.get(key).and_then(Value::as_str).map(str::to_owned)
    };
    entries
        .iter()
        .map(|entry| Notification {
            title: field(entry, "title"),
            text: field(entry, "text"),
            sub_text: field(entry, "subText"),
            big_text: field(entry, "bigText"),
        })
        .collect()
}

impl DeviceSession for HttpDeviceSession {
    fn alert_text(&self) -> Result<Option<String>, DeviceError> {
        match self.get("alert/text") {
            Ok(value) => Ok(value.as_str().map(str::to_owned)),
            // "no such alert" is ordinary absence, not a channel fault.
            Err(DeviceError::Command { ref message, .. }) if message.contains("no such alert") => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn find_texts(&self, selector: &Selector) -> Result<Vec<String>, DeviceError> {
        let (using, value) = locator(selector);
        let found = self.post("elements", &json!({ "using": using, "value": value }))?;
        let Some(elements) = found.as_array() else {
            return Ok(Vec::new());
        };

        let mut texts = Vec::new();
        for element in elements {
            let Some(id) = element
                .as_object()
                .and_then(|fields| fields.values().next())
                .and_then(Value::as_str)
            else {
                continue;
            };
            // Elements can go stale between lookup and read; skip those.
            if let Ok(text) = self.get(&format!("element/{id}/text")) {
                if let Some(text) = text.as_str() {
                    if !text.is_empty() {
                        texts.push(text.to_owned());
                    }
                }
            }
        }
        Ok(texts)
    }

    fn notifications(&self) -> Result<Vec<Notification>, DeviceError> {
        let value = self.execute("mobile: getNotifications", json!({}))?;
        Ok(parse_notifications(&value))
    }

    fn swipe(&self, gesture: &SwipeGesture) -> Result<(), DeviceError> {
        let direction = match gesture.direction {
            SwipeDirection::Down => "down",
            SwipeDirection::Up => "up",
        };
        self.execute(
            "mobile: swipeGesture",
            json!({
                "left": gesture.left,
                "top": gesture.top,
                "width": gesture.width,
                "height": gesture.height,
                "direction": direction,
                "percent": gesture.percent,
            }),
        )?;
        Ok(())
    }

    fn terminate_app(&self, app_id: &str) -> Result<(), DeviceError> {
        self.execute("mobile: terminateApp", json!({ "appId": app_id }))?;
        Ok(())
    }

    fn deep_link(&self, url: &str, package: &str) -> Result<(), DeviceError> {
        self.execute("mobile: deepLink", json!({ "url": url, "package": package }))?;
        Ok(())
    }

    fn start_activity(&self, args: &StartActivityArgs) -> Result<(), DeviceError> {
        let mut body = json!({
            "intent": args.intent,
            "package": args.package,
            "activity": args.activity,
        });
        if let Some(arguments) = &args.optional_arguments {
            body["optionalIntentArguments"] = json!(arguments);
        }
        self.execute("mobile: startActivity", body)?;
        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<(), DeviceError> {
        self.post("url", &json!({ "url": url }))?;
        Ok(())
    }

    fn set_location(&self, position: &Coordinates) -> Result<(), DeviceError> {
        match self.platform {
            Platform::Android => {
                self.execute(
                    "mobile: setLocation",
                    json!({
                        "latitude": position.latitude,
                        "longitude": position.longitude,
                        "altitude": position.altitude,
                    }),
                )?;
            }
            Platform::Ios => {
                self.execute(
                    "mobile: setSimulatedLocation",
                    json!({
                        "latitude": position.latitude,
                        "longitude": position.longitude,
                    }),
                )?;
            }
        }
        Ok(())
    }

    fn screenshot(&self) -> Result<Vec<u8>, DeviceError> {
        let value = self.get("screenshot")?;
        let encoded = value.as_str().ok_or_else(|| DeviceError::MalformedResponse {
            command: "screenshot".to_owned(),
            detail: "value is not a string".to_owned(),
        })?;
        BASE64.decode(encoded).map_err(|e| DeviceError::MalformedResponse {
            command: "screenshot".to_owned(),
            detail: e.to_string(),
        })
    }
}
