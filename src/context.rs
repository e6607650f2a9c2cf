//! Service context bundling the port trait objects.

use std::path::Path;

use crate::adapters::live::{HttpDeviceSession, SystemClock};
use crate::adapters::scripted::{DeviceScript, ScriptedClock, ScriptedDevice};
use crate::config::SuiteConfig;
use crate::ports::clock::Clock;
use crate::ports::device::DeviceSession;

/// Bundles the device session and clock behind one handle.
///
/// Each scenario owns its context exclusively for its lifetime; nothing
/// in here is shared across scenario threads. Constructors wire up the
/// live or scripted adapter sets.
pub struct ServiceContext {
    /// The automation channel.
    pub device: Box<dyn DeviceSession>,
    /// Time source and sleeper.
    pub clock: Box<dyn Clock>,
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext").finish_non_exhaustive()
    }
}

impl ServiceContext {
    /// Creates a live context attached to the configured automation session.
    ///
    /// # Errors
    ///
    /// Returns an error string when no session id is configured or the
    /// HTTP client cannot be constructed.
    pub fn live(config: &SuiteConfig) -> Result<Self, String> {
        let session_id = config
            .session_id
            .as_deref()
            .ok_or("No automation session configured: set session_id or VIGIL_SESSION_ID")?;
        let device = HttpDeviceSession::new(
            &config.server_url,
            session_id,
            config.platform,
            config.request_timeout(),
        )
        .map_err(|e| format!("Failed to create device session: {e}"))?;

        Ok(Self { device: Box::new(device), clock: Box::new(SystemClock) })
    }

    /// Creates a scripted context from a device script file.
    ///
    /// The clock is scripted too, so scripted runs finish immediately
    /// while reporting live-equivalent timings.
    ///
    /// # Errors
    ///
    /// Returns an error string if the script cannot be read or parsed.
    pub fn scripted(script_path: &Path) -> Result<Self, String> {
        let script = DeviceScript::load(script_path)?;
        Ok(Self {
            device: Box::new(ScriptedDevice::from_script(script)),
            clock: Box::new(ScriptedClock::new()),
        })
    }
}
