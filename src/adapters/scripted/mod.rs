//! Scripted adapters serving canned responses.
//!
//! Substituting these for the live adapters makes watch and trigger
//! behavior fully deterministic: the clock advances virtually instead of
//! sleeping, and the device answers from per-channel response queues that
//! can be loaded from a YAML script.

pub mod clock;
pub mod device;

pub use clock::ScriptedClock;
pub use device::{DeviceScript, ScriptedDevice};
