//! Adapter implementations of the port traits.
//!
//! `live` talks to a real automation server; `scripted` serves canned
//! responses for tests and offline runs.

pub mod live;
pub mod scripted;
