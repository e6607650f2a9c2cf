//! Live adapters backed by the real system clock and automation server.

pub mod clock;
pub mod device;

pub use clock::SystemClock;
pub use device::HttpDeviceSession;
