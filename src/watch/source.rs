//! Signal source trait — one queryable surface that may be showing event text.

use crate::ports::clock::Clock;
use crate::ports::device::DeviceSession;

/// A surface on the device that may currently display event-relevant text.
///
/// Implementations are stateless and reusable across watches; each call
/// queries the device fresh. Absence of a signal and an unreachable
/// channel both come back as `None` — a flaky source must never abort
/// the watch that is polling it. Sources log folded faults themselves.
///
/// The clock is for short, source-specific settle pauses (e.g. letting
/// the notification panel finish its open animation before scraping);
/// a query must never block longer than its own small budget.
pub trait SignalSource: Send + Sync {
    /// Stable identity used in results and logs.
    fn name(&self) -> &str;

    /// Queries the surface once, returning its current text if any.
    fn query(&self, device: &dyn DeviceSession, clock: &dyn Clock) -> Option<String>;
}
