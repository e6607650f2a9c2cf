//! Concrete trigger strategies, most-direct first.
//!
//! The standard chain mirrors how reliably each primitive delivers a deep
//! link across device farms: a terminate-and-relaunch deep link is the
//! most direct, an explicit VIEW intent the next best, and plain URL
//! navigation the generic last resort.

pub mod navigate;
pub mod restart_deep_link;
pub mod start_activity;

pub use navigate::DirectNavigation;
pub use restart_deep_link::RestartDeepLink;
pub use start_activity::StartActivity;

use super::strategy::TriggerStrategy;
use super::transition::Transition;

/// Builds the standard fallback chain for a transition.
///
/// `deep_link_base` must match the app's intent filter; `activity` is the
/// activity that handles VIEW intents (relative names allowed).
#[must_use]
pub fn fallback_chain(
    transition: Transition,
    deep_link_base: &str,
    app_id: &str,
    activity: &str,
) -> Vec<Box<dyn TriggerStrategy>> {
    let url = transition.deep_link_url(deep_link_base);
    vec![
        Box::new(RestartDeepLink::new(app_id, &url)),
        Box::new(StartActivity::new(app_id, activity, &url)),
        Box::new(DirectNavigation::new(&url)),
    ]
}
