//! `vigil watch` command.

use std::time::Duration;

use crate::config::SuiteConfig;
use crate::context::ServiceContext;
use crate::watch::sources::standard_sources;
use crate::watch::{EventWatcher, MatchPredicate, SignalSource, WatchRequest};

/// Execute the `watch` command.
///
/// Watches the standard source set for the given text and reports where
/// it surfaced. A missed deadline is a command failure so CI pipelines
/// see a non-zero exit.
///
/// # Errors
///
/// Returns an error string for a malformed request or when no signal
/// matched within the deadline.
pub fn run(
    ctx: &ServiceContext,
    config: &SuiteConfig,
    contains: &str,
    ignore_case: bool,
    timeout_secs: Option<u64>,
    poll_millis: Option<u64>,
) -> Result<(), String> {
    let predicate = if ignore_case {
        MatchPredicate::ContainsIgnoreCase(contains.to_owned())
    } else {
        MatchPredicate::Contains(contains.to_owned())
    };
    let deadline = timeout_secs.map_or_else(|| config.event_wait_timeout(), Duration::from_secs);
    let poll_interval = poll_millis.map_or_else(|| config.poll_interval(), Duration::from_millis);

    let sources = standard_sources(&config.status_text_id);
    let source_refs: Vec<&dyn SignalSource> = sources.iter().map(|source| &**source).collect();
    let request = WatchRequest::new(source_refs, predicate, poll_interval, deadline)
        .map_err(|e| e.to_string())?;

    let result = EventWatcher::new(ctx.device.as_ref(), ctx.clock.as_ref()).wait(&request);
    if result.matched {
        println!(
            "Matched on {} after {:.1}s: {}",
            result.matched_source.as_deref().unwrap_or("unknown"),
            result.elapsed.as_secs_f64(),
            result.matched_text.as_deref().unwrap_or(""),
        );
        Ok(())
    } else {
        Err(format!(
            "No signal containing {contains:?} within {:.1}s",
            deadline.as_secs_f64()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scripted::{ScriptedClock, ScriptedDevice};

    fn scripted_context(device: ScriptedDevice) -> ServiceContext {
        ServiceContext { device: Box::new(device), clock: Box::new(ScriptedClock::new()) }
    }

    #[test]
    fn reports_a_match() {
        let device = ScriptedDevice::default();
        device.push_alert(Some("Geofence EXIT detected"));
        let ctx = scripted_context(device);

        let result = run(&ctx, &SuiteConfig::default(), "EXIT", false, Some(5), Some(100));

        assert!(result.is_ok());
    }

    #[test]
    fn missed_deadline_is_an_error() {
        let ctx = scripted_context(ScriptedDevice::default());

        let result = run(&ctx, &SuiteConfig::default(), "EXIT", false, Some(1), Some(100));

        assert!(result.unwrap_err().contains("No signal"));
    }
}
