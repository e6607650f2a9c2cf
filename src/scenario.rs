//! Scenario execution — trigger an event, then independently verify it.
//!
//! A scenario drives one geofence transition into the app and watches the
//! signal surfaces for the expected text. Triggering and verification stay
//! two separate phases: a trigger that raises no channel error counts as
//! delivered, and only the watch decides whether the event actually
//! landed. The whole flow is wrapped in the scenario retry budget.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SuiteConfig;
use crate::context::ServiceContext;
use crate::ports::device::Coordinates;
use crate::retry::RetryBudget;
use crate::trigger::strategies::fallback_chain;
use crate::trigger::{ActionDispatcher, Transition};
use crate::watch::sources::standard_sources;
use crate::watch::{EventWatcher, MatchPredicate, SignalSource, WatchRequest, WatchResult};

/// Pause after a GPS update, letting the position propagate to the
/// platform location provider.
const LOCATION_SETTLE: Duration = Duration::from_millis(2000);

/// A scenario definition, loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Human-readable scenario name.
    pub name: String,
    /// The transition to drive and verify.
    pub transition: Transition,
    /// Text to expect on a signal surface. Defaults to the platform
    /// event name of the transition.
    #[serde(default)]
    pub expect: Option<String>,
    /// Match case-insensitively.
    #[serde(default)]
    pub ignore_case: bool,
    /// GPS position to set before triggering (inside the zone).
    #[serde(default)]
    pub start_location: Option<Coordinates>,
    /// GPS position to move to before triggering (outside the zone).
    #[serde(default)]
    pub move_to: Option<Coordinates>,
    /// Per-scenario watch deadline override, in seconds.
    #[serde(default)]
    pub event_wait_timeout_secs: Option<u64>,
    /// Per-scenario poll cadence override, in milliseconds.
    #[serde(default)]
    pub poll_interval_millis: Option<u64>,
}

impl ScenarioSpec {
    /// Loads a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error string if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario {}: {e}", path.display()))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse scenario {}: {e}", path.display()))
    }

    /// The predicate this scenario watches for.
    #[must_use]
    pub fn predicate(&self) -> MatchPredicate {
        let text = self
            .expect
            .clone()
            .unwrap_or_else(|| self.transition.event_name().to_owned());
        if self.ignore_case {
            MatchPredicate::ContainsIgnoreCase(text)
        } else {
            MatchPredicate::Contains(text)
        }
    }

    fn deadline(&self, config: &SuiteConfig) -> Duration {
        self.event_wait_timeout_secs
            .map_or_else(|| config.event_wait_timeout(), Duration::from_secs)
    }

    fn poll_interval(&self, config: &SuiteConfig) -> Duration {
        self.poll_interval_millis
            .map_or_else(|| config.poll_interval(), Duration::from_millis)
    }
}

/// What a passed scenario observed.
#[derive(Debug)]
pub struct ScenarioPass {
    /// The trigger strategy that delivered the event.
    pub trigger_strategy: String,
    /// The matching watch result.
    pub watch: WatchResult,
}

/// Full record of one scenario run, retries included.
#[derive(Debug)]
pub struct ScenarioReport {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// Scenario name.
    pub scenario: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Executions used, counting the initial one.
    pub executions: u32,
    /// Pass details, or the final failure message.
    pub outcome: Result<ScenarioPass, String>,
}

impl ScenarioReport {
    /// Whether the scenario ultimately passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Runs a scenario under the configured retry budget.
#[must_use]
pub fn run(ctx: &ServiceContext, config: &SuiteConfig, spec: &ScenarioSpec) -> ScenarioReport {
    let started_at = Utc::now();
    let mut executions = 0;
    let outcome = RetryBudget::new(config.retry_max).run(&spec.name, |_| {
        executions += 1;
        execute_once(ctx, config, spec)
    });

    ScenarioReport {
        run_id: Uuid::new_v4(),
        scenario: spec.name.clone(),
        started_at,
        executions,
        outcome,
    }
}

fn execute_once(
    ctx: &ServiceContext,
    config: &SuiteConfig,
    spec: &ScenarioSpec,
) -> Result<ScenarioPass, String> {
    set_location(ctx, spec.start_location.as_ref(), "start");
    set_location(ctx, spec.move_to.as_ref(), "target");

    let chain = fallback_chain(
        spec.transition,
        &config.deep_link_base,
        &config.app_id,
        &config.activity,
    );
    let trigger = ActionDispatcher::new(ctx.device.as_ref(), ctx.clock.as_ref()).trigger(&chain);
    if !trigger.succeeded {
        return Err(format!(
            "all trigger strategies failed: {}",
            trigger.failure_summary()
        ));
    }
    let trigger_strategy =
        trigger.strategy_used.clone().unwrap_or_else(|| "unknown".to_owned());

    let sources = standard_sources(&config.status_text_id);
    let source_refs: Vec<&dyn SignalSource> = sources.iter().map(|source| &**source).collect();
    let request = WatchRequest::new(
        source_refs,
        spec.predicate(),
        spec.poll_interval(config),
        spec.deadline(config),
    )
    .map_err(|e| e.to_string())?;

    let watch = EventWatcher::new(ctx.device.as_ref(), ctx.clock.as_ref()).wait(&request);
    if watch.matched {
        info!(scenario = %spec.name, strategy = %trigger_strategy, "scenario passed");
        Ok(ScenarioPass { trigger_strategy, watch })
    } else {
        Err(format!(
            "{:?} not observed within {:?} (triggered via {trigger_strategy})",
            spec.predicate(),
            spec.deadline(config),
        ))
    }
}

/// GPS updates are best-effort: the position may already be set via
/// session capabilities, so a failed update degrades to a warning.
fn set_location(ctx: &ServiceContext, position: Option<&Coordinates>, label: &str) {
    let Some(position) = position else {
        return;
    };
    match ctx.device.set_location(position) {
        Ok(()) => {
            info!(label, position.latitude, position.longitude, "location set");
            ctx.clock.sleep(LOCATION_SETTLE);
        }
        Err(err) => warn!(label, %err, "set_location failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scripted::{ScriptedClock, ScriptedDevice};

    fn scripted_context(device: ScriptedDevice) -> ServiceContext {
        ServiceContext { device: Box::new(device), clock: Box::new(ScriptedClock::new()) }
    }

    fn exit_spec() -> ScenarioSpec {
        ScenarioSpec {
            name: "android exit".to_owned(),
            transition: Transition::Exit,
            expect: None,
            ignore_case: false,
            start_location: None,
            move_to: None,
            event_wait_timeout_secs: Some(10),
            poll_interval_millis: Some(500),
        }
    }

    #[test]
    fn spec_parses_from_yaml_with_defaults() {
        let yaml = r"
name: android exit
transition: exit
move_to:
  latitude: 37.4221
  longitude: -122.0841
";
        let spec: ScenarioSpec = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(spec.transition, Transition::Exit);
        assert_eq!(spec.expect, None);
        assert!(!spec.ignore_case);
        assert!(spec.start_location.is_none());
        assert!((spec.move_to.unwrap().latitude - 37.4221).abs() < f64::EPSILON);
    }

    #[test]
    fn predicate_defaults_to_the_transition_event_name() {
        let spec = exit_spec();
        assert_eq!(
            spec.predicate(),
            MatchPredicate::Contains("GEOFENCE_TRANSITION_EXIT".to_owned())
        );

        let mut insensitive = exit_spec();
        insensitive.expect = Some("exit".to_owned());
        insensitive.ignore_case = true;
        assert_eq!(
            insensitive.predicate(),
            MatchPredicate::ContainsIgnoreCase("exit".to_owned())
        );
    }

    #[test]
    fn scenario_passes_when_a_source_matches() {
        let device = ScriptedDevice::default();
        device.push_elements(
            "com.eebax.geofencing:id/testStatusText",
            vec!["Test: GEOFENCE_TRANSITION_EXIT"],
        );
        let ctx = scripted_context(device);
        let config = SuiteConfig::default();

        let report = run(&ctx, &config, &exit_spec());

        assert!(report.passed());
        assert_eq!(report.executions, 1);
        let pass = report.outcome.unwrap();
        assert_eq!(pass.trigger_strategy, "restart_deep_link");
        assert_eq!(pass.watch.matched_source.as_deref(), Some("status_text"));
    }

    #[test]
    fn scenario_retries_and_reports_exhaustion() {
        // No source ever shows the event text; every execution times out.
        let ctx = scripted_context(ScriptedDevice::default());
        let config = SuiteConfig { retry_max: 1, ..SuiteConfig::default() };

        let report = run(&ctx, &config, &exit_spec());

        assert!(!report.passed());
        assert_eq!(report.executions, 2);
        assert!(report.outcome.unwrap_err().contains("not observed"));
    }

    #[test]
    fn failed_gps_update_does_not_fail_the_scenario() {
        let device = ScriptedDevice::default();
        device.make_unavailable("set_location");
        device.push_elements(
            "com.eebax.geofencing:id/testStatusText",
            vec!["GEOFENCE_TRANSITION_EXIT"],
        );
        let ctx = scripted_context(device);
        let config = SuiteConfig::default();

        let mut spec = exit_spec();
        spec.move_to =
            Some(Coordinates { latitude: 37.0, longitude: -122.0, altitude: 0.0 });

        assert!(run(&ctx, &config, &spec).passed());
    }
}
