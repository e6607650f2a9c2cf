//! `vigil run` command.

use std::path::Path;

use tracing::warn;

use crate::config::SuiteConfig;
use crate::context::ServiceContext;
use crate::scenario::{self, ScenarioReport, ScenarioSpec};

/// Execute the `run` command.
///
/// Loads the scenario, runs it under the retry budget, prints a report,
/// and saves a best-effort screenshot next to the scenario file when the
/// final execution failed.
///
/// # Errors
///
/// Returns an error string if the scenario cannot be loaded or did not
/// pass within its retry budget.
pub fn run(ctx: &ServiceContext, config: &SuiteConfig, scenario_path: &Path) -> Result<(), String> {
    let spec = ScenarioSpec::load(scenario_path)?;
    let report = scenario::run(ctx, config, &spec);
    print_report(&report);

    match &report.outcome {
        Ok(_) => Ok(()),
        Err(message) => {
            save_failure_screenshot(ctx, scenario_path, &report);
            Err(format!("Scenario '{}' failed: {message}", report.scenario))
        }
    }
}

fn print_report(report: &ScenarioReport) {
    println!("Scenario '{}' run {}", report.scenario, report.run_id);
    println!("  started {}", report.started_at.to_rfc3339());
    println!("  executions: {}", report.executions);
    match &report.outcome {
        Ok(pass) => {
            println!(
                "  PASSED: {} showed {:?} after {:.1}s (triggered via {})",
                pass.watch.matched_source.as_deref().unwrap_or("unknown"),
                pass.watch.matched_text.as_deref().unwrap_or(""),
                pass.watch.elapsed.as_secs_f64(),
                pass.trigger_strategy,
            );
        }
        Err(message) => println!("  FAILED: {message}"),
    }
}

/// Captures the screen for diagnosis. Best-effort: a failure here only
/// warns, it never masks the scenario failure itself.
fn save_failure_screenshot(ctx: &ServiceContext, scenario_path: &Path, report: &ScenarioReport) {
    let bytes = match ctx.device.screenshot() {
        Ok(bytes) if !bytes.is_empty() => bytes,
        Ok(_) => return,
        Err(err) => {
            warn!(%err, "failure screenshot capture failed");
            return;
        }
    };

    let stem = scenario_path
        .file_stem()
        .map_or_else(|| "scenario".to_owned(), |stem| stem.to_string_lossy().into_owned());
    let path = scenario_path.with_file_name(format!("{stem}-failure-{}.png", report.run_id));
    match std::fs::write(&path, bytes) {
        Ok(()) => println!("  screenshot saved to {}", path.display()),
        Err(err) => warn!(%err, "failure screenshot write failed"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::adapters::scripted::{ScriptedClock, ScriptedDevice};

    fn scripted_context(device: ScriptedDevice) -> ServiceContext {
        ServiceContext { device: Box::new(device), clock: Box::new(ScriptedClock::new()) }
    }

    fn scenario_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn passing_scenario_returns_ok() {
        let device = ScriptedDevice::default();
        device.push_alert(Some("GEOFENCE_TRANSITION_EXIT"));
        let ctx = scripted_context(device);
        let file = scenario_file(
            "name: exit\ntransition: exit\nevent_wait_timeout_secs: 5\npoll_interval_millis: 500\n",
        );

        assert!(run(&ctx, &SuiteConfig::default(), file.path()).is_ok());
    }

    #[test]
    fn failing_scenario_surfaces_the_watch_failure() {
        let ctx = scripted_context(ScriptedDevice::default());
        let file = scenario_file(
            "name: exit\ntransition: exit\nevent_wait_timeout_secs: 2\npoll_interval_millis: 500\n",
        );

        let error = run(&ctx, &SuiteConfig::default(), file.path()).unwrap_err();

        assert!(error.contains("Scenario 'exit' failed"));
    }

    #[test]
    fn unreadable_scenario_fails_before_any_device_traffic() {
        let device = ScriptedDevice::default();
        let ctx = ServiceContext {
            device: Box::new(device),
            clock: Box::new(ScriptedClock::new()),
        };

        let error =
            run(&ctx, &SuiteConfig::default(), Path::new("/does/not/exist.yaml")).unwrap_err();

        assert!(error.contains("Failed to read scenario"));
    }
}
