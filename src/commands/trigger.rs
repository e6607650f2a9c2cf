//! `vigil trigger` command.

use crate::config::SuiteConfig;
use crate::context::ServiceContext;
use crate::trigger::strategies::fallback_chain;
use crate::trigger::{ActionDispatcher, Transition};

/// Execute the `trigger` command.
///
/// Drives one transition through the fallback chain and reports which
/// strategy delivered it. Triggering does not verify that the event
/// landed; follow with `vigil watch` for that.
///
/// # Errors
///
/// Returns an error string when every strategy in the chain failed.
pub fn run(
    ctx: &ServiceContext,
    config: &SuiteConfig,
    transition: Transition,
) -> Result<(), String> {
    let chain = fallback_chain(transition, &config.deep_link_base, &config.app_id, &config.activity);
    let outcome = ActionDispatcher::new(ctx.device.as_ref(), ctx.clock.as_ref()).trigger(&chain);

    if outcome.succeeded {
        println!(
            "Triggered {} via {}",
            transition.event_name(),
            outcome.strategy_used.as_deref().unwrap_or("unknown"),
        );
        if !outcome.attempts.is_empty() {
            println!("Failed attempts: {}", outcome.failure_summary());
        }
        Ok(())
    } else {
        Err(format!(
            "All trigger strategies failed for {}: {}",
            transition.event_name(),
            outcome.failure_summary(),
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
    fn succeeds_via_the_first_strategy() {
        let ctx = scripted_context(ScriptedDevice::default());

        assert!(run(&ctx, &SuiteConfig::default(), Transition::Exit).is_ok());
    }

    #[test]
    fn falls_through_when_the_direct_strategy_fails() {
        let device = ScriptedDevice::default();
        device.make_unavailable("terminate_app");
        let ctx = scripted_context(device);

        // restart_deep_link fails, start_activity takes over.
        assert!(run(&ctx, &SuiteConfig::default(), Transition::Enter).is_ok());
    }

    #[test]
    fn full_exhaustion_is_an_error() {
        let device = ScriptedDevice::default();
        device.make_unavailable("terminate_app");
        device.make_unavailable("start_activity");
        device.make_unavailable("navigate");
        let ctx = scripted_context(device);

        let error = run(&ctx, &SuiteConfig::default(), Transition::Exit).unwrap_err();

        assert!(error.contains("All trigger strategies failed"));
        assert!(error.contains("restart_deep_link"));
        assert!(error.contains("navigate"));
    }
}
