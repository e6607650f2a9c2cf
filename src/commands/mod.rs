//! Command dispatch and handlers.

pub mod run;
pub mod trigger;
pub mod watch;

use crate::cli::{Cli, Command};
use crate::config::SuiteConfig;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// Configuration is loaded once, then the context is wired up: scripted
/// when `--script` is given, live otherwise.
///
/// # Errors
///
/// Returns an error string if configuration loading, context creation,
/// or the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = SuiteConfig::load(cli.config.as_deref())?;
    let ctx = match &cli.script {
        Some(path) => ServiceContext::scripted(path)?,
        None => ServiceContext::live(&config)?,
    };

    match &cli.command {
        Command::Watch { contains, ignore_case, timeout_secs, poll_millis } => {
            watch::run(&ctx, &config, contains, *ignore_case, *timeout_secs, *poll_millis)
        }
        Command::Trigger { transition } => trigger::run(&ctx, &config, *transition),
        Command::Run { scenario } => run::run(&ctx, &config, scenario),
    }
}
