//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::trigger::Transition;

/// Top-level CLI parser for `vigil`.
#[derive(Debug, Parser)]
#[command(name = "vigil", version, about = "Watch and trigger mobile geofence signals")]
pub struct Cli {
    /// Path to the suite configuration file (default: ./vigil.yaml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve device responses from a YAML script instead of a live session.
    #[arg(long, global = true)]
    pub script: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch the signal surfaces for matching text.
    Watch {
        /// Substring the signal text must contain.
        #[arg(long)]
        contains: String,
        /// Match case-insensitively.
        #[arg(long)]
        ignore_case: bool,
        /// Watch deadline override, in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Poll cadence override, in milliseconds.
        #[arg(long)]
        poll_millis: Option<u64>,
    },
    /// Drive a geofence transition through the trigger fallback chain.
    Trigger {
        /// The transition to drive.
        #[arg(long, value_enum)]
        transition: Transition,
    },
    /// Run a full scenario: trigger, verify, retry on failure.
    Run {
        /// Path to the scenario YAML file.
        #[arg(long)]
        scenario: PathBuf,
    },
}
