//! CLI command definitions and handlers.

pub mod config;
pub mod watch;

use clap::{Parser, Subcommand};

/// Iris Watch - gaze-centering focus monitor
#[derive(Parser)]
#[command(name = "iris-watch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared watch arguments (input, thresholds, reporting).
    #[command(flatten)]
    pub watch: watch::WatchArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Track focus from a stream of face landmarks
    Watch(watch::WatchArgs),
    /// Inspect configuration
    Config(config::ConfigArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Session ended without a sustained-inattention alert.
    Success = 0,
    /// At least one sustained-inattention alert was raised.
    AlertRaised = 1,
    /// Invalid arguments, unreadable input, or another failure.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
