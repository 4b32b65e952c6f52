//! Iris Watch CLI - gaze-centering focus monitor.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::watch::WatchArgs;
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Watch(ref args)) => watch(args, &config),
        Some(Commands::Config(ref args)) => {
            match commands::config::run(args, &cli.watch, &config) {
                Ok(()) => ExitCode::Success,
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::Error
                }
            }
        }
        // Default behavior: watch with flattened args
        None => watch(&cli.watch, &config),
    };

    exit_code.into()
}

fn watch(args: &WatchArgs, config: &AppConfig) -> ExitCode {
    let args = WatchArgs::with_config(args.clone(), config);
    match commands::watch::run(&args) {
        Ok(result) => result.exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
