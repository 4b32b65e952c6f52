//! Config command - inspect layered configuration.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::watch::WatchArgs;
use crate::config::{find_project_config, xdg_config_path, AppConfig, PROJECT_CONFIG_FILE};

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective settings as TOML
    Show,
    /// Print the config file search locations
    Path,
}

/// Run the config command.
///
/// `watch` carries any top-level flags so `show` reflects them too.
pub fn run(args: &ConfigArgs, watch: &WatchArgs, config: &AppConfig) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(watch, config),
        ConfigCommand::Path => print_paths(),
    }
}

fn show(watch: &WatchArgs, config: &AppConfig) -> Result<()> {
    let merged = WatchArgs::with_config(watch.clone(), config);
    let rendered =
        toml::to_string_pretty(&merged.settings()).context("Failed to render settings")?;
    print!("{rendered}");
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn print_paths() -> Result<()> {
    match xdg_config_path() {
        Some(path) => {
            let state = if path.exists() { "found" } else { "not found" };
            println!("user:    {} ({state})", path.display());
        }
        None => println!("user:    (no config directory on this platform)"),
    }

    match find_project_config() {
        Some(path) => println!("project: {} (found)", path.display()),
        None => println!("project: {PROJECT_CONFIG_FILE} (not found in current directory or parents)"),
    }

    Ok(())
}
