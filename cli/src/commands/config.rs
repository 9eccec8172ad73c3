//! `dodocker config`: show effective settings.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show effective settings (file values over defaults)
    Show,
    /// Print the settings file location
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the settings cannot be serialized or the path cannot
/// be determined.
pub fn run(app: &AppContext, store: &impl ConfigStore, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => {
            if app.is_json() {
                json::print(&app.config)?;
            } else {
                let yaml = serde_yaml::to_string(&app.config).context("cannot serialize config")?;
                print!("{yaml}");
            }
        }
        ConfigCommand::Path => println!("{}", store.path()?.display()),
    }
    Ok(ExitCode::SUCCESS)
}
