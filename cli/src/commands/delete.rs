//! `dodocker delete droplet <name>`: destroy a droplet.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ProgressReporter as _;
use crate::application::services::hosts::delete_host;
use crate::output::json;

#[derive(Subcommand, Debug)]
pub enum DeleteCommand {
    /// Destroy a droplet by name
    Droplet {
        /// Droplet name as shown by `dodocker list droplets`
        name: String,
    },
}

/// Run the delete command.
///
/// # Errors
///
/// Returns an error if no droplet has that name or the provider refuses.
pub async fn run(app: &AppContext, cmd: DeleteCommand) -> Result<ExitCode> {
    let DeleteCommand::Droplet { name } = cmd;
    let provider = app.provider()?;

    if !approved(app, &name)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let reporter = app.reporter();
    reporter.step(&format!("Deleting droplet {name}"));
    let host = match delete_host(&provider, &name).await {
        Ok(host) => host,
        Err(e) => {
            reporter.finish_fail(&format!("Could not delete {name}"));
            return Err(e);
        }
    };
    reporter.finish_ok(&format!("Droplet {name} deleted"));
    drop(reporter);

    if app.is_json() {
        json::print(&serde_json::json!({ "deleted": host }))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// `--yes`, `CI` and `DODOCKER_YES` go ahead; otherwise ask, defaulting to no.
fn approved(app: &AppContext, name: &str) -> Result<bool> {
    Ok(app.non_interactive || app.confirm(&format!("Destroy droplet {name}?"), false)?)
}
