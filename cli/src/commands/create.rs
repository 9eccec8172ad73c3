//! `dodocker create droplet|deployment`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::services::credentials::ensure_key_pair;
use crate::application::services::hosts::provision_host;
use crate::commands::deploy::{self, DeployArgs};
use crate::output::json;

#[derive(Subcommand, Debug)]
pub enum CreateCommand {
    /// Create a droplet with the dodocker key installed (does not wait for boot)
    Droplet,
    /// Deploy an image, creating and bootstrapping a droplet if needed
    Deployment(DeployArgs),
}

/// Run the create command.
///
/// # Errors
///
/// Returns an error if credentials cannot be reconciled or the provider
/// rejects the request.
pub async fn run(app: &AppContext, cmd: CreateCommand) -> Result<ExitCode> {
    match cmd {
        CreateCommand::Droplet => create_droplet(app).await,
        CreateCommand::Deployment(args) => deploy::run(app, args).await,
    }
}

async fn create_droplet(app: &AppContext) -> Result<ExitCode> {
    let provider = app.provider()?;
    let keys = app.key_store();
    let reporter = app.reporter();

    let created = async {
        let key = ensure_key_pair(&provider, &keys, &app.config.keys.name, &reporter).await?;
        provision_host(&provider, &key, &app.config.provider, &reporter).await
    }
    .await;
    let host = match created {
        Ok(host) => host,
        Err(e) => {
            reporter.finish_fail("Droplet creation failed");
            return Err(e);
        }
    };
    reporter.finish_ok(&format!("Droplet {} created", host.name));
    drop(reporter);

    if app.is_json() {
        json::print(&host)?;
    } else {
        app.renderer().render_created(&host);
    }
    Ok(ExitCode::SUCCESS)
}
