//! `dodocker list droplets|deployments|keys`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;
use dodocker_common::ContainerRow;

use crate::app::AppContext;
use crate::application::ports::{HostProvider, KeyRegistry, LocalKeyStore, ShellTarget};
use crate::application::services::containers::list_containers;
use crate::application::services::hosts::find_usable_host;
use crate::domain::HostLookup;
use crate::output::json;

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// Droplets on the account and their state
    Droplets,
    /// Containers running on the deployment droplet
    Deployments,
    /// SSH keys registered on the account
    Keys,
}

/// Run the list command.
///
/// # Errors
///
/// Returns an error if the provider or the droplet cannot be queried.
pub async fn run(app: &AppContext, cmd: ListCommand) -> Result<ExitCode> {
    let provider = app.provider()?;
    match cmd {
        ListCommand::Droplets => {
            let hosts = provider.list_hosts().await?;
            if app.is_json() {
                json::print(&hosts)?;
            } else {
                app.renderer().render_droplets(&hosts);
            }
        }
        ListCommand::Keys => {
            let keys = provider.list_keys().await?;
            if app.is_json() {
                json::print(&keys)?;
            } else {
                app.renderer().render_keys(&keys);
            }
        }
        ListCommand::Deployments => {
            let rows = deployments(app, &provider).await?;
            if app.is_json() {
                json::print(&rows)?;
            } else {
                app.renderer().render_containers(&rows);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn deployments(app: &AppContext, provider: &impl HostProvider) -> Result<Vec<ContainerRow>> {
    let HostLookup::Ready(host) = find_usable_host(provider).await? else {
        return Ok(Vec::new());
    };
    let Some(address) = host.usable_address() else {
        return Ok(Vec::new());
    };
    let private_key = app.key_store().private_key_path(&app.config.keys.name);
    let target = ShellTarget {
        address,
        user: &app.config.remote.user,
        private_key: &private_key,
    };
    list_containers(&app.remote_shell(), &target, app.config.timing.reachability()).await
}
