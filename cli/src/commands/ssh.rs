//! `dodocker ssh <name>`: interactive shell on a droplet.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{CommandRunner, LocalKeyStore, ShellTarget};
use crate::application::services::hosts::resolve_address;
use crate::infra::openssh::interactive_args;

#[derive(Args, Debug)]
pub struct SshArgs {
    /// Droplet name as shown by `dodocker list droplets`
    pub name: String,
}

/// Open an interactive session and return the remote exit code.
///
/// # Errors
///
/// Returns an error if the droplet is unknown or not active, or `ssh`
/// cannot be spawned.
pub async fn run(app: &AppContext, args: &SshArgs) -> Result<ExitCode> {
    let provider = app.provider()?;
    let address = resolve_address(&provider, &args.name).await?;
    let private_key = app.key_store().private_key_path(&app.config.keys.name);
    let target = ShellTarget {
        address: &address,
        user: &app.config.remote.user,
        private_key: &private_key,
    };
    let argv = interactive_args(&target, app.config.remote.connect_timeout_secs);
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();

    let status = app.local_runner().run_status("ssh", &argv).await?;
    let code = status.code().unwrap_or(255);
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(255)))
}
