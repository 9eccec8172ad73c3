//! `dodocker deploy <image> [-p PORTS…]`: run a container on a droplet,
//! provisioning and bootstrapping one first if needed.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::deploy::{DeployOutcome, deploy};
use crate::domain::deployment::{DeploymentRequest, PortMapping};
use crate::output::json;

/// Arguments shared by `deploy` and `create deployment`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Image reference, e.g. `nginx` or `ghcr.io/org/app:1.2`
    pub image: String,

    /// Published ports as HOST:CONTAINER, or PORT for the same port on both sides
    #[arg(short = 'p', long = "ports", value_name = "PORT")]
    pub ports: Vec<PortMapping>,
}

/// Run the deploy loop and report its outcome.
///
/// # Errors
///
/// Returns an error if the request is invalid or the deploy loop fails
/// before reaching `docker run`.
pub async fn run(app: &AppContext, args: DeployArgs) -> Result<ExitCode> {
    let request = DeploymentRequest::new(&args.image, args.ports)?;
    let provider = app.provider()?;
    let keys = app.key_store();
    let shell = app.remote_shell();
    let reporter = app.reporter();

    let outcome = match deploy(&provider, &keys, &shell, &reporter, &app.config, &request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            reporter.finish_fail("Deployment failed");
            return Err(e);
        }
    };

    match outcome {
        DeployOutcome::Deployed(summary) => {
            reporter.finish_ok(&format!(
                "Deployed {} to {}",
                request.image, summary.host.address
            ));
            drop(reporter);
            if app.is_json() {
                json::print(&summary)?;
            } else {
                app.renderer().render_deployed(&summary);
            }
            Ok(ExitCode::SUCCESS)
        }
        DeployOutcome::Failed(failure) => {
            reporter.finish_fail("Deployment failed");
            drop(reporter);
            if app.is_json() {
                json::print(&serde_json::json!({
                    "error": true,
                    "host": failure.host,
                    "stderr": failure.stderr,
                }))?;
            } else {
                app.renderer().render_deploy_failure(&failure);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
