//! Application service: container launch and listing on the host droplet.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use dodocker_common::containers::{ContainerRow, DOCKER_PS_FORMAT};
use tracing::{info, warn};

use crate::application::ports::{RemoteShell, ShellSession, ShellTarget};
use crate::application::services::bootstrap::connect_with_retry;
use crate::domain::bootstrap::RetryPolicy;
use crate::domain::deployment::DeploymentRequest;
use crate::domain::error::CommandError;

/// Result of a single `docker run` attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerLaunch {
    Started { container_id: String },
    Failed(CommandError),
}

/// Start the requested container. Runs `docker run` exactly once.
///
/// # Errors
///
/// Returns a `ConnectionError` if the host cannot be reached. A non-zero exit
/// from `docker run` is not an error; it is `ContainerLaunch::Failed`.
pub async fn launch_container(
    shell: &impl RemoteShell,
    target: &ShellTarget<'_>,
    request: &DeploymentRequest,
    connect: RetryPolicy,
) -> Result<ContainerLaunch> {
    let session = connect_with_retry(shell, target, connect).await?;
    let command = request.run_command();
    let output = session
        .run(&command)
        .await
        .with_context(|| format!("running {command}"))?;
    if output.success() {
        let container_id = output.stdout.trim().to_string();
        info!(address = target.address, image = %request.image, %container_id, "container started");
        Ok(ContainerLaunch::Started { container_id })
    } else {
        warn!(address = target.address, image = %request.image, exit = ?output.exit_code, "docker run failed");
        Ok(ContainerLaunch::Failed(CommandError {
            command,
            exit_code: output.exit_code,
            stderr: output.stderr,
        }))
    }
}

/// Running containers on the host, as reported by `docker ps`.
///
/// # Errors
///
/// Returns a `ConnectionError` if the host cannot be reached and a
/// `CommandError` if `docker ps` fails.
pub async fn list_containers(
    shell: &impl RemoteShell,
    target: &ShellTarget<'_>,
    connect: RetryPolicy,
) -> Result<Vec<ContainerRow>> {
    let session = connect_with_retry(shell, target, connect).await?;
    let command = format!("docker ps --format '{DOCKER_PS_FORMAT}'");
    let output = session.run(&command).await.context("running docker ps")?;
    if !output.success() {
        return Err(CommandError {
            command,
            exit_code: output.exit_code,
            stderr: output.stderr,
        }
        .into());
    }
    Ok(ContainerRow::parse_all(&output.stdout))
}
