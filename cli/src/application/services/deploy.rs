//! Application service: the deploy loop.
//!
//! Drives a deployment from "whatever is on the account" to "container
//! running": find or create a host, wait for it to boot, make sure Docker is
//! installed, then `docker run` the image. Each stage is a variant of
//! [`DeployStage`]; the loop only ever moves forward, except that booting
//! polls itself until the host turns active.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::ports::{
    CloudProvider, LocalKeyStore, ProgressReporter, RemoteShell, ShellTarget,
};
use crate::application::services::bootstrap::{InstallOptions, install_runtime, probe_runtime};
use crate::application::services::containers::{ContainerLaunch, launch_container};
use crate::application::services::credentials::ensure_key_pair;
use crate::application::services::hosts::{find_usable_host, provision_host};
use crate::domain::bootstrap::{InstallReport, RuntimeProbe};
use crate::domain::config::DodockerConfig;
use crate::domain::deployment::DeploymentRequest;
use crate::domain::error::HostError;
use crate::domain::host::{Host, HostLookup};

/// An active host with a known address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadyHost {
    pub name: String,
    pub address: String,
}

impl TryFrom<Host> for ReadyHost {
    type Error = HostError;

    fn try_from(host: Host) -> Result<Self, Self::Error> {
        match host.usable_address().map(str::to_owned) {
            Some(address) => Ok(Self {
                name: host.name,
                address,
            }),
            None => Err(HostError::NoAddress(host.name)),
        }
    }
}

/// Where the deploy loop currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployStage {
    Searching,
    Booting { polls: u32 },
    Reachable(ReadyHost),
    Installing(ReadyHost),
    Deploying(ReadyHost),
    Done(DeploySummary),
    Failed(DeployFailure),
}

impl DeployStage {
    fn name(&self) -> &'static str {
        match self {
            Self::Searching => "searching",
            Self::Booting { .. } => "booting",
            Self::Reachable(_) => "reachable",
            Self::Installing(_) => "installing",
            Self::Deploying(_) => "deploying",
            Self::Done(_) => "done",
            Self::Failed(_) => "failed",
        }
    }
}

/// A container that was started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploySummary {
    pub host: ReadyHost,
    pub container_id: String,
    /// A new droplet was created during this run.
    pub provisioned: bool,
    /// Present when Docker had to be installed.
    pub install: Option<InstallReport>,
}

/// A run that reached a host but could not start the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployFailure {
    pub host: ReadyHost,
    pub stderr: String,
    pub install: Option<InstallReport>,
}

/// Terminal result of [`deploy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed(DeploySummary),
    Failed(DeployFailure),
}

/// Deploy `request` onto the first usable droplet, creating one if the
/// account has none.
///
/// At most one droplet is created per run. Booting is polled every
/// `timing.boot_poll_secs`, forever unless `timing.max_boot_polls` is set.
///
/// # Errors
///
/// Returns an error on provider failures, on credential failures, if the
/// host cannot be reached for install or deploy, or if the boot poll budget
/// runs out. A failing `docker run` is reported as `DeployOutcome::Failed`.
pub async fn deploy<S: RemoteShell>(
    provider: &impl CloudProvider,
    keys: &impl LocalKeyStore,
    shell: &S,
    reporter: &impl ProgressReporter,
    config: &DodockerConfig,
    request: &DeploymentRequest,
) -> Result<DeployOutcome> {
    let private_key = keys.private_key_path(&config.keys.name);
    let connect = config.timing.reachability();
    let install_opts = InstallOptions {
        connect,
        step: config.timing.install_step(),
        stop_on_step_failure: config.bootstrap.stop_on_step_failure,
    };
    let mut provisioned = false;
    let mut install: Option<InstallReport> = None;
    let mut stage = DeployStage::Searching;

    loop {
        debug!(stage = stage.name(), "deploy stage");
        stage = match stage {
            DeployStage::Searching => {
                reporter.step("Searching for a host droplet");
                match find_usable_host(provider).await? {
                    HostLookup::Ready(host) => DeployStage::Reachable(host.try_into()?),
                    HostLookup::Booting => DeployStage::Booting { polls: 0 },
                    HostLookup::Absent => {
                        reporter.step("No droplets found, creating one");
                        let key = ensure_key_pair(provider, keys, &config.keys.name, reporter).await?;
                        provision_host(provider, &key, &config.provider, reporter).await?;
                        provisioned = true;
                        DeployStage::Booting { polls: 0 }
                    }
                }
            }
            DeployStage::Booting { polls } => {
                if let Some(max) = config.timing.max_boot_polls {
                    if polls >= max {
                        bail!("no droplet became active after {polls} polls");
                    }
                }
                reporter.step("Waiting for droplet to boot");
                tokio::time::sleep(config.timing.boot_poll_interval()).await;
                match find_usable_host(provider).await? {
                    HostLookup::Ready(host) => DeployStage::Reachable(host.try_into()?),
                    // A droplet that vanished while booting is waited on, not replaced.
                    HostLookup::Booting | HostLookup::Absent => DeployStage::Booting { polls: polls + 1 },
                }
            }
            DeployStage::Reachable(host) => {
                reporter.step("Checking if docker is installed");
                let target = shell_target(&host, config, &private_key);
                match probe_runtime(shell, &target, connect).await? {
                    RuntimeProbe::Installed { version } => {
                        info!(host = %host.name, %version, "docker already installed");
                        DeployStage::Deploying(host)
                    }
                    RuntimeProbe::Missing => DeployStage::Installing(host),
                    RuntimeProbe::Unreachable { attempts, reason } => {
                        warn!(host = %host.name, attempts, %reason, "host not answering, assuming docker is missing");
                        DeployStage::Installing(host)
                    }
                }
            }
            DeployStage::Installing(host) => {
                reporter.step("Installing docker");
                let target = shell_target(&host, config, &private_key);
                let report = install_runtime(shell, &target, install_opts, reporter).await?;
                if report.aborted {
                    let stderr = report
                        .failed_steps()
                        .last()
                        .map(|s| s.last_stderr.clone())
                        .unwrap_or_default();
                    DeployStage::Failed(DeployFailure {
                        host,
                        stderr,
                        install: Some(report),
                    })
                } else {
                    reporter.success("docker installed");
                    install = Some(report);
                    DeployStage::Deploying(host)
                }
            }
            DeployStage::Deploying(host) => {
                reporter.step(&format!("Deploying docker image {}", request.image));
                let target = shell_target(&host, config, &private_key);
                match launch_container(shell, &target, request, connect).await? {
                    ContainerLaunch::Started { container_id } => DeployStage::Done(DeploySummary {
                        host,
                        container_id,
                        provisioned,
                        install: install.take(),
                    }),
                    ContainerLaunch::Failed(err) => DeployStage::Failed(DeployFailure {
                        host,
                        stderr: err.stderr,
                        install: install.take(),
                    }),
                }
            }
            DeployStage::Done(summary) => return Ok(DeployOutcome::Deployed(summary)),
            DeployStage::Failed(failure) => return Ok(DeployOutcome::Failed(failure)),
        };
    }
}

fn shell_target<'a>(
    host: &'a ReadyHost,
    config: &'a DodockerConfig,
    private_key: &'a std::path::Path,
) -> ShellTarget<'a> {
    ShellTarget {
        address: &host.address,
        user: &config.remote.user,
        private_key,
    }
}
