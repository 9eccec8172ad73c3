//! Application service: reachability probing and Docker installation.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::application::ports::{
    ConnectError, ProgressReporter, RemoteShell, ShellSession, ShellTarget,
};
use crate::domain::bootstrap::{
    INSTALL_STEPS, InstallReport, RUNTIME_PROBE_COMMAND, RetryPolicy, RuntimeProbe, StepOutcome,
};
use crate::domain::error::ConnectionError;

/// Open a session, retrying while the host refuses connections.
///
/// Only `ConnectError::Unreachable` is retried. A rejected key or any other
/// failure ends the attempt immediately.
///
/// # Errors
///
/// Returns a `ConnectionError` once the budget is spent or on the first
/// non-retryable failure.
pub async fn connect_with_retry<S: RemoteShell>(
    shell: &S,
    target: &ShellTarget<'_>,
    policy: RetryPolicy,
) -> Result<S::Session, ConnectionError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let reason = match shell.connect(target).await {
            Ok(session) => return Ok(session),
            Err(ConnectError::Unreachable(reason)) => reason,
            Err(other) => {
                return Err(ConnectionError {
                    address: target.address.to_string(),
                    attempts: attempt,
                    reason: format!("{other:#}"),
                });
            }
        };
        debug!(address = target.address, attempt, %reason, "host unreachable");
        if attempt >= policy.attempts {
            return Err(ConnectionError {
                address: target.address.to_string(),
                attempts: attempt,
                reason,
            });
        }
        tokio::time::sleep(policy.delay).await;
    }
}

/// Ask the host whether Docker is installed.
///
/// # Errors
///
/// Returns an error only if a session was opened but the probe command could
/// not be executed at all.
pub async fn probe_runtime(
    shell: &impl RemoteShell,
    target: &ShellTarget<'_>,
    policy: RetryPolicy,
) -> Result<RuntimeProbe> {
    let session = match connect_with_retry(shell, target, policy).await {
        Ok(session) => session,
        Err(e) => {
            warn!(address = target.address, attempts = e.attempts, reason = %e.reason, "reachability probe gave up");
            return Ok(RuntimeProbe::Unreachable {
                attempts: e.attempts,
                reason: e.reason,
            });
        }
    };
    let output = session
        .run(RUNTIME_PROBE_COMMAND)
        .await
        .context("running docker probe")?;
    if output.success() {
        let version = output.stdout.trim().to_string();
        debug!(address = target.address, %version, "docker present");
        Ok(RuntimeProbe::Installed { version })
    } else {
        debug!(address = target.address, exit = ?output.exit_code, "docker missing");
        Ok(RuntimeProbe::Missing)
    }
}

/// `true` only if the host answered and `docker --version` exited 0.
/// An unreachable host counts as "not installed".
///
/// # Errors
///
/// See [`probe_runtime`].
pub async fn is_runtime_installed(
    shell: &impl RemoteShell,
    target: &ShellTarget<'_>,
    policy: RetryPolicy,
) -> Result<bool> {
    Ok(probe_runtime(shell, target, policy).await?.is_installed())
}

/// Install tuning.
#[derive(Debug, Clone, Copy)]
pub struct InstallOptions {
    pub connect: RetryPolicy,
    pub step: RetryPolicy,
    pub stop_on_step_failure: bool,
}

/// Run the Docker install sequence in order, one session for the whole run.
///
/// A step that exhausts its retries is recorded as failed and the sequence
/// moves on, unless `stop_on_step_failure` is set.
///
/// # Errors
///
/// Returns a `ConnectionError` if no session can be opened, or an error if
/// the transport fails while running a step.
pub async fn install_runtime(
    shell: &impl RemoteShell,
    target: &ShellTarget<'_>,
    opts: InstallOptions,
    reporter: &impl ProgressReporter,
) -> Result<InstallReport> {
    let session = connect_with_retry(shell, target, opts.connect).await?;
    let report = run_steps(&session, INSTALL_STEPS, opts, reporter).await?;
    info!(
        address = target.address,
        failed = report.failed_steps().count(),
        aborted = report.aborted,
        "docker install finished"
    );
    Ok(report)
}

pub(crate) async fn run_steps(
    session: &impl ShellSession,
    steps: &[&str],
    opts: InstallOptions,
    reporter: &impl ProgressReporter,
) -> Result<InstallReport> {
    let mut report = InstallReport::default();
    let total = steps.len();
    for (i, command) in steps.iter().enumerate() {
        reporter.step(&format!("Installing docker [{}/{total}]", i + 1));
        let outcome = run_step(session, i + 1, command, opts.step).await?;
        let failed = !outcome.succeeded;
        if failed {
            warn!(step = outcome.index, command, attempts = outcome.attempts, stderr = %outcome.last_stderr, "install step failed");
            reporter.warn(&format!(
                "step {}/{total} failed after {} attempts: {command}",
                outcome.index, outcome.attempts
            ));
        }
        report.steps.push(outcome);
        if failed && opts.stop_on_step_failure {
            report.aborted = true;
            break;
        }
    }
    Ok(report)
}

async fn run_step(
    session: &impl ShellSession,
    index: usize,
    command: &str,
    policy: RetryPolicy,
) -> Result<StepOutcome> {
    let mut last_stderr = String::new();
    for attempt in 1..=policy.attempts {
        let output = session
            .run(command)
            .await
            .with_context(|| format!("running install step {index}"))?;
        if output.success() {
            debug!(step = index, attempt, "install step ok");
            return Ok(StepOutcome {
                index,
                command: command.to_string(),
                attempts: attempt,
                succeeded: true,
                last_stderr: String::new(),
            });
        }
        debug!(step = index, attempt, exit = ?output.exit_code, "install step attempt failed");
        last_stderr = output.stderr;
        if attempt < policy.attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }
    Ok(StepOutcome {
        index,
        command: command.to_string(),
        attempts: policy.attempts,
        succeeded: false,
        last_stderr,
    })
}
