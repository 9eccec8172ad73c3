//! Infrastructure implementation of the `RemoteShell` port on top of the
//! OpenSSH client binary.
//!
//! `connect` starts a multiplexing master (`ControlMaster`) whose socket
//! lives in a private temp directory. Every `run` reuses that connection.
//! Dropping the session starts `ssh -O exit` through the runner without
//! waiting, and removes the directory. The master also exits on its own
//! after [`MASTER_IDLE_SECS`] without clients.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tempfile::TempDir;

use crate::application::ports::{
    CommandRunner, ConnectError, RemoteOutput, RemoteShell, ShellSession, ShellTarget,
};

/// `ssh` exits with this code when the failure is its own, not the remote
/// command's.
const SSH_CLIENT_FAILURE: i32 = 255;

/// Idle lifetime of a control master once no session is using it.
pub const MASTER_IDLE_SECS: u64 = 30;

const UNREACHABLE_MARKERS: &[&str] = &[
    "Connection refused",
    "Connection timed out",
    "Operation timed out",
    "No route to host",
    "Network is unreachable",
    "Could not resolve hostname",
    "Connection reset",
    "Connection closed by",
    "kex_exchange_identification",
];

/// Map `ssh` stderr from a failed connection attempt onto a `ConnectError`.
#[must_use]
pub fn classify_connect_failure(stderr: &str) -> ConnectError {
    let stderr = stderr.trim();
    if stderr.contains("Permission denied") {
        ConnectError::AuthRejected(stderr.to_string())
    } else if UNREACHABLE_MARKERS.iter().any(|m| stderr.contains(m)) {
        ConnectError::Unreachable(stderr.to_string())
    } else {
        ConnectError::Other(anyhow::anyhow!("ssh failed: {stderr}"))
    }
}

/// Options shared by every `ssh` invocation against a droplet.
///
/// Droplets are created fresh, so host keys are never pinned.
#[must_use]
pub fn base_options(private_key: &Path, connect_timeout_secs: u64) -> Vec<String> {
    vec![
        "-i".to_string(),
        private_key.to_string_lossy().into_owned(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        "-o".to_string(),
        "UserKnownHostsFile=/dev/null".to_string(),
        "-o".to_string(),
        "LogLevel=ERROR".to_string(),
        "-o".to_string(),
        format!("ConnectTimeout={connect_timeout_secs}"),
    ]
}

/// Arguments for an interactive login with inherited stdio.
#[must_use]
pub fn interactive_args(target: &ShellTarget<'_>, connect_timeout_secs: u64) -> Vec<String> {
    let mut args = base_options(target.private_key, connect_timeout_secs);
    args.push(format!("{}@{}", target.user, target.address));
    args
}

/// Opens OpenSSH sessions.
pub struct OpenSshShell<R: CommandRunner> {
    runner: Arc<R>,
    connect_timeout_secs: u64,
    command_timeout: Duration,
}

impl<R: CommandRunner> OpenSshShell<R> {
    pub fn new(runner: R, connect_timeout_secs: u64, command_timeout: Duration) -> Self {
        Self {
            runner: Arc::new(runner),
            connect_timeout_secs,
            command_timeout,
        }
    }
}

impl<R: CommandRunner> RemoteShell for OpenSshShell<R> {
    type Session = OpenSshSession<R>;

    async fn connect(&self, target: &ShellTarget<'_>) -> Result<Self::Session, ConnectError> {
        let control_dir = tempfile::Builder::new()
            .prefix("dodocker-ssh")
            .tempdir()
            .map_err(|e| ConnectError::Other(anyhow::Error::new(e).context("creating control dir")))?;
        let control_path = control_dir.path().join("cm").to_string_lossy().into_owned();

        let mut options = base_options(target.private_key, self.connect_timeout_secs);
        options.extend([
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ControlPath={control_path}"),
        ]);
        let destination = format!("{}@{}", target.user, target.address);

        let persist = format!("ControlPersist={MASTER_IDLE_SECS}");
        let mut args: Vec<&str> = options.iter().map(String::as_str).collect();
        args.extend([
            "-o",
            "ControlMaster=auto",
            "-o",
            persist.as_str(),
            destination.as_str(),
            "true",
        ]);
        // ssh enforces ConnectTimeout itself; the outer bound only catches hangs.
        let outer = Duration::from_secs(self.connect_timeout_secs + 5);
        let output = self.runner.run_with_timeout("ssh", &args, outer).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(%destination, exit = ?output.status.code(), stderr = %stderr.trim(), "ssh connect failed");
            return Err(classify_connect_failure(&stderr));
        }
        tracing::debug!(%destination, "ssh master established");
        Ok(OpenSshSession {
            runner: Arc::clone(&self.runner),
            options,
            destination,
            command_timeout: self.command_timeout,
            _control_dir: control_dir,
        })
    }
}

/// An open multiplexed connection.
pub struct OpenSshSession<R: CommandRunner> {
    runner: Arc<R>,
    options: Vec<String>,
    destination: String,
    command_timeout: Duration,
    // Holds the control socket; removed once Drop has asked the master to exit.
    _control_dir: TempDir,
}

impl<R: CommandRunner> ShellSession for OpenSshSession<R> {
    async fn run(&self, command: &str) -> Result<RemoteOutput> {
        let mut args: Vec<&str> = self.options.iter().map(String::as_str).collect();
        args.extend([self.destination.as_str(), command]);
        let output = self
            .runner
            .run_with_timeout("ssh", &args, self.command_timeout)
            .await?;
        let exit_code = output.status.code();
        if exit_code == Some(SSH_CLIENT_FAILURE) {
            tracing::debug!(destination = %self.destination, "ssh exited 255, connection may have dropped");
        }
        Ok(RemoteOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl<R: CommandRunner> Drop for OpenSshSession<R> {
    fn drop(&mut self) {
        let mut args: Vec<&str> = self.options.iter().map(String::as_str).collect();
        args.extend(["-O", "exit", self.destination.as_str()]);
        match self.runner.spawn_detached("ssh", &args) {
            Ok(()) => tracing::debug!(destination = %self.destination, "ssh master exit requested"),
            Err(e) => {
                tracing::debug!(destination = %self.destination, error = %e, "ssh master left to idle out");
            }
        }
    }
}
