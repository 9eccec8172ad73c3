//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;
use thiserror::Error;

use crate::domain::{DodockerConfig, Host, KeyRecord, LocalKey};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Creation parameters for a new droplet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSpec<'a> {
    pub name: &'a str,
    pub region: &'a str,
    pub size: &'a str,
    pub image: &'a str,
    /// Fingerprint of the registered key to inject.
    pub ssh_key_fingerprint: &'a str,
}

/// Where and as whom to open a remote shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellTarget<'a> {
    pub address: &'a str,
    pub user: &'a str,
    pub private_key: &'a Path,
}

/// Captured result of one remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutput {
    /// `None` when the remote process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RemoteOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Why a remote shell session could not be opened.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Connection refused, timed out, or no route. Worth retrying while a
    /// droplet is still starting sshd.
    #[error("host unreachable: {0}")]
    Unreachable(String),

    /// The host answered but rejected the key.
    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ── Provider Port Traits ──────────────────────────────────────────────────────

/// Droplet operations on the cloud provider.
#[allow(async_fn_in_trait)]
pub trait HostProvider {
    /// List every droplet on the account.
    async fn list_hosts(&self) -> Result<Vec<Host>>;
    /// Request a new droplet. The provider answers before it has booted.
    async fn create_host(&self, spec: &HostSpec<'_>) -> Result<Host>;
    /// Destroy a droplet by id.
    async fn delete_host(&self, id: u64) -> Result<()>;
}

/// Account SSH key registrations on the cloud provider.
#[allow(async_fn_in_trait)]
pub trait KeyRegistry {
    /// List every registered public key.
    async fn list_keys(&self) -> Result<Vec<KeyRecord>>;
    /// Register a public key under `name`.
    async fn register_key(&self, name: &str, public_key: &str) -> Result<KeyRecord>;
    /// Remove a registration by id.
    async fn deregister_key(&self, id: u64) -> Result<()>;
}

/// Composite trait: any type implementing both sub-traits is a `CloudProvider`.
pub trait CloudProvider: HostProvider + KeyRegistry {}

/// Blanket implementation: any type implementing both sub-traits is a `CloudProvider`.
impl<T> CloudProvider for T where T: HostProvider + KeyRegistry {}

// ── Local Key Port ────────────────────────────────────────────────────────────

/// Key pair files on local disk.
#[allow(async_fn_in_trait)]
pub trait LocalKeyStore {
    /// Load the key pair named `name`, or `None` if either file is missing.
    async fn load(&self, name: &str) -> Result<Option<LocalKey>>;
    /// Generate a fresh 2048-bit RSA pair, replacing any existing files.
    async fn generate(&self, name: &str) -> Result<LocalKey>;
    /// Path of the private key file for `name` (whether or not it exists).
    fn private_key_path(&self, name: &str) -> PathBuf;
}

// ── Remote Shell Ports ────────────────────────────────────────────────────────

/// Opens remote shell sessions.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    type Session: ShellSession;

    /// Authenticate against `target`. The returned session is closed when
    /// dropped, so holding it in a scope bounds the connection's lifetime.
    async fn connect(&self, target: &ShellTarget<'_>) -> Result<Self::Session, ConnectError>;
}

/// An open, authenticated remote shell.
#[allow(async_fn_in_trait)]
pub trait ShellSession {
    /// Run `command` through the remote login shell and capture its output.
    async fn run(&self, command: &str) -> Result<RemoteOutput>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Loads persisted settings.
pub trait ConfigStore {
    /// Load settings, falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// fails validation.
    fn load(&self) -> Result<DodockerConfig>;
    /// Location of the settings file (whether or not it exists).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<std::process::ExitStatus>;
    /// Start a program with null stdio and return without waiting for it.
    /// Usable from `Drop`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Replace the current status line.
    fn step(&self, message: &str);
    /// Emit a completed sub-task.
    fn success(&self, message: &str);
    /// Emit a warning that does not stop the operation.
    fn warn(&self, message: &str);
}
