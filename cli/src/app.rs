//! Application context: unified state passed to every command handler.
//!
//! `AppContext` owns the output context, the loaded settings and the
//! provider token, and builds the infrastructure adapters on demand so that
//! commands which never talk to the provider never need a token.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::config::DodockerConfig;
use crate::domain::error::ConfigError;
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, DEFAULT_REMOTE_TIMEOUT, TokioCommandRunner};
use crate::infra::digitalocean::DigitalOceanClient;
use crate::infra::keystore::FsKeyStore;
use crate::infra::openssh::OpenSshShell;
use crate::output::{HumanRenderer, OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `DODOCKER_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
    /// Provider API token, if one was supplied.
    pub token: Option<String>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Effective settings.
    pub config: DodockerConfig,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
    token: Option<String>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags and loaded settings.
    #[must_use]
    pub fn new(flags: AppFlags, config: DodockerConfig) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("DODOCKER_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet || flags.output.json),
            mode,
            config,
            non_interactive,
            token: flags.token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Spinner-backed progress reporter. Silent in JSON mode.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Authenticated provider client.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingToken` if no token was supplied.
    pub fn provider(&self) -> Result<DigitalOceanClient> {
        let token = self.token.as_deref().ok_or(ConfigError::MissingToken)?;
        DigitalOceanClient::new(&self.config.provider.api_url, token)
    }

    /// Runner for local tools (`ssh`, `ssh-keygen`).
    #[must_use]
    pub fn local_runner(&self) -> TokioCommandRunner {
        TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT)
    }

    #[must_use]
    pub fn key_store(&self) -> FsKeyStore<TokioCommandRunner> {
        FsKeyStore::new(PathBuf::from(&self.config.keys.dir), self.local_runner())
    }

    #[must_use]
    pub fn remote_shell(&self) -> OpenSshShell<TokioCommandRunner> {
        OpenSshShell::new(
            self.local_runner(),
            self.config.remote.connect_timeout_secs,
            DEFAULT_REMOTE_TIMEOUT,
        )
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `DODOCKER_YES`
    /// env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
