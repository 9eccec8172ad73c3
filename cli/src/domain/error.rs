//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Provider errors ───────────────────────────────────────────────────────────

/// The provider API answered with a status code the call did not expect.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("DigitalOcean API returned HTTP {status}: {body}")]
pub struct ProviderError {
    pub status: u16,
    /// Raw response body, kept verbatim for diagnosis.
    pub body: String,
}

// ── Remote shell errors ───────────────────────────────────────────────────────

/// The remote shell could not be reached after exhausting connection retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot reach {address} over ssh after {attempts} attempt(s): {reason}")]
pub struct ConnectionError {
    pub address: String,
    pub attempts: u32,
    pub reason: String,
}

/// A remote command exited non-zero (after any retries it was entitled to).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("remote command failed (exit {}): {command}\n{stderr}", .exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
pub struct CommandError {
    pub command: String,
    pub exit_code: Option<i32>,
    pub stderr: String,
}

// ── Credential errors ─────────────────────────────────────────────────────────

/// Local key material and the provider registration disagree.
///
/// Always handled by remediation inside the credential service; it is logged,
/// never returned to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyDesyncError {
    #[error("key '{name}' is registered with the provider but missing locally")]
    MissingLocal { name: String },

    #[error("key '{name}' differs: local fingerprint {local}, registered fingerprint {remote}")]
    FingerprintMismatch {
        name: String,
        local: String,
        remote: String,
    },
}

// ── Host errors ───────────────────────────────────────────────────────────────

/// Errors related to looking up a droplet by name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("Droplet {0} not found")]
    NotFound(String),

    #[error("Droplet {0} is not active yet")]
    NoAddress(String),
}

// ── Input errors ──────────────────────────────────────────────────────────────

/// Invalid `create deployment` arguments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeploymentInputError {
    #[error("invalid port mapping '{0}': expected HOST:CONTAINER or PORT")]
    MalformedPort(String),

    #[error("invalid port '{0}': must be a number between 1 and 65535")]
    PortOutOfRange(String),

    #[error("invalid image reference '{0}'")]
    InvalidImage(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to settings validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DIGITALOCEAN_TOKEN is not set.\n\nExport it or add it to .env in the current directory.")]
    MissingToken,

    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}
