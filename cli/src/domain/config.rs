//! Domain types and validators for dodocker settings.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::bootstrap::RetryPolicy;
use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com/v2";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level settings stored in `~/.dodocker/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DodockerConfig {
    pub provider: ProviderConfig,
    pub keys: KeyConfig,
    pub remote: RemoteConfig,
    pub timing: TimingConfig,
    pub bootstrap: BootstrapConfig,
}

/// Where and what to provision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_url: String,
    pub region: String,
    pub size: String,
    pub image: String,
    /// Droplet names are `<name_prefix>-<uuid>`.
    pub name_prefix: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            region: "fra1".to_string(),
            size: "s-1vcpu-1gb".to_string(),
            image: "ubuntu-20-04-x64".to_string(),
            name_prefix: "dodocker".to_string(),
        }
    }
}

/// Key pair naming and location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyConfig {
    pub name: String,
    /// Relative paths resolve against the working directory.
    pub dir: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            name: "dodocker".to_string(),
            dir: "keys".to_string(),
        }
    }
}

/// Remote shell settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RemoteConfig {
    pub user: String,
    pub connect_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

/// Poll and retry timings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub boot_poll_secs: u64,
    /// `None` waits forever for a droplet to boot.
    pub max_boot_polls: Option<u32>,
    pub reach_attempts: u32,
    pub reach_delay_secs: u64,
    pub step_attempts: u32,
    pub step_delay_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            boot_poll_secs: 5,
            max_boot_polls: None,
            reach_attempts: 5,
            reach_delay_secs: 2,
            step_attempts: 3,
            step_delay_secs: 2,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub fn boot_poll_interval(&self) -> Duration {
        Duration::from_secs(self.boot_poll_secs)
    }

    #[must_use]
    pub fn reachability(&self) -> RetryPolicy {
        RetryPolicy::new(self.reach_attempts, Duration::from_secs(self.reach_delay_secs))
    }

    #[must_use]
    pub fn install_step(&self) -> RetryPolicy {
        RetryPolicy::new(self.step_attempts, Duration::from_secs(self.step_delay_secs))
    }
}

/// Bootstrap behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Stop installing once a step exhausts its retries. When off, the
    /// sequence runs to the end and failures are reported per step.
    pub stop_on_step_failure: bool,
}

// ── Validators ───────────────────────────────────────────────────────────────

fn invalid(key: &str, value: impl ToString, hint: &str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
    .into()
}

/// Validates a loaded configuration.
///
/// # Errors
///
/// Returns an error naming the first invalid setting.
pub fn validate_config(config: &DodockerConfig) -> Result<()> {
    if config.timing.reach_attempts == 0 {
        return Err(invalid("timing.reach_attempts", 0, "Must be at least 1."));
    }
    if config.timing.step_attempts == 0 {
        return Err(invalid("timing.step_attempts", 0, "Must be at least 1."));
    }
    if config.timing.max_boot_polls == Some(0) {
        return Err(invalid(
            "timing.max_boot_polls",
            0,
            "Must be at least 1, or omitted to wait indefinitely.",
        ));
    }
    let api = &config.provider.api_url;
    if !(api.starts_with("https://") || api.starts_with("http://")) {
        return Err(invalid("provider.api_url", api, "Must be an http(s) URL."));
    }
    let name = &config.keys.name;
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid(
            "keys.name",
            name,
            "Use letters, digits, '-' or '_' only.",
        ));
    }
    for (key, value) in [
        ("provider.region", &config.provider.region),
        ("provider.size", &config.provider.size),
        ("provider.image", &config.provider.image),
        ("provider.name_prefix", &config.provider.name_prefix),
        ("remote.user", &config.remote.user),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(key, "(empty)", "Must not be empty."));
        }
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
