//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::{DodockerConfig, validate_config};

/// Overrides `provider.api_url` when set.
pub const API_URL_ENV: &str = "DODOCKER_API_URL";
/// Overrides the settings file location when set.
pub const CONFIG_PATH_ENV: &str = "DODOCKER_CONFIG";

/// Production implementation of `ConfigStore` that reads a YAML file on disk.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<DodockerConfig> {
        let path = self.path()?;
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("cannot parse {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            DodockerConfig::default()
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.provider.api_url = url;
        }
        validate_config(&config).with_context(|| format!("invalid settings in {}", path.display()))?;
        Ok(config)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".dodocker").join("config.yaml"))
    }
}
