//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod bootstrap;
pub mod config;
pub mod deployment;
pub mod error;
pub mod host;
pub mod keys;

pub use bootstrap::{InstallReport, RetryPolicy, RuntimeProbe, StepOutcome};
pub use config::{DodockerConfig, validate_config};
pub use deployment::{DeploymentRequest, PortMapping};
pub use error::{
    CommandError, ConfigError, ConnectionError, DeploymentInputError, HostError, KeyDesyncError,
    ProviderError,
};
pub use host::{Host, HostLookup, HostState, classify_hosts};
pub use keys::{KeyAction, KeyPair, KeyRecord, LocalKey, plan_key_action};
