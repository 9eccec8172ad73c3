//! JSON output helpers for `--json`.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{
    ConfigError, ConnectionError, DeploymentInputError, HostError, ProviderError,
};

/// Machine-readable code for a top-level error.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<ConfigError>().is_some() {
        "config_error"
    } else if err.downcast_ref::<ProviderError>().is_some() {
        "provider_error"
    } else if err.downcast_ref::<HostError>().is_some() {
        "host_error"
    } else if err.downcast_ref::<ConnectionError>().is_some() {
        "connection_error"
    } else if err.downcast_ref::<DeploymentInputError>().is_some() {
        "invalid_input"
    } else {
        "error"
    }
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Pretty-print any serializable value.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Print `value` to stdout as pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", format(value)?);
    Ok(())
}
