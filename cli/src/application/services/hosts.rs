//! Host locator and provisioner.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::application::ports::{HostProvider, HostSpec, ProgressReporter};
use crate::domain::config::ProviderConfig;
use crate::domain::host::{find_by_name, Host, HostLookup};
use crate::domain::{HostError, KeyPair, classify_hosts};

/// Scan the account for a droplet to deploy onto.
///
/// # Errors
///
/// Returns an error if the provider cannot list droplets.
pub async fn find_usable_host(provider: &impl HostProvider) -> Result<HostLookup> {
    let hosts = provider.list_hosts().await.context("listing droplets")?;
    let lookup = classify_hosts(&hosts);
    debug!(hosts = hosts.len(), ?lookup, "classified droplets");
    Ok(lookup)
}

/// `<prefix>-<uuid v4>`. Every call mints a new name.
#[must_use]
pub fn unique_host_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

/// Request a new droplet with `key` injected. Returns as soon as the provider
/// accepts; the droplet is still `pending`.
///
/// A retry after failure always mints a new name, so a request that was
/// accepted but whose response was lost leaves an orphaned droplet behind.
///
/// # Errors
///
/// Returns an error if the provider does not accept the request.
pub async fn provision_host(
    provider: &impl HostProvider,
    key: &KeyPair,
    settings: &ProviderConfig,
    reporter: &impl ProgressReporter,
) -> Result<Host> {
    let name = unique_host_name(&settings.name_prefix);
    reporter.step("Creating droplet");
    let host = provider
        .create_host(&HostSpec {
            name: &name,
            region: &settings.region,
            size: &settings.size,
            image: &settings.image,
            ssh_key_fingerprint: &key.fingerprint,
        })
        .await
        .with_context(|| format!("creating droplet {name}"))?;
    info!(host = %host.name, id = host.id, region = %settings.region, "droplet requested");
    reporter.success(&format!("droplet {} requested", host.name));
    Ok(host)
}

/// Look a droplet up by its exact name.
///
/// # Errors
///
/// Returns `HostError::NotFound` if no droplet has that name, or an error if
/// the provider cannot list droplets.
pub async fn find_host(provider: &impl HostProvider, name: &str) -> Result<Host> {
    let hosts = provider.list_hosts().await.context("listing droplets")?;
    find_by_name(&hosts, name)
        .cloned()
        .ok_or_else(|| HostError::NotFound(name.to_string()).into())
}

/// Resolve the address of an active droplet by name.
///
/// # Errors
///
/// Returns `HostError::NotFound` if no droplet has that name and
/// `HostError::NoAddress` if it is not active yet.
pub async fn resolve_address(provider: &impl HostProvider, name: &str) -> Result<String> {
    let host = find_host(provider, name).await?;
    host.usable_address()
        .map(str::to_owned)
        .ok_or_else(|| HostError::NoAddress(name.to_string()).into())
}

/// Destroy a droplet by name.
///
/// # Errors
///
/// Returns `HostError::NotFound` if no droplet has that name, or the
/// provider error if deletion is refused.
pub async fn delete_host(provider: &impl HostProvider, name: &str) -> Result<Host> {
    let host = find_host(provider, name).await?;
    provider
        .delete_host(host.id)
        .await
        .with_context(|| format!("deleting droplet {name}"))?;
    info!(host = %host.name, id = host.id, "droplet deleted");
    Ok(host)
}
