//! Application service: key pair reconciliation.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::application::ports::{KeyRegistry, LocalKeyStore, ProgressReporter};
use crate::domain::keys::{KeyAction, KeyPair, plan_key_action};

/// Make sure a key pair named `name` exists on disk and is registered with
/// the provider under the same name, with matching fingerprints.
///
/// Calling this twice in a row performs no writes on the second call.
///
/// # Errors
///
/// Returns an error if the registry or local store fails. A desynchronised
/// pair is repaired, not reported as an error.
pub async fn ensure_key_pair(
    registry: &impl KeyRegistry,
    store: &impl LocalKeyStore,
    name: &str,
    reporter: &impl ProgressReporter,
) -> Result<KeyPair> {
    reporter.step("Ensuring key exists");
    let registered = registry.list_keys().await.context("listing registered keys")?;
    let mut remote = registered.into_iter().find(|k| k.name == name);
    let mut local = store
        .load(name)
        .await
        .with_context(|| format!("loading local key {name}"))?;

    match plan_key_action(name, local.as_ref(), remote.as_ref()) {
        KeyAction::Reuse | KeyAction::RegisterExisting => {}
        KeyAction::GenerateAndRegister => {
            reporter.step("Generating key pair");
            local = Some(store.generate(name).await.context("generating key pair")?);
        }
        KeyAction::Replace { stale_id, reason } => {
            warn!(key = name, %reason, stale_id, "key pair out of sync, replacing");
            reporter.warn(&format!("{reason}; replacing key"));
            registry
                .deregister_key(stale_id)
                .await
                .with_context(|| format!("removing stale key registration {stale_id}"))?;
            remote = None;
            local = Some(store.generate(name).await.context("generating key pair")?);
        }
    }

    let local = local.with_context(|| format!("key {name} missing after reconciliation"))?;
    let record = match remote {
        Some(record) => record,
        None => {
            reporter.step("Adding key to DigitalOcean");
            let record = registry
                .register_key(name, &local.public_key)
                .await
                .with_context(|| format!("registering key {name}"))?;
            info!(key = name, id = record.id, fingerprint = %record.fingerprint, "key registered");
            record
        }
    };

    Ok(KeyPair {
        name: name.to_string(),
        private_key_path: store.private_key_path(name),
        public_key: local.public_key,
        registration_id: record.id,
        fingerprint: record.fingerprint,
    })
}
