//! Key pair records and the local/remote reconciliation decision.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use serde::Serialize;

use crate::domain::error::KeyDesyncError;

/// A key registration as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyRecord {
    pub id: u64,
    pub name: String,
    pub fingerprint: String,
}

/// Key material found on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalKey {
    /// OpenSSH-encoded public key line.
    pub public_key: String,
    /// MD5 fingerprint in `aa:bb:…` form.
    pub fingerprint: String,
}

/// A key pair that exists locally and is registered with the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub name: String,
    pub private_key_path: std::path::PathBuf,
    pub public_key: String,
    pub registration_id: u64,
    pub fingerprint: String,
}

/// What the credential service must do to bring local and remote in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Both sides present and matching.
    Reuse,
    /// Local key exists but nothing is registered under the name.
    RegisterExisting,
    /// Neither side exists.
    GenerateAndRegister,
    /// The registration is stale. Delete it, regenerate locally, register again.
    Replace {
        stale_id: u64,
        reason: KeyDesyncError,
    },
}

/// Normalise a fingerprint for comparison (`MD5:` prefix, case).
#[must_use]
pub fn normalize_fingerprint(fp: &str) -> String {
    let fp = fp.trim();
    fp.strip_prefix("MD5:").unwrap_or(fp).to_ascii_lowercase()
}

/// Decide the reconciliation action for a named key.
///
/// Any mismatch is destructive on the provider side: a private key can never
/// be recovered from a registration, so the local side always wins or is
/// regenerated.
#[must_use]
pub fn plan_key_action(name: &str, local: Option<&LocalKey>, remote: Option<&KeyRecord>) -> KeyAction {
    match (local, remote) {
        (None, None) => KeyAction::GenerateAndRegister,
        (Some(_), None) => KeyAction::RegisterExisting,
        (None, Some(record)) => KeyAction::Replace {
            stale_id: record.id,
            reason: KeyDesyncError::MissingLocal {
                name: name.to_string(),
            },
        },
        (Some(local), Some(record)) => {
            let local_fp = normalize_fingerprint(&local.fingerprint);
            let remote_fp = normalize_fingerprint(&record.fingerprint);
            if local_fp == remote_fp {
                KeyAction::Reuse
            } else {
                KeyAction::Replace {
                    stale_id: record.id,
                    reason: KeyDesyncError::FingerprintMismatch {
                        name: name.to_string(),
                        local: local_fp,
                        remote: remote_fp,
                    },
                }
            }
        }
    }
}
