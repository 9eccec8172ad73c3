//! Infrastructure implementation of the `LocalKeyStore` port.
//!
//! Key pairs live as `<dir>/<name>.pem` (private, mode 0600) and
//! `<dir>/<name>.pub`. Generation and fingerprinting shell out to
//! `ssh-keygen`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::application::ports::{CommandRunner, LocalKeyStore};
use crate::domain::LocalKey;

static MD5_FINGERPRINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern, cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"MD5:((?:[0-9a-fA-F]{2}:){15}[0-9a-fA-F]{2})").expect("valid regex")
});

/// Extract the colon-separated MD5 fingerprint from `ssh-keygen -l -E md5`
/// output.
#[must_use]
pub fn parse_md5_fingerprint(output: &str) -> Option<String> {
    MD5_FINGERPRINT_RE
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// Key pairs on local disk.
pub struct FsKeyStore<R: CommandRunner> {
    dir: PathBuf,
    runner: R,
}

impl<R: CommandRunner> FsKeyStore<R> {
    pub fn new(dir: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            dir: dir.into(),
            runner,
        }
    }

    fn public_key_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.pub"))
    }

    async fn fingerprint(&self, public_key_path: &Path) -> Result<String> {
        let path = public_key_path.to_string_lossy();
        let output = self
            .runner
            .run("ssh-keygen", &["-l", "-E", "md5", "-f", &path])
            .await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            anyhow::bail!(
                "ssh-keygen could not fingerprint {}: {}",
                public_key_path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        parse_md5_fingerprint(&stdout)
            .with_context(|| format!("unexpected ssh-keygen output: {}", stdout.trim()))
    }
}

impl<R: CommandRunner> LocalKeyStore for FsKeyStore<R> {
    async fn load(&self, name: &str) -> Result<Option<LocalKey>> {
        let private = self.private_key_path(name);
        let public = self.public_key_path(name);
        if !private.exists() || !public.exists() {
            tracing::debug!(key = name, "local key pair incomplete or absent");
            return Ok(None);
        }
        let public_key = std::fs::read_to_string(&public)
            .with_context(|| format!("cannot read {}", public.display()))?
            .trim()
            .to_string();
        let fingerprint = self.fingerprint(&public).await?;
        Ok(Some(LocalKey {
            public_key,
            fingerprint,
        }))
    }

    async fn generate(&self, name: &str) -> Result<LocalKey> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("cannot create {}", self.dir.display()))?;
        set_permissions(&self.dir, 0o700)?;

        let private = self.private_key_path(name);
        let public = self.public_key_path(name);
        let generated_pub = self.dir.join(format!("{name}.pem.pub"));
        for stale in [&private, &public, &generated_pub] {
            if stale.exists() {
                std::fs::remove_file(stale)
                    .with_context(|| format!("cannot remove {}", stale.display()))?;
            }
        }

        let private_arg = private.to_string_lossy();
        let output = self
            .runner
            .run(
                "ssh-keygen",
                &[
                    "-q", "-t", "rsa", "-b", "2048", "-m", "PEM", "-N", "", "-C", name, "-f",
                    &private_arg,
                ],
            )
            .await?;
        if !output.status.success() {
            anyhow::bail!(
                "ssh-keygen failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        std::fs::rename(&generated_pub, &public).with_context(|| {
            format!("cannot move {} to {}", generated_pub.display(), public.display())
        })?;
        set_permissions(&private, 0o600)?;
        tracing::info!(key = name, path = %private.display(), "generated key pair");

        let public_key = std::fs::read_to_string(&public)
            .with_context(|| format!("cannot read {}", public.display()))?
            .trim()
            .to_string();
        let fingerprint = self.fingerprint(&public).await?;
        Ok(LocalKey {
            public_key,
            fingerprint,
        })
    }

    fn private_key_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.pem"))
    }
}

#[cfg(unix)]
fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .with_context(|| format!("set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
