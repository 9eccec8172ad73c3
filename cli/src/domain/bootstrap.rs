//! Docker bootstrap sequence, retry policy and per-step outcomes.
//!
//! Pure data: the runner that executes these lives in
//! `application::services::bootstrap`.

use std::time::Duration;

use serde::Serialize;

/// Command used to decide whether Docker is already installed.
pub const RUNTIME_PROBE_COMMAND: &str = "docker --version";

/// Ordered Docker CE install sequence for Ubuntu droplets.
pub const INSTALL_STEPS: &[&str] = &[
    "sudo apt-get update",
    "sudo apt-get install -y ca-certificates curl gnupg",
    "sudo install -m 0755 -d /etc/apt/keyrings",
    "curl -fsSL https://download.docker.com/linux/ubuntu/gpg | sudo gpg --batch --yes --dearmor -o /etc/apt/keyrings/docker.gpg",
    "sudo chmod a+r /etc/apt/keyrings/docker.gpg",
    r#"echo "deb [arch="$(dpkg --print-architecture)" signed-by=/etc/apt/keyrings/docker.gpg] https://download.docker.com/linux/ubuntu "$(. /etc/os-release && echo "$VERSION_CODENAME")" stable" | sudo tee /etc/apt/sources.list.d/docker.list > /dev/null"#,
    "sudo apt-get update",
    "sudo apt-get install -y docker-ce docker-ce-cli containerd.io docker-buildx-plugin docker-compose-plugin",
];

/// Fixed-backoff retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1.
    pub attempts: u32,
    /// Pause after each failed attempt.
    pub delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Reachability probing: 5 attempts, 2 s apart.
    #[must_use]
    pub fn reachability() -> Self {
        Self::new(5, Duration::from_secs(2))
    }

    /// Install steps: 3 attempts, 2 s apart.
    #[must_use]
    pub fn install_step() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

/// What the reachability probe learned about the runtime.
///
/// Kept three-valued so callers can tell "unreachable" from "not installed"
/// even though the deploy loop treats both the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeProbe {
    Installed { version: String },
    Missing,
    Unreachable { attempts: u32, reason: String },
}

impl RuntimeProbe {
    #[must_use]
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }
}

/// Result of one install step after its retry budget was spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// 1-based position in the sequence.
    pub index: usize,
    pub command: String,
    pub attempts: u32,
    pub succeeded: bool,
    /// Stderr of the last failed attempt, empty on success.
    pub last_stderr: String,
}

/// Outcome of a full install run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub steps: Vec<StepOutcome>,
    /// `true` when the run stopped early because a step was exhausted.
    pub aborted: bool,
}

impl InstallReport {
    /// Steps that exhausted their retry budget.
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| !s.succeeded)
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        !self.aborted && self.steps.iter().all(|s| s.succeeded)
    }
}
