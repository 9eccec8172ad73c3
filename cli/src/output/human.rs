//! Human-readable terminal renderer.

use dodocker_common::ContainerRow;
use owo_colors::OwoColorize as _;

use crate::application::services::deploy::{DeployFailure, DeploySummary};
use crate::domain::{Host, HostState, KeyRecord};
use crate::output::OutputContext;

/// One droplet line: `🟢 name (ip)`, `🔴 name (off)` or `🟡 name (starting up)`.
#[must_use]
pub fn droplet_line(host: &Host) -> String {
    match host.state {
        HostState::Active => format!(
            "🟢 {} ({})",
            host.name,
            host.address.as_deref().unwrap_or("no address yet")
        ),
        HostState::Off => format!("🔴 {} (off)", host.name),
        HostState::Pending => format!("🟡 {} (starting up)", host.name),
    }
}

#[must_use]
pub fn key_line(key: &KeyRecord) -> String {
    format!("{} ({})", key.name, key.fingerprint)
}

#[must_use]
pub fn container_line(row: &ContainerRow) -> String {
    let ports = if row.ports.is_empty() { "-" } else { &row.ports };
    format!("{}  {}  {}  {}", row.id, row.image, ports, row.status)
}

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    pub fn render_droplets(&self, hosts: &[Host]) {
        if hosts.is_empty() {
            println!("No droplets found");
            return;
        }
        for host in hosts {
            let style = self.ctx.styles.for_state(host.state);
            println!("{}", droplet_line(host).style(style));
        }
    }

    pub fn render_keys(&self, keys: &[KeyRecord]) {
        if keys.is_empty() {
            println!("No keys found");
            return;
        }
        for key in keys {
            println!("{}", key_line(key));
        }
    }

    pub fn render_containers(&self, rows: &[ContainerRow]) {
        if rows.is_empty() {
            println!("No deployments found");
            return;
        }
        for row in rows {
            println!("{}", container_line(row));
        }
    }

    pub fn render_created(&self, host: &Host) {
        self.ctx.header("Droplet requested");
        self.ctx.kv("Droplet:", &host.name);
        self.ctx.kv("Status:", &droplet_line(host));
    }

    pub fn render_deployed(&self, summary: &DeploySummary) {
        self.ctx.header("Deployment");
        self.ctx.kv("Host:", &summary.host.name);
        self.ctx.kv("Address:", &summary.host.address);
        self.ctx.kv("Container:", &summary.container_id);
        if let Some(report) = &summary.install {
            for step in report.failed_steps() {
                self.ctx.warn(&format!(
                    "install step {} failed after {} attempts: {}",
                    step.index, step.attempts, step.command
                ));
            }
        }
    }

    /// Always printed, the remote error text verbatim.
    pub fn render_deploy_failure(&self, failure: &DeployFailure) {
        eprintln!(
            "{} {}",
            "Deployment failed on".style(self.ctx.styles.error),
            failure.host.address
        );
        eprintln!("{}", failure.stderr.trim_end());
    }
}
