//! Container listing rows produced by `docker ps` on the host droplet.

use serde::{Deserialize, Serialize};

/// Go template passed to `docker ps --format`. Fields are tab-separated.
pub const DOCKER_PS_FORMAT: &str = "{{.ID}}\t{{.Image}}\t{{.Ports}}\t{{.Status}}";

/// One running container on the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerRow {
    pub id: String,
    pub image: String,
    pub ports: String,
    pub status: String,
}

impl ContainerRow {
    /// Parse one line of `docker ps --format` output. Blank lines yield `None`.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }
        let mut fields = line.splitn(4, '\t');
        let id = fields.next()?.trim().to_string();
        let image = fields.next().unwrap_or_default().trim().to_string();
        let ports = fields.next().unwrap_or_default().trim().to_string();
        let status = fields.next().unwrap_or_default().trim().to_string();
        Some(Self { id, image, ports, status })
    }

    /// Parse the full stdout of `docker ps --format`.
    #[must_use]
    pub fn parse_all(stdout: &str) -> Vec<Self> {
        stdout.lines().filter_map(Self::parse_line).collect()
    }
}
