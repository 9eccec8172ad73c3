//! Deployment requests and remote command construction.
//!
//! Pure functions only: no I/O, no async.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::DeploymentInputError;

/// `host_port:container_port` pair passed to `docker run -p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortMapping {
    pub host: u16,
    pub container: u16,
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.container)
    }
}

fn parse_port(raw: &str) -> Result<u16, DeploymentInputError> {
    match raw.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(DeploymentInputError::PortOutOfRange(raw.to_string())),
        Ok(p) => Ok(p),
    }
}

impl FromStr for PortMapping {
    type Err = DeploymentInputError;

    /// Accepts `HOST:CONTAINER` or a bare `PORT` (published on the same port).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [port] if !port.trim().is_empty() => {
                let p = parse_port(port)?;
                Ok(Self { host: p, container: p })
            }
            [host, container] if !host.trim().is_empty() && !container.trim().is_empty() => Ok(Self {
                host: parse_port(host)?,
                container: parse_port(container)?,
            }),
            _ => Err(DeploymentInputError::MalformedPort(s.to_string())),
        }
    }
}

/// Image plus ordered port mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentRequest {
    pub image: String,
    pub ports: Vec<PortMapping>,
}

impl DeploymentRequest {
    /// Build a request, validating the image reference.
    ///
    /// The image ends up inside a remote shell command line, so only the
    /// characters a registry reference can contain are accepted.
    ///
    /// # Errors
    ///
    /// Returns `DeploymentInputError::InvalidImage` for empty references or
    /// references containing shell metacharacters.
    pub fn new(image: &str, ports: Vec<PortMapping>) -> Result<Self, DeploymentInputError> {
        let valid = !image.is_empty()
            && !image.starts_with('-')
            && image
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '/' | ':' | '@'));
        if !valid {
            return Err(DeploymentInputError::InvalidImage(image.to_string()));
        }
        Ok(Self {
            image: image.to_string(),
            ports,
        })
    }

    /// `docker run -d -p H:C … <image>`, mappings in the order supplied.
    #[must_use]
    pub fn run_command(&self) -> String {
        let mut cmd = String::from("docker run -d");
        for mapping in &self.ports {
            cmd.push_str(&format!(" -p {mapping}"));
        }
        cmd.push(' ');
        cmd.push_str(&self.image);
        cmd
    }
}
