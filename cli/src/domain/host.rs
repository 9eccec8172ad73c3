//! Host (droplet) records and the usable-host classification.
//!
//! Pure functions only: no I/O, no async.

use dodocker_common::{Droplet, DropletStatus};
use serde::Serialize;

/// Lifecycle state of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostState {
    /// Accepted by the provider, still booting.
    Pending,
    /// Running and addressable.
    Active,
    /// Powered off, archived or otherwise unusable.
    Off,
}

impl From<DropletStatus> for HostState {
    fn from(status: DropletStatus) -> Self {
        match status {
            DropletStatus::New => Self::Pending,
            DropletStatus::Active => Self::Active,
            DropletStatus::Off | DropletStatus::Archive | DropletStatus::Unknown => Self::Off,
        }
    }
}

/// A provider-managed virtual machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Host {
    pub id: u64,
    pub name: String,
    pub state: HostState,
    /// Public IPv4 address. Only ever `Some` for `Active` hosts.
    pub address: Option<String>,
}

impl Host {
    /// Address to connect to, present only when the host is active.
    #[must_use]
    pub fn usable_address(&self) -> Option<&str> {
        match self.state {
            HostState::Active => self.address.as_deref(),
            HostState::Pending | HostState::Off => None,
        }
    }
}

impl From<&Droplet> for Host {
    fn from(droplet: &Droplet) -> Self {
        let state = HostState::from(droplet.status);
        let address = match state {
            HostState::Active => droplet.public_ipv4().map(str::to_owned),
            HostState::Pending | HostState::Off => None,
        };
        Self {
            id: droplet.id,
            name: droplet.name.clone(),
            state,
            address,
        }
    }
}

/// Result of scanning the host list for something to deploy onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostLookup {
    /// An active host with an address.
    Ready(Host),
    /// No active host yet, but at least one is booting. Wait, don't create.
    Booting,
    /// Nothing usable or booting. Provision a new host.
    Absent,
}

/// Classify a host list.
///
/// The first active host with an address wins regardless of position. An
/// active host that has not been assigned an address yet counts as booting.
#[must_use]
pub fn classify_hosts(hosts: &[Host]) -> HostLookup {
    if let Some(ready) = hosts.iter().find(|h| h.usable_address().is_some()) {
        return HostLookup::Ready(ready.clone());
    }
    let booting = hosts.iter().any(|h| match h.state {
        HostState::Pending => true,
        HostState::Active => h.address.is_none(),
        HostState::Off => false,
    });
    if booting {
        HostLookup::Booting
    } else {
        HostLookup::Absent
    }
}

/// Find a host by exact name.
#[must_use]
pub fn find_by_name<'a>(hosts: &'a [Host], name: &str) -> Option<&'a Host> {
    hosts.iter().find(|h| h.name == name)
}
