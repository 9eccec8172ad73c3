use serde::{Deserialize, Serialize};

/// Droplet status as reported by the DigitalOcean API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DropletStatus {
    New,
    Active,
    Off,
    Archive,
    #[serde(other)]
    Unknown,
}

/// A single IPv4 interface attached to a droplet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkV4 {
    pub ip_address: String,
    /// `public` or `private`
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Networks {
    #[serde(default)]
    pub v4: Vec<NetworkV4>,
}

/// Droplet record (only the fields dodocker reads)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Droplet {
    pub id: u64,
    pub name: String,
    pub status: DropletStatus,
    #[serde(default)]
    pub networks: Networks,
}

impl Droplet {
    /// Public IPv4 address, falling back to the first listed interface.
    #[must_use]
    pub fn public_ipv4(&self) -> Option<&str> {
        self.networks
            .v4
            .iter()
            .find(|n| n.kind == "public")
            .or_else(|| self.networks.v4.first())
            .map(|n| n.ip_address.as_str())
            .filter(|ip| !ip.is_empty())
    }
}

/// `GET /v2/droplets` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropletList {
    pub droplets: Vec<Droplet>,
}

/// `POST /v2/droplets` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropletEnvelope {
    pub droplet: Droplet,
}

/// `POST /v2/droplets` request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDropletRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: String,
    /// Key ids or fingerprints to inject into the droplet
    pub ssh_keys: Vec<String>,
}

/// Account SSH key record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SshKey {
    pub id: u64,
    pub name: String,
    pub fingerprint: String,
    #[serde(default)]
    pub public_key: String,
}

/// `GET /v2/account/keys` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshKeyList {
    pub ssh_keys: Vec<SshKey>,
}

/// `POST /v2/account/keys` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshKeyEnvelope {
    pub ssh_key: SshKey,
}

/// `POST /v2/account/keys` request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateSshKeyRequest {
    pub name: String,
    pub public_key: String,
}
