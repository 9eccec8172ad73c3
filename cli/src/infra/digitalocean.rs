//! DigitalOcean REST client implementing `HostProvider` and `KeyRegistry`.

use std::time::Duration;

use anyhow::{Context, Result};
use dodocker_common::{
    CreateDropletRequest, CreateSshKeyRequest, DropletEnvelope, DropletList, SshKey,
    SshKeyEnvelope, SshKeyList,
};
use reqwest::{Response, StatusCode};
use tracing::debug;

use crate::application::ports::{HostProvider, HostSpec, KeyRegistry};
use crate::domain::error::ProviderError;
use crate::domain::{Host, KeyRecord};

/// Largest page the API serves. One page covers any account this tool
/// manages.
const PAGE_SIZE: u32 = 200;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated API client. The token is held only here.
pub struct DigitalOceanClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl DigitalOceanClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("dodocker/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Pass the response through if it has the expected status, otherwise
    /// turn it into a `ProviderError` carrying the body.
    async fn expect_status(response: Response, expected: StatusCode) -> Result<Response> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), %body, "unexpected provider response");
        Err(ProviderError {
            status: status.as_u16(),
            body,
        }
        .into())
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .query(&[("per_page", PAGE_SIZE)])
            .send()
            .await
            .with_context(|| format!("GET {path}"))?;
        Self::expect_status(response, StatusCode::OK)
            .await?
            .json()
            .await
            .with_context(|| format!("decoding GET {path}"))
    }

    async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {path}"))?;
        Self::expect_status(response, expected)
            .await?
            .json()
            .await
            .with_context(|| format!("decoding POST {path}"))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await
            .with_context(|| format!("DELETE {path}"))?;
        Self::expect_status(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }
}

fn key_record(key: SshKey) -> KeyRecord {
    KeyRecord {
        id: key.id,
        name: key.name,
        fingerprint: key.fingerprint,
    }
}

impl HostProvider for DigitalOceanClient {
    async fn list_hosts(&self) -> Result<Vec<Host>> {
        let list: DropletList = self.get("/droplets").await?;
        Ok(list.droplets.iter().map(Host::from).collect())
    }

    async fn create_host(&self, spec: &HostSpec<'_>) -> Result<Host> {
        let request = CreateDropletRequest {
            name: spec.name.to_string(),
            region: spec.region.to_string(),
            size: spec.size.to_string(),
            image: spec.image.to_string(),
            ssh_keys: vec![spec.ssh_key_fingerprint.to_string()],
        };
        let created: DropletEnvelope = self
            .post("/droplets", &request, StatusCode::ACCEPTED)
            .await?;
        Ok(Host::from(&created.droplet))
    }

    async fn delete_host(&self, id: u64) -> Result<()> {
        self.delete(&format!("/droplets/{id}")).await
    }
}

impl KeyRegistry for DigitalOceanClient {
    async fn list_keys(&self) -> Result<Vec<KeyRecord>> {
        let list: SshKeyList = self.get("/account/keys").await?;
        Ok(list.ssh_keys.into_iter().map(key_record).collect())
    }

    async fn register_key(&self, name: &str, public_key: &str) -> Result<KeyRecord> {
        let request = CreateSshKeyRequest {
            name: name.to_string(),
            public_key: public_key.to_string(),
        };
        let created: SshKeyEnvelope = self
            .post("/account/keys", &request, StatusCode::CREATED)
            .await?;
        Ok(key_record(created.ssh_key))
    }

    async fn deregister_key(&self, id: u64) -> Result<()> {
        self.delete(&format!("/account/keys/{id}")).await
    }
}
