//! Metadata service client.
//!
//! # Responsibilities
//! - Establish a connection to one of the configured metadata replicas
//! - Look up host addresses and hardware records by key
//!
//! Construction is the only point the bootstrap depends on: if no replica
//! answers its health probe, the node must not start.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::collaborators::hardware::HardwareInfo;
use crate::config::MetadataConfig;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("no metadata endpoints configured")]
    NoEndpoints,

    #[error("invalid metadata endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("metadata service unreachable at [{endpoints}]: {last_error}")]
    Unreachable {
        endpoints: String,
        last_error: String,
    },

    #[error("metadata request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("metadata service returned status {0}")]
    Status(u16),
}

/// Read access to cluster metadata used by the shared collaborators.
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Address (`host:port`) registered for a host UUID.
    async fn host_address(&self, uuid: &str) -> Result<Option<String>, MetadataError>;

    /// Hardware record of a host.
    async fn hardware_info(&self, host: &str) -> Result<Option<HardwareInfo>, MetadataError>;
}

#[derive(Debug, Deserialize)]
struct HostRecord {
    address: String,
}

/// HTTP client for the metadata service.
#[derive(Debug, Clone)]
pub struct MetadataServiceClient {
    http: reqwest::Client,
    endpoint: Url,
    keyspace: String,
}

impl MetadataServiceClient {
    /// Connect to the first metadata replica whose health probe succeeds.
    ///
    /// Replicas are tried in configuration order. Retry policy is limited to
    /// this single pass over the list.
    pub async fn connect(config: &MetadataConfig) -> Result<Self, MetadataError> {
        if config.endpoints.is_empty() {
            return Err(MetadataError::NoEndpoints);
        }

        let endpoints = config
            .endpoints
            .iter()
            .map(|raw| {
                Url::parse(raw).map_err(|source| MetadataError::InvalidEndpoint {
                    endpoint: raw.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let timeout = Duration::from_millis(config.connect_timeout_ms);
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .no_proxy()
            .build()?;

        let mut last_error = String::new();
        for endpoint in endpoints {
            match probe(&http, &endpoint).await {
                Ok(()) => {
                    tracing::info!(
                        endpoint = %endpoint,
                        keyspace = %config.keyspace,
                        "Metadata client connected"
                    );
                    return Ok(Self {
                        http,
                        endpoint,
                        keyspace: config.keyspace.clone(),
                    });
                }
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint, error = %e, "Metadata replica unavailable");
                    last_error = e.to_string();
                }
            }
        }

        Err(MetadataError::Unreachable {
            endpoints: config.endpoints.join(", "),
            last_error,
        })
    }

    /// Replica this client is bound to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, MetadataError> {
        let url = join(&self.endpoint, path)?;
        let response = self
            .http
            .get(url)
            .query(&[("keyspace", self.keyspace.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(MetadataError::Status(status.as_u16())),
        }
    }
}

#[async_trait]
impl MetadataClient for MetadataServiceClient {
    async fn host_address(&self, uuid: &str) -> Result<Option<String>, MetadataError> {
        let record: Option<HostRecord> = self.get_json(&format!("hosts/{uuid}")).await?;
        Ok(record.map(|r| r.address))
    }

    async fn hardware_info(&self, host: &str) -> Result<Option<HardwareInfo>, MetadataError> {
        self.get_json(&format!("hardware/{host}")).await
    }
}

async fn probe(http: &reqwest::Client, endpoint: &Url) -> Result<(), MetadataError> {
    let response = http.get(join(endpoint, "health")?).send().await?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(MetadataError::Status(response.status().as_u16()))
    }
}

fn join(endpoint: &Url, path: &str) -> Result<Url, MetadataError> {
    let base = if endpoint.path().ends_with('/') {
        endpoint.clone()
    } else {
        let mut base = endpoint.clone();
        base.set_path(&format!("{}/", endpoint.path()));
        base
    };
    base.join(path)
        .map_err(|source| MetadataError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })
}
