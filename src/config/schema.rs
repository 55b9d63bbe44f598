//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a cluster
//! node. All types derive Serde traits for deserialization from config files.
//! A single file describes every role; the process picks its own section at
//! startup through [`ServerConfig::resolve`].

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::service::ServiceRole;

/// Root configuration shared by all node roles.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Per-role listener settings.
    pub services: ServicesConfig,

    /// Metadata service connection parameters.
    pub metadata: MetadataConfig,

    /// Storage settings (consumed by the store role only).
    pub storage: StorageConfig,

    /// Streaming transport settings.
    pub transport: TransportConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

impl ServerConfig {
    /// Get the declarative section for a role.
    pub fn service(&self, role: ServiceRole) -> &ServiceConfig {
        match role {
            ServiceRole::Input => &self.services.inputhost,
            ServiceRole::Output => &self.services.outputhost,
            ServiceRole::Store => &self.services.storehost,
            ServiceRole::Controller => &self.services.controllerhost,
            ServiceRole::Replicator => &self.services.replicator,
            ServiceRole::Frontend => &self.services.frontendhost,
        }
    }

    /// Resolve everything a single role needs to boot.
    ///
    /// Pure lookup: never touches the network or the filesystem.
    pub fn resolve(&self, role: ServiceRole) -> ResolvedConfig {
        let service = self.service(role);
        ResolvedConfig {
            role: RoleConfig {
                role,
                listen_address: service.listen_address,
                port: service.port,
                websocket_port: service.websocket_port,
                host_name: service.host_name.clone(),
            },
            metadata: self.metadata.clone(),
            storage: self.storage.clone(),
            transport: self.transport.clone(),
            dynamic: service.dynamic.clone(),
        }
    }
}

/// Listener sections, one per role.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub inputhost: ServiceConfig,
    pub outputhost: ServiceConfig,
    pub storehost: ServiceConfig,
    pub controllerhost: ServiceConfig,
    pub replicator: ServiceConfig,
    pub frontendhost: ServiceConfig,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            inputhost: ServiceConfig::with_ports(4240, 6189),
            outputhost: ServiceConfig::with_ports(4254, 6190),
            storehost: ServiceConfig::with_ports(4253, 6191),
            controllerhost: ServiceConfig::with_ports(5425, 0),
            replicator: ServiceConfig::with_ports(6280, 6310),
            frontendhost: ServiceConfig::with_ports(4922, 0),
        }
    }
}

/// Listener settings for one role.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Interface every listener of this role binds to.
    pub listen_address: IpAddr,

    /// Primary service port.
    pub port: u16,

    /// Websocket port (unused by roles without streaming).
    pub websocket_port: u16,

    /// Host name reported with metrics. Empty means "ask the OS".
    pub host_name: String,

    /// Initial values served by the dynamic-config client.
    pub dynamic: BTreeMap<String, String>,
}

impl ServiceConfig {
    fn with_ports(port: u16, websocket_port: u16) -> Self {
        Self {
            port,
            websocket_port,
            ..Self::default()
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            websocket_port: 0,
            host_name: String::new(),
            dynamic: BTreeMap::new(),
        }
    }
}

/// Metadata service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Base URLs of metadata service replicas, tried in order.
    pub endpoints: Vec<String>,

    /// Keyspace the cluster's metadata lives in.
    pub keyspace: String,

    /// Connect/request timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["http://127.0.0.1:9042".to_string()],
            keyspace: "cherami".to_string(),
            connect_timeout_ms: 2000,
        }
    }
}

/// Storage configuration. Empty strings mean "not configured".
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage engine hint (matched against known backend tokens).
    pub store: String,

    /// Base directory for storage segments.
    pub base_dir: String,

    /// Persisted identity of this store host.
    pub host_uuid: String,
}

/// Streaming transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Largest websocket message accepted, in bytes.
    pub max_message_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_message_size: 4 * 1024 * 1024, // 4MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Listener settings of the role this process runs as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleConfig {
    pub role: ServiceRole,
    pub listen_address: IpAddr,
    pub port: u16,
    pub websocket_port: u16,
    pub host_name: String,
}

/// Output of the configuration resolver: one role's view of the cluster config.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub role: RoleConfig,
    pub metadata: MetadataConfig,
    pub storage: StorageConfig,
    pub transport: TransportConfig,
    pub dynamic: BTreeMap<String, String>,
}
