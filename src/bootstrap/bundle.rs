//! The set of shared collaborators handed to a role host.

use std::sync::Arc;

use serde_json::json;

use crate::collaborators::{
    AuthManager, DynamicConfigClient, HardwareInfoReader, MetadataClient, UuidResolver,
};
use crate::config::{RoleConfig, TransportConfig};
use crate::net::PortAssignment;
use crate::observability::MetricsReporter;
use crate::service::{RoleProfile, ServiceIdentity};

/// Everything a role host is constructed from.
///
/// Built once by the bootstrap and shared read-only afterwards.
pub struct ServiceBundle {
    pub(crate) identity: ServiceIdentity,
    pub(crate) config: RoleConfig,
    pub(crate) ports: PortAssignment,
    pub(crate) transport: TransportConfig,
    pub(crate) metadata: Arc<dyn MetadataClient>,
    pub(crate) hardware: Arc<HardwareInfoReader>,
    pub(crate) reporter: Arc<MetricsReporter>,
    pub(crate) dconfig: Arc<DynamicConfigClient>,
    pub(crate) resolver: Arc<UuidResolver>,
    pub(crate) auth: Arc<dyn AuthManager>,
}

impl ServiceBundle {
    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn config(&self) -> &RoleConfig {
        &self.config
    }

    pub fn profile(&self) -> RoleProfile {
        self.config.role.profile()
    }

    pub fn ports(&self) -> PortAssignment {
        self.ports
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    pub fn metadata(&self) -> &Arc<dyn MetadataClient> {
        &self.metadata
    }

    pub fn hardware(&self) -> &HardwareInfoReader {
        &self.hardware
    }

    pub fn reporter(&self) -> &MetricsReporter {
        &self.reporter
    }

    pub fn dynamic_config(&self) -> &DynamicConfigClient {
        &self.dconfig
    }

    pub fn resolver(&self) -> &UuidResolver {
        &self.resolver
    }

    pub fn auth(&self) -> &dyn AuthManager {
        self.auth.as_ref()
    }

    /// Introspection payload used by the diagnostic endpoint.
    pub fn report(&self) -> serde_json::Value {
        json!({
            "service": self.identity.service_name(),
            "uuid": self.identity.uuid(),
            "listen_address": self.config.listen_address.to_string(),
            "ports": self.ports,
            "host_name": self.reporter.host(),
            "dynamic_config": *self.dconfig.snapshot(),
            "auth": self.auth.name(),
            "cached_hardware_records": self.hardware.cached_hosts(),
        })
    }
}

impl std::fmt::Debug for ServiceBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBundle")
            .field("identity", &self.identity)
            .field("config", &self.config)
            .field("ports", &self.ports)
            .finish_non_exhaustive()
    }
}
