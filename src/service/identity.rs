//! Cluster identity assignment.

use serde::Serialize;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::service::role::{IdentityPolicy, ServiceRole};

/// The identity a process announces to the cluster. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceIdentity {
    role: ServiceRole,
    uuid: String,
}

impl ServiceIdentity {
    pub fn role(&self) -> ServiceRole {
        self.role
    }

    pub fn service_name(&self) -> &'static str {
        self.role.service_name()
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }
}

/// Determine the identity for `role`.
///
/// Ephemeral roles get a new random UUID on every call. The store role
/// returns `storage.host_uuid` verbatim; an unprovisioned UUID surfaces
/// later, when peers try to address the host.
pub fn resolve_identity(role: ServiceRole, storage: &StorageConfig) -> ServiceIdentity {
    let uuid = match role.profile().identity {
        IdentityPolicy::Ephemeral => Uuid::new_v4().to_string(),
        IdentityPolicy::Persisted => storage.host_uuid.clone(),
    };
    ServiceIdentity { role, uuid }
}
