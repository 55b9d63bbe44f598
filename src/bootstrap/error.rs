//! Bootstrap failures. All of them are fatal to the process.

use thiserror::Error;

use crate::collaborators::MetadataError;
use crate::net::PortError;
use crate::service::ServiceRole;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("{role}: unable to derive listener ports: {source}")]
    Ports {
        role: ServiceRole,
        #[source]
        source: PortError,
    },

    #[error("{role}: unable to instantiate metadata client: {source}")]
    Metadata {
        role: ServiceRole,
        #[source]
        source: MetadataError,
    },
}

impl BootstrapError {
    pub fn role(&self) -> ServiceRole {
        match self {
            BootstrapError::Ports { role, .. } | BootstrapError::Metadata { role, .. } => *role,
        }
    }
}
