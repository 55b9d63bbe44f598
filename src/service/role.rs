//! Node roles and their bootstrap descriptors.
//!
//! Every role runs the same bootstrap procedure; the differences between
//! roles are captured in a [`RoleProfile`] instead of six copies of the
//! startup code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the node kinds a process can start as.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    /// Ingest: accepts publisher streams.
    Input,
    /// Egress: serves consumer streams.
    Output,
    /// Durable storage of extents.
    Store,
    /// Cluster control plane.
    Controller,
    /// Cross-cluster replication.
    Replicator,
    /// Client-facing API.
    Frontend,
}

/// How a role obtains its cluster identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityPolicy {
    /// Fresh UUID on every start.
    Ephemeral,
    /// UUID read from storage configuration.
    Persisted,
}

/// What the diagnostic endpoint introspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticScope {
    /// The role host itself.
    Host,
    /// The shared service bundle.
    Service,
}

/// Per-role variation points of the bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleProfile {
    /// Role exposes a websocket streaming transport.
    pub websocket: bool,
    pub identity: IdentityPolicy,
    /// Role resolves a storage backend before host construction.
    pub selects_backend: bool,
    pub diagnostics: DiagnosticScope,
}

impl ServiceRole {
    pub const ALL: [ServiceRole; 6] = [
        ServiceRole::Input,
        ServiceRole::Output,
        ServiceRole::Store,
        ServiceRole::Controller,
        ServiceRole::Replicator,
        ServiceRole::Frontend,
    ];

    /// Short name used on the command line and in config.
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceRole::Input => "input",
            ServiceRole::Output => "output",
            ServiceRole::Store => "store",
            ServiceRole::Controller => "controller",
            ServiceRole::Replicator => "replicator",
            ServiceRole::Frontend => "frontend",
        }
    }

    /// Name the role registers under in the cluster.
    pub fn service_name(self) -> &'static str {
        match self {
            ServiceRole::Input => "cherami-inputhost",
            ServiceRole::Output => "cherami-outputhost",
            ServiceRole::Store => "cherami-storehost",
            ServiceRole::Controller => "cherami-controllerhost",
            ServiceRole::Replicator => "cherami-replicator",
            ServiceRole::Frontend => "cherami-frontendhost",
        }
    }

    pub fn profile(self) -> RoleProfile {
        match self {
            ServiceRole::Input => RoleProfile {
                websocket: true,
                identity: IdentityPolicy::Ephemeral,
                selects_backend: false,
                diagnostics: DiagnosticScope::Host,
            },
            ServiceRole::Output | ServiceRole::Replicator => RoleProfile {
                websocket: true,
                identity: IdentityPolicy::Ephemeral,
                selects_backend: false,
                diagnostics: DiagnosticScope::Service,
            },
            ServiceRole::Store => RoleProfile {
                websocket: true,
                identity: IdentityPolicy::Persisted,
                selects_backend: true,
                diagnostics: DiagnosticScope::Service,
            },
            ServiceRole::Controller | ServiceRole::Frontend => RoleProfile {
                websocket: false,
                identity: IdentityPolicy::Ephemeral,
                selects_backend: false,
                diagnostics: DiagnosticScope::Service,
            },
        }
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for role names that are not one of the six known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for ServiceRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s || role.service_name() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
