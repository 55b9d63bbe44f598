//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the role's configuration and listener ports
//! - Connect to metadata, then build every shared collaborator
//! - Assign identity (and storage backend for the store role)
//! - Construct the role host through its factory
//!
//! # Design Decisions
//! - Fail fast: any startup error is returned to the caller, who decides to exit
//! - Steps run in order, never concurrently
//! - No listener is bound here; that is the starter's job, after this returns

use std::sync::Arc;

use crate::bootstrap::bundle::ServiceBundle;
use crate::bootstrap::error::BootstrapError;
use crate::collaborators::{
    BypassAuthManager, DynamicConfigClient, HardwareInfoReader, MetadataClient,
    MetadataServiceClient, UuidResolver,
};
use crate::config::ServerConfig;
use crate::host::{HostFactory, RoleHost, TransportChannel};
use crate::net::PortAssignment;
use crate::observability::MetricsReporter;
use crate::service::{resolve_identity, ServiceRole};
use crate::storage::{StorageBackendSelection, StorageOverrides};

/// Output of a successful bootstrap, consumed by the service starter.
pub struct Bootstrapped {
    pub host: Arc<dyn RoleHost>,
    pub channels: Vec<TransportChannel>,
    pub bundle: Arc<ServiceBundle>,
}

/// Run the bootstrap for `role`.
pub async fn bootstrap(
    role: ServiceRole,
    config: &ServerConfig,
    overrides: &StorageOverrides,
    factory: &dyn HostFactory,
) -> Result<Bootstrapped, BootstrapError> {
    let profile = role.profile();

    let resolved = config.resolve(role);
    tracing::debug!(role = %role, port = resolved.role.port, "Resolved role configuration");

    let ports = PortAssignment::derive(&resolved.role)
        .map_err(|source| BootstrapError::Ports { role, source })?;
    tracing::debug!(role = %role, ?ports, "Derived listener ports");

    let metadata: Arc<dyn MetadataClient> = Arc::new(
        MetadataServiceClient::connect(&resolved.metadata)
            .await
            .map_err(|source| BootstrapError::Metadata { role, source })?,
    );

    let hardware = Arc::new(HardwareInfoReader::new(metadata.clone()));
    let reporter = Arc::new(MetricsReporter::new(&resolved.role));
    let dconfig = Arc::new(DynamicConfigClient::new(
        role.service_name(),
        resolved.dynamic.clone(),
    ));
    tracing::debug!(role = %role, host = reporter.host(), "Shared collaborators constructed");

    let identity = resolve_identity(role, &resolved.storage);
    let storage = profile
        .selects_backend
        .then(|| StorageBackendSelection::resolve(overrides, &resolved.storage));
    if let Some(selection) = &storage {
        tracing::info!(
            role = %role,
            backend = selection.kind.map(|k| k.token()).unwrap_or("default"),
            base_dir = ?selection.base_dir,
            "Resolved storage backend"
        );
    }

    let bundle = Arc::new(ServiceBundle {
        identity,
        ports,
        transport: resolved.transport.clone(),
        resolver: Arc::new(UuidResolver::new(metadata.clone())),
        auth: Arc::new(BypassAuthManager),
        metadata,
        hardware,
        reporter,
        dconfig,
        config: resolved.role,
    });

    let (host, channels) = factory.build(bundle.clone(), storage);

    bundle.reporter.bootstrap_completed();
    tracing::info!(
        role = %role,
        service = host.service_name(),
        uuid = bundle.identity.uuid(),
        primary = ports.primary,
        diagnostic = ports.diagnostic,
        channels = channels.len(),
        "Bootstrap complete"
    );

    Ok(Bootstrapped {
        host,
        channels,
        bundle,
    })
}
