//! Role host seam.
//!
//! The business logic of each role lives behind [`RoleHost`]. The bootstrap
//! hands a [`HostFactory`] the finished service bundle and gets back a host
//! plus the transport channels it wants served on the primary port.

pub mod service_host;

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use crate::bootstrap::ServiceBundle;
use crate::lifecycle::Shutdown;
use crate::net::ListenerError;
use crate::storage::StorageBackendSelection;

pub use service_host::{DefaultHostFactory, ServiceHost};

/// One named handler registration on the primary listener, mounted at `/<name>`.
pub struct TransportChannel {
    name: String,
    router: Router,
}

impl TransportChannel {
    pub fn new(name: impl Into<String>, router: Router) -> Self {
        Self {
            name: name.into(),
            router,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_parts(self) -> (String, Router) {
        (self.name, self.router)
    }
}

impl std::fmt::Debug for TransportChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportChannel")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A constructed role, ready to be started.
#[async_trait]
pub trait RoleHost: Send + Sync {
    fn service_name(&self) -> &'static str;

    /// Bind the primary listener and serve `channels` until shutdown.
    async fn start(
        &self,
        channels: Vec<TransportChannel>,
        shutdown: &Shutdown,
    ) -> Result<SocketAddr, ListenerError>;

    /// Websocket handlers, for roles that stream.
    fn stream_routes(&self) -> Option<Router> {
        None
    }

    /// Introspection payload for the diagnostic endpoint.
    fn report(&self) -> serde_json::Value;
}

/// Builds the host for a role. Storage selection is `Some` only for the store role.
pub trait HostFactory: Send + Sync {
    fn build(
        &self,
        bundle: Arc<ServiceBundle>,
        storage: Option<StorageBackendSelection>,
    ) -> (Arc<dyn RoleHost>, Vec<TransportChannel>);
}
