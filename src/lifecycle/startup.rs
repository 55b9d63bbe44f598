//! Service starter.
//!
//! # Responsibilities
//! - Start the role host's primary transport with its channel set
//! - Start the websocket transport for streaming roles
//! - Start the diagnostic HTTP loop at `primary + 10000`
//!
//! # Design Decisions
//! - Runs only after bootstrap returned a complete bundle
//! - Primary first, so auxiliary surfaces never come up without it
//! - Each listener runs in the background once bound; nothing here waits on them

use std::net::SocketAddr;

use serde::Serialize;
use thiserror::Error;

use crate::bootstrap::Bootstrapped;
use crate::http::{start_diagnostic_server, start_websocket_server, DiagnosticTarget};
use crate::lifecycle::Shutdown;
use crate::net::ListenerError;
use crate::service::ServiceRole;

#[derive(Debug, Error)]
#[error("{role}: {source}")]
pub struct StartError {
    pub role: ServiceRole,
    #[source]
    pub source: ListenerError,
}

/// Addresses a started node is reachable on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunningService {
    pub primary: SocketAddr,
    pub websocket: Option<SocketAddr>,
    pub diagnostic: SocketAddr,
}

pub async fn start_service(
    booted: Bootstrapped,
    shutdown: &Shutdown,
) -> Result<RunningService, StartError> {
    let Bootstrapped {
        host,
        channels,
        bundle,
    } = booted;
    let role = bundle.config().role;
    let address = bundle.config().listen_address;
    let ports = bundle.ports();
    let start_err = |source| StartError { role, source };

    let primary = host.start(channels, shutdown).await.map_err(start_err)?;
    bundle.reporter().listener_started("primary");

    let websocket = match ports.websocket {
        Some(port) => {
            let routes = host.stream_routes().unwrap_or_else(|| {
                tracing::warn!(role = %role, "Host registered no stream handlers");
                axum::Router::new()
            });
            let addr = start_websocket_server(address, port, routes, shutdown)
                .await
                .map_err(start_err)?;
            bundle.reporter().listener_started("websocket");
            Some(addr)
        }
        None => None,
    };

    let target = DiagnosticTarget::for_scope(bundle.profile().diagnostics, &host, &bundle);
    let diagnostic =
        start_diagnostic_server(address, ports.diagnostic, bundle.clone(), target, shutdown)
            .await
            .map_err(start_err)?;
    bundle.reporter().listener_started("diagnostic");

    tracing::info!(
        role = %role,
        primary = %primary,
        websocket = ?websocket,
        diagnostic = %diagnostic,
        "Service started"
    );

    Ok(RunningService {
        primary,
        websocket,
        diagnostic,
    })
}
