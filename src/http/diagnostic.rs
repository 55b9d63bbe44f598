//! Diagnostic HTTP loop, bound at `primary + 10000`.
//!
//! # Endpoints
//! - `GET /health`: liveness
//! - `GET /status`: service name, identity, ports, version
//! - `GET /debug/vars`: introspection of the host or the service bundle
//! - `GET /metrics`: Prometheus scrape

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::bootstrap::ServiceBundle;
use crate::host::RoleHost;
use crate::lifecycle::Shutdown;
use crate::net::{self, ListenerError, PortAssignment};
use crate::observability::prometheus_handle;
use crate::service::DiagnosticScope;

/// What `/debug/vars` introspects.
#[derive(Clone)]
pub enum DiagnosticTarget {
    Host(Arc<dyn RoleHost>),
    Service(Arc<ServiceBundle>),
}

impl DiagnosticTarget {
    pub fn for_scope(
        scope: DiagnosticScope,
        host: &Arc<dyn RoleHost>,
        bundle: &Arc<ServiceBundle>,
    ) -> Self {
        match scope {
            DiagnosticScope::Host => DiagnosticTarget::Host(host.clone()),
            DiagnosticScope::Service => DiagnosticTarget::Service(bundle.clone()),
        }
    }

    pub fn report(&self) -> serde_json::Value {
        match self {
            DiagnosticTarget::Host(host) => host.report(),
            DiagnosticTarget::Service(bundle) => bundle.report(),
        }
    }
}

#[derive(Clone)]
struct DiagnosticState {
    bundle: Arc<ServiceBundle>,
    target: DiagnosticTarget,
    prometheus: PrometheusHandle,
}

#[derive(Serialize)]
pub struct NodeStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub service: &'static str,
    pub uuid: String,
    pub ports: PortAssignment,
}

pub fn router(bundle: Arc<ServiceBundle>, target: DiagnosticTarget) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/status", get(get_status))
        .route("/debug/vars", get(get_vars))
        .route("/metrics", get(get_metrics))
        .with_state(DiagnosticState {
            bundle,
            target,
            prometheus: prometheus_handle(),
        })
}

pub async fn start_diagnostic_server(
    address: IpAddr,
    port: u16,
    bundle: Arc<ServiceBundle>,
    target: DiagnosticTarget,
    shutdown: &Shutdown,
) -> Result<SocketAddr, ListenerError> {
    let (listener, addr) = net::bind("diagnostic", address, port).await?;
    super::serve("diagnostic", listener, router(bundle, target), shutdown);
    Ok(addr)
}

async fn get_status(State(state): State<DiagnosticState>) -> Json<NodeStatus> {
    let identity = state.bundle.identity();
    Json(NodeStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        service: identity.service_name(),
        uuid: identity.uuid().to_string(),
        ports: state.bundle.ports(),
    })
}

async fn get_vars(State(state): State<DiagnosticState>) -> Json<serde_json::Value> {
    Json(state.target.report())
}

async fn get_metrics(State(state): State<DiagnosticState>) -> String {
    state.prometheus.render()
}
