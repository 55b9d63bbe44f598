//! Default role host used by the node binary.
//!
//! Registers each role's standard transport channels and stream paths.
//! Channel handlers only describe themselves; a role's real request
//! processing is plugged in through its own [`HostFactory`].

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use axum::{
    extract::{ws::Message, ws::WebSocket, MatchedPath, Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::bootstrap::ServiceBundle;
use crate::collaborators::ResolveError;
use crate::host::{HostFactory, RoleHost, TransportChannel};
use crate::lifecycle::Shutdown;
use crate::net::{self, ListenerError};
use crate::service::ServiceRole;
use crate::storage::StorageBackendSelection;

/// Channel that exposes read-only metadata lookups (frontend only).
pub const METADATA_EXPOSABLE: &str = "MetadataExposable";

fn channel_names(role: ServiceRole) -> &'static [&'static str] {
    match role {
        ServiceRole::Input => &["BIn", "InputHostAdmin"],
        ServiceRole::Output => &["BOut", "OutputHostAdmin"],
        ServiceRole::Store => &["BStore", "StoreHostAdmin"],
        ServiceRole::Controller => &["Controller"],
        ServiceRole::Replicator => &["Replicator"],
        ServiceRole::Frontend => &["BFrontend"],
    }
}

/// Websocket paths served per role.
pub fn stream_paths(role: ServiceRole) -> &'static [&'static str] {
    match role {
        ServiceRole::Input => &["/open_publisher_stream"],
        ServiceRole::Output => &["/open_consumer_stream"],
        ServiceRole::Store => &["/open_read_stream", "/open_append_stream"],
        ServiceRole::Replicator => &[
            "/open_replication_read_stream",
            "/open_replication_remote_read_stream",
        ],
        ServiceRole::Controller | ServiceRole::Frontend => &[],
    }
}

/// Builds a [`ServiceHost`] for any role.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHostFactory;

impl HostFactory for DefaultHostFactory {
    fn build(
        &self,
        bundle: Arc<ServiceBundle>,
        storage: Option<StorageBackendSelection>,
    ) -> (Arc<dyn RoleHost>, Vec<TransportChannel>) {
        let role = bundle.config().role;

        let mut channels: Vec<TransportChannel> = channel_names(role)
            .iter()
            .map(|&name| describe_channel(name, &bundle, storage.as_ref()))
            .collect();
        if role == ServiceRole::Frontend {
            channels.push(metadata_channel(bundle.clone()));
        }

        let host = ServiceHost {
            bundle,
            storage,
            channel_names: channels.iter().map(|c| c.name().to_string()).collect(),
            primary: OnceLock::new(),
        };
        (Arc::new(host), channels)
    }
}

/// Generic host: serves its channels on the primary port and drains streams.
pub struct ServiceHost {
    bundle: Arc<ServiceBundle>,
    storage: Option<StorageBackendSelection>,
    channel_names: Vec<String>,
    primary: OnceLock<SocketAddr>,
}

impl ServiceHost {
    pub fn storage(&self) -> Option<&StorageBackendSelection> {
        self.storage.as_ref()
    }

    pub fn primary_addr(&self) -> Option<SocketAddr> {
        self.primary.get().copied()
    }
}

#[async_trait]
impl RoleHost for ServiceHost {
    fn service_name(&self) -> &'static str {
        self.bundle.identity().service_name()
    }

    async fn start(
        &self,
        channels: Vec<TransportChannel>,
        shutdown: &Shutdown,
    ) -> Result<SocketAddr, ListenerError> {
        let mut router = Router::new().route("/health", get(|| async { "ok" }));
        for channel in channels {
            let (name, channel_router) = channel.into_parts();
            router = router.nest(&format!("/{name}"), channel_router);
        }

        let config = self.bundle.config();
        let (listener, addr) = net::bind("primary", config.listen_address, config.port).await?;
        crate::http::serve("primary", listener, router, shutdown);

        let _ = self.primary.set(addr);
        Ok(addr)
    }

    fn stream_routes(&self) -> Option<Router> {
        let paths = stream_paths(self.bundle.config().role);
        if paths.is_empty() {
            return None;
        }

        let router = paths
            .iter()
            .fold(Router::new(), |router, path| router.route(path, get(open_stream)));
        Some(router.with_state(self.bundle.clone()))
    }

    fn report(&self) -> serde_json::Value {
        let storage = self.storage.as_ref().map(storage_report);

        json!({
            "service": self.service_name(),
            "uuid": self.bundle.identity().uuid(),
            "primary": self.primary_addr().map(|a| a.to_string()),
            "channels": self.channel_names,
            "stream_paths": stream_paths(self.bundle.config().role),
            "storage": storage,
        })
    }
}

fn storage_report(selection: &StorageBackendSelection) -> serde_json::Value {
    json!({
        "backend": selection.kind.map(|k| k.token()).unwrap_or("default"),
        "base_dir": selection.base_dir.as_ref().map(|p| p.display().to_string()),
    })
}

fn describe_channel(
    name: &'static str,
    bundle: &ServiceBundle,
    storage: Option<&StorageBackendSelection>,
) -> TransportChannel {
    let mut info = json!({
        "channel": name,
        "service": bundle.identity().service_name(),
        "uuid": bundle.identity().uuid(),
    });
    if let Some(selection) = storage {
        info["storage"] = storage_report(selection);
    }
    let router = Router::new().route(
        "/",
        get(move || {
            let info = info.clone();
            async move { Json(info) }
        }),
    );
    TransportChannel::new(name, router)
}

fn metadata_channel(bundle: Arc<ServiceBundle>) -> TransportChannel {
    let router = Router::new()
        .route("/hosts/{uuid}", get(get_host_address))
        .route("/hardware/{host}", get(get_hardware))
        .with_state(bundle);
    TransportChannel::new(METADATA_EXPOSABLE, router)
}

async fn get_host_address(
    State(bundle): State<Arc<ServiceBundle>>,
    Path(uuid): Path<String>,
) -> Response {
    match bundle.resolver().lookup(&uuid).await {
        Ok(address) => Json(json!({ "uuid": uuid, "address": address })).into_response(),
        Err(ResolveError::NotFound(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::warn!(uuid = %uuid, error = %e, "Host lookup failed");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

async fn get_hardware(
    State(bundle): State<Arc<ServiceBundle>>,
    Path(host): Path<String>,
) -> Response {
    match bundle.hardware().read(&host).await {
        Ok(info) => Json(info).into_response(),
        Err(e) => {
            tracing::warn!(host = %host, error = %e, "Hardware lookup failed");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

async fn open_stream(
    State(bundle): State<Arc<ServiceBundle>>,
    path: MatchedPath,
    ws: WebSocketUpgrade,
) -> Response {
    let path = path.as_str().to_string();
    bundle.reporter().stream_opened(&path);
    tracing::debug!(path = %path, "Stream upgrade requested");

    ws.max_message_size(bundle.transport().max_message_size)
        .on_upgrade(move |socket| drain_stream(socket, path, bundle))
}

async fn drain_stream(mut socket: WebSocket, path: String, bundle: Arc<ServiceBundle>) {
    let mut frames = 0u64;
    while let Some(message) = socket.recv().await {
        match message {
            Ok(Message::Binary(_)) | Ok(Message::Text(_)) => frames += 1,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "Stream read error");
                break;
            }
        }
    }

    bundle.reporter().stream_frames(&path, frames);
    tracing::info!(path = %path, frames, "Stream closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bundle::testing::bundle;
    use crate::collaborators::testing::StaticMetadata;
    use crate::collaborators::HardwareInfo;
    use crate::storage::BackendKind;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::path::PathBuf;
    use tower::ServiceExt;

    #[test]
    fn test_frontend_gets_metadata_channel() {
        let (host, channels) =
            DefaultHostFactory.build(bundle(ServiceRole::Frontend, StaticMetadata::default()), None);
        let names: Vec<_> = channels.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["BFrontend", METADATA_EXPOSABLE]);
        assert!(host.stream_routes().is_none());
    }

    #[test]
    fn test_store_reports_backend_selection() {
        let selection = StorageBackendSelection {
            kind: Some(BackendKind::Chunky),
            base_dir: Some(PathBuf::from("/data/a")),
        };
        let (host, channels) = DefaultHostFactory.build(
            bundle(ServiceRole::Store, StaticMetadata::default()),
            Some(selection),
        );

        assert_eq!(channels.len(), 2);
        let report = host.report();
        assert_eq!(report["storage"]["backend"], "chunky");
        assert_eq!(report["storage"]["base_dir"], "/data/a");
        assert_eq!(report["stream_paths"][1], "/open_append_stream");
        assert!(host.stream_routes().is_some());
    }

    #[tokio::test]
    async fn test_store_channels_carry_storage_selection() {
        let selection = StorageBackendSelection {
            kind: None,
            base_dir: Some(PathBuf::from("/data/env")),
        };
        let (_, channels) = DefaultHostFactory.build(
            bundle(ServiceRole::Store, StaticMetadata::default()),
            Some(selection),
        );
        let (name, app) = channels.into_iter().nth(1).unwrap().into_parts();
        assert_eq!(name, "StoreHostAdmin");

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let info: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(info["storage"]["base_dir"], "/data/env");
        assert_eq!(info["storage"]["backend"], "default");
    }

    #[test]
    fn test_deferred_backend_reports_default() {
        let (host, _) = DefaultHostFactory.build(
            bundle(ServiceRole::Store, StaticMetadata::default()),
            Some(StorageBackendSelection::default()),
        );
        assert_eq!(host.report()["storage"]["backend"], "default");
        assert!(host.report()["storage"]["base_dir"].is_null());
    }

    #[tokio::test]
    async fn test_metadata_channel_lookups() {
        let meta = StaticMetadata::default()
            .with_host("uuid-9", "10.1.1.1:4253")
            .with_hardware("store-9", HardwareInfo { cpu_cores: 8, ..HardwareInfo::default() });
        let (_, app) = metadata_channel(bundle(ServiceRole::Frontend, meta)).into_parts();

        let response = app
            .clone()
            .oneshot(Request::get("/hosts/uuid-9").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["address"], "10.1.1.1:4253");

        let response = app
            .clone()
            .oneshot(Request::get("/hosts/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(Request::get("/hardware/store-9").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let info: HardwareInfo = serde_json::from_slice(&body).unwrap();
        assert_eq!(info.cpu_cores, 8);
    }
}
