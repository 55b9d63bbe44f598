//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use cherami_node::config::ServerConfig;
use cherami_node::host::{DefaultHostFactory, HostFactory, RoleHost, TransportChannel};
use cherami_node::storage::StorageBackendSelection;
use cherami_node::ServiceBundle;

/// Start a mock metadata service: `/health` answers 200, everything else 404.
pub async fn start_metadata_service(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]);
                        let path = request.split_whitespace().nth(1).unwrap_or("/");

                        let (status, body) = if path.starts_with("/health") {
                            ("200 OK", "ok")
                        } else {
                            ("404 Not Found", "")
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Config pointing at a metadata service, with every role on loopback.
#[allow(dead_code)]
pub fn config_with_metadata(metadata: &str) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.metadata.endpoints = vec![metadata.to_string()];
    config.metadata.connect_timeout_ms = 500;
    config
}

/// Host factory that records what it was asked to build.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingFactory {
    pub calls: AtomicUsize,
    pub last_storage: Mutex<Option<StorageBackendSelection>>,
    pub last_uuid: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl RecordingFactory {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_storage(&self) -> Option<StorageBackendSelection> {
        self.last_storage.lock().unwrap().clone()
    }

    pub fn last_uuid(&self) -> Option<String> {
        self.last_uuid.lock().unwrap().clone()
    }
}

impl HostFactory for RecordingFactory {
    fn build(
        &self,
        bundle: Arc<ServiceBundle>,
        storage: Option<StorageBackendSelection>,
    ) -> (Arc<dyn RoleHost>, Vec<TransportChannel>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_storage.lock().unwrap() = storage.clone();
        *self.last_uuid.lock().unwrap() = Some(bundle.identity().uuid().to_string());
        DefaultHostFactory.build(bundle, storage)
    }
}
