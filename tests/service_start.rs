//! End-to-end startup tests: bootstrap, then bring up every listener.

use std::net::SocketAddr;

use futures_util::SinkExt;
use tokio_tungstenite::tungstenite::Message;

use cherami_node::storage::StorageOverrides;
use cherami_node::{bootstrap, start_service, DefaultHostFactory, ServiceRole, Shutdown};

mod common;

use common::{config_with_metadata, start_metadata_service};

fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_store_starts_all_three_surfaces() {
    let metadata_addr: SocketAddr = "127.0.0.1:28600".parse().unwrap();
    start_metadata_service(metadata_addr).await;

    let mut config = config_with_metadata(&format!("http://{metadata_addr}"));
    config.services.storehost.port = 28601;
    config.services.storehost.websocket_port = 28602;
    config.storage.host_uuid = "store-host-1".into();

    let overrides = StorageOverrides {
        store: Some("ManyRocks".into()),
        dir: Some("/data/store".into()),
        env_dir: None,
    };
    let booted = bootstrap(ServiceRole::Store, &config, &overrides, &DefaultHostFactory)
        .await
        .unwrap();

    let shutdown = Shutdown::new();
    let running = start_service(booted, &shutdown).await.unwrap();
    assert_eq!(running.primary.port(), 28601);
    assert_eq!(running.websocket.map(|a| a.port()), Some(28602));
    assert_eq!(running.diagnostic.port(), 38601);

    let client = http_client();

    let health = client
        .get("http://127.0.0.1:28601/health")
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), 200);

    let channel: serde_json::Value = client
        .get("http://127.0.0.1:28601/BStore")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(channel["channel"], "BStore");
    assert_eq!(channel["uuid"], "store-host-1");

    let status: serde_json::Value = client
        .get("http://127.0.0.1:38601/status")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["service"], "cherami-storehost");
    assert_eq!(status["uuid"], "store-host-1");
    assert_eq!(status["ports"]["diagnostic"], 38601);

    // Store diagnostics introspect the service bundle, not the host.
    let vars: serde_json::Value = client
        .get("http://127.0.0.1:38601/debug/vars")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(vars["service"], "cherami-storehost");
    assert!(vars.get("channels").is_none());

    let (mut stream, response) =
        tokio_tungstenite::connect_async("ws://127.0.0.1:28602/open_append_stream")
            .await
            .unwrap();
    assert_eq!(response.status(), 101);
    stream.send(Message::Text("append".into())).await.unwrap();
    stream.close(None).await.unwrap();

    shutdown.trigger();
}

#[tokio::test]
async fn test_controller_has_no_websocket() {
    let metadata_addr: SocketAddr = "127.0.0.1:28610".parse().unwrap();
    start_metadata_service(metadata_addr).await;

    let mut config = config_with_metadata(&format!("http://{metadata_addr}"));
    config.services.controllerhost.port = 28611;

    let booted = bootstrap(
        ServiceRole::Controller,
        &config,
        &StorageOverrides::default(),
        &DefaultHostFactory,
    )
    .await
    .unwrap();

    let shutdown = Shutdown::new();
    let running = start_service(booted, &shutdown).await.unwrap();
    assert_eq!(running.websocket, None);
    assert_eq!(running.diagnostic.port(), 38611);

    let health = http_client()
        .get("http://127.0.0.1:38611/health")
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_input_diagnostics_introspect_host() {
    let metadata_addr: SocketAddr = "127.0.0.1:28620".parse().unwrap();
    start_metadata_service(metadata_addr).await;

    let mut config = config_with_metadata(&format!("http://{metadata_addr}"));
    config.services.inputhost.port = 28621;
    config.services.inputhost.websocket_port = 28622;

    let booted = bootstrap(
        ServiceRole::Input,
        &config,
        &StorageOverrides::default(),
        &DefaultHostFactory,
    )
    .await
    .unwrap();

    let shutdown = Shutdown::new();
    start_service(booted, &shutdown).await.unwrap();

    let vars: serde_json::Value = http_client()
        .get("http://127.0.0.1:38621/debug/vars")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(vars["service"], "cherami-inputhost");
    assert_eq!(vars["channels"], serde_json::json!(["BIn", "InputHostAdmin"]));
    assert_eq!(vars["primary"], "127.0.0.1:28621");

    shutdown.trigger();
}

#[tokio::test]
async fn test_occupied_primary_port_fails_start() {
    let metadata_addr: SocketAddr = "127.0.0.1:28630".parse().unwrap();
    start_metadata_service(metadata_addr).await;

    let _occupied = tokio::net::TcpListener::bind("127.0.0.1:28631").await.unwrap();

    let mut config = config_with_metadata(&format!("http://{metadata_addr}"));
    config.services.frontendhost.port = 28631;

    let booted = bootstrap(
        ServiceRole::Frontend,
        &config,
        &StorageOverrides::default(),
        &DefaultHostFactory,
    )
    .await
    .unwrap();

    let shutdown = Shutdown::new();
    let err = start_service(booted, &shutdown).await.unwrap_err();
    assert_eq!(err.role, ServiceRole::Frontend);
    assert!(err.to_string().contains("28631"));
}
