//! Process-level tests: run the node binary the way an operator would.

use std::net::SocketAddr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};

mod common;

use common::start_metadata_service;

fn write_base(dir: &Path, content: &str) {
    std::fs::write(dir.join("base.toml"), content).unwrap();
}

fn node(role: &str, config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cherami-node"));
    cmd.arg(role)
        .arg("--config-dir")
        .arg(config_dir)
        .arg("--environment")
        .arg("test")
        .env_remove("CHERAMI_STORE")
        .env_remove("RUST_LOG")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    cmd
}

async fn get_json(url: &str) -> Option<serde_json::Value> {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let response = client.get(url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.json().await.ok()
}

/// Poll `url` until the node answers, or give up.
async fn wait_for_json(child: &mut Child, url: &str) -> serde_json::Value {
    for _ in 0..100 {
        if let Some(status) = child.try_wait().unwrap() {
            panic!("node exited early with {status}");
        }
        if let Some(value) = get_json(url).await {
            return value;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("node never answered on {url}");
}

#[tokio::test]
async fn test_unreachable_metadata_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_base(
        dir.path(),
        r#"
        [metadata]
        endpoints = ["http://127.0.0.1:1"]
        connect_timeout_ms = 200

        [services.outputhost]
        port = 28720
        websocket_port = 28721
        "#,
    );

    let status = tokio::time::timeout(
        Duration::from_secs(20),
        node("output", dir.path()).status(),
    )
    .await
    .expect("node should exit on its own")
    .unwrap();
    assert!(!status.success());

    for port in [28720, 28721, 38720] {
        tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .unwrap_or_else(|e| panic!("port {port} should still be free: {e}"));
    }
}

#[tokio::test]
async fn test_invalid_config_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_base(dir.path(), "[metadata]\nconnect_timeout_ms = 0\n");

    let status = tokio::time::timeout(
        Duration::from_secs(20),
        node("controller", dir.path()).status(),
    )
    .await
    .expect("node should exit on its own")
    .unwrap();
    assert!(!status.success());
}

#[tokio::test]
async fn test_store_dir_from_environment() {
    let metadata_addr: SocketAddr = "127.0.0.1:28730".parse().unwrap();
    start_metadata_service(metadata_addr).await;

    let dir = tempfile::tempdir().unwrap();
    write_base(
        dir.path(),
        &format!(
            r#"
            [metadata]
            endpoints = ["http://{metadata_addr}"]
            connect_timeout_ms = 500

            [services.storehost]
            port = 28731
            websocket_port = 28732

            [storage]
            base_dir = "/data/from-config"
            host_uuid = "cli-store-1"
            store = "chunky"
            "#
        ),
    );

    let mut child = node("store", dir.path())
        .env("CHERAMI_STORE", "/data/from-env")
        .spawn()
        .unwrap();

    let admin = wait_for_json(&mut child, "http://127.0.0.1:28731/StoreHostAdmin").await;
    assert_eq!(admin["uuid"], "cli-store-1");
    assert_eq!(admin["storage"]["base_dir"], "/data/from-env");
    assert_eq!(admin["storage"]["backend"], "chunky");

    let status = wait_for_json(&mut child, "http://127.0.0.1:38731/status").await;
    assert_eq!(status["service"], "cherami-storehost");
    assert_eq!(status["ports"]["websocket"], 28732);

    child.kill().await.unwrap();
}

#[tokio::test]
async fn test_cli_dir_beats_environment() {
    let metadata_addr: SocketAddr = "127.0.0.1:28740".parse().unwrap();
    start_metadata_service(metadata_addr).await;

    let dir = tempfile::tempdir().unwrap();
    write_base(
        dir.path(),
        &format!(
            r#"
            [metadata]
            endpoints = ["http://{metadata_addr}"]

            [services.storehost]
            port = 28741
            websocket_port = 28742

            [storage]
            base_dir = "/data/from-config"
            "#
        ),
    );

    let mut child = node("store", dir.path())
        .arg("--dir")
        .arg("/data/from-cli")
        .env("CHERAMI_STORE", "/data/from-env")
        .spawn()
        .unwrap();

    let admin = wait_for_json(&mut child, "http://127.0.0.1:28741/BStore").await;
    assert_eq!(admin["storage"]["base_dir"], "/data/from-cli");
    assert_eq!(admin["storage"]["backend"], "default");

    child.kill().await.unwrap();
}
