//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Install one Prometheus recorder per process
//! - Tag node metrics with service name and host name
//! - Render the scrape payload for the diagnostic endpoint
//!
//! # Metrics
//! - `cherami_bootstrap_completed_total` (counter): successful bootstraps
//! - `cherami_listener_started_total` (counter): listeners by surface
//! - `cherami_stream_opened_total` (counter): websocket streams by path
//! - `cherami_stream_frames_total` (counter): frames received on streams
//! - `cherami_uptime_start_seconds` (gauge): unix time the node started

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::RoleConfig;

static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

/// Handle of the process-wide recorder, installing it on first use.
pub fn prometheus_handle() -> PrometheusHandle {
    PROMETHEUS
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("A metrics recorder was already installed");
            }
            handle
        })
        .clone()
}

pub mod names {
    pub const BOOTSTRAP_COMPLETED: &str = "cherami_bootstrap_completed_total";
    pub const LISTENER_STARTED: &str = "cherami_listener_started_total";
    pub const STREAM_OPENED: &str = "cherami_stream_opened_total";
    pub const STREAM_FRAMES: &str = "cherami_stream_frames_total";
    pub const UPTIME_START: &str = "cherami_uptime_start_seconds";
}

/// Emits metrics tagged with this node's service and host.
#[derive(Debug, Clone)]
pub struct MetricsReporter {
    service: &'static str,
    host: String,
}

impl MetricsReporter {
    pub fn new(config: &RoleConfig) -> Self {
        // Make sure every metric emitted through the reporter lands in the exporter.
        let _ = prometheus_handle();
        Self {
            service: config.role.service_name(),
            host: resolve_host_name(&config.host_name),
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn bootstrap_completed(&self) {
        metrics::counter!(names::BOOTSTRAP_COMPLETED,
            "service" => self.service, "host" => self.host.clone())
        .increment(1);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        metrics::gauge!(names::UPTIME_START,
            "service" => self.service, "host" => self.host.clone())
        .set(now);
    }

    pub fn listener_started(&self, surface: &'static str) {
        metrics::counter!(names::LISTENER_STARTED,
            "service" => self.service, "host" => self.host.clone(), "surface" => surface)
        .increment(1);
    }

    pub fn stream_opened(&self, path: &str) {
        metrics::counter!(names::STREAM_OPENED,
            "service" => self.service, "host" => self.host.clone(), "path" => path.to_string())
        .increment(1);
    }

    pub fn stream_frames(&self, path: &str, frames: u64) {
        metrics::counter!(names::STREAM_FRAMES,
            "service" => self.service, "host" => self.host.clone(), "path" => path.to_string())
        .increment(frames);
    }
}

fn resolve_host_name(configured: &str) -> String {
    if !configured.is_empty() {
        return configured.to_string();
    }
    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
