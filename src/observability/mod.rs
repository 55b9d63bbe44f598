//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges through the metrics facade)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → diagnostic endpoint /metrics (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use self::logging::init_logging;
pub use self::metrics::{prometheus_handle, MetricsReporter};
