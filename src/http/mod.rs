//! HTTP surfaces of a node.
//!
//! # Data Flow
//! ```text
//! bound TcpListener
//!     → serve() (axum, tracing layer, graceful shutdown)
//!     → websocket.rs   (role stream handlers on websocket_port)
//!     → diagnostic.rs  (introspection on primary + 10000)
//! ```

pub mod diagnostic;
pub mod websocket;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::lifecycle::Shutdown;

pub use diagnostic::{start_diagnostic_server, DiagnosticTarget};
pub use websocket::start_websocket_server;

/// Serve `router` on an already bound listener in the background until shutdown.
pub fn serve(surface: &'static str, listener: TcpListener, router: Router, shutdown: &Shutdown) {
    let signal = shutdown.signalled();
    let app = router.layer(TraceLayer::new_for_http());

    tokio::spawn(async move {
        match axum::serve(listener, app).with_graceful_shutdown(signal).await {
            Ok(()) => tracing::info!(surface, "Listener stopped"),
            Err(e) => tracing::error!(surface, error = %e, "Listener failed"),
        }
    });
}
