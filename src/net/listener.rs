//! TCP listener binding for the node's network surfaces.
//!
//! # Responsibilities
//! - Bind the primary, websocket and diagnostic listeners
//! - Report which surface failed to bind, and where

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind {surface} listener on {addr}: {source}")]
    Bind {
        surface: &'static str,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind `address:port` for the named surface and log the bound address.
pub async fn bind(
    surface: &'static str,
    address: IpAddr,
    port: u16,
) -> Result<(TcpListener, SocketAddr), ListenerError> {
    let addr = SocketAddr::new(address, port);
    let bind_err = |source| ListenerError::Bind {
        surface,
        addr,
        source,
    };

    let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
    let local_addr = listener.local_addr().map_err(bind_err)?;

    tracing::info!(surface, address = %local_addr, "Listener bound");
    Ok((listener, local_addr))
}
