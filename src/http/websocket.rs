//! Websocket streaming transport.
//!
//! # Responsibilities
//! - Bind the role's websocket port on its listen address
//! - Serve the stream handlers the role host registered
//!
//! # Design Decisions
//! - Upgrades and frame handling belong to the host's handlers
//! - Started only after the primary transport is accepting traffic

use std::net::{IpAddr, SocketAddr};

use axum::Router;

use crate::lifecycle::Shutdown;
use crate::net::{self, ListenerError};

pub async fn start_websocket_server(
    address: IpAddr,
    port: u16,
    routes: Router,
    shutdown: &Shutdown,
) -> Result<SocketAddr, ListenerError> {
    let (listener, addr) = net::bind("websocket", address, port).await?;
    super::serve("websocket", listener, routes, shutdown);
    Ok(addr)
}
