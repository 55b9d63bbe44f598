//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! RoleConfig (port, websocket_port)
//!     → ports.rs (PortAssignment, diagnostic = primary + 10000)
//!     → listener.rs (bind each surface after bootstrap)
//!     → Hand off to HTTP layer
//! ```

pub mod listener;
pub mod ports;

pub use listener::{bind, ListenerError};
pub use ports::{diagnostic_port, PortAssignment, PortError, DIAGNOSTIC_PORT_OFFSET};
