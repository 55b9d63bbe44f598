//! Auxiliary port derivation.
//!
//! The diagnostic listener sits at a fixed offset from the primary port so
//! operators can always find it, and so it never competes with the primary
//! listener for the same interface/port pair.

use serde::Serialize;
use thiserror::Error;

use crate::config::RoleConfig;
use crate::service::ServiceRole;

pub const DIAGNOSTIC_PORT_OFFSET: u16 = 10_000;

/// Diagnostic port for `primary`, or `None` when the offset leaves the port range.
pub fn diagnostic_port(primary: u16) -> Option<u16> {
    primary.checked_add(DIAGNOSTIC_PORT_OFFSET)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("primary port {0} leaves no room for the diagnostic offset")]
    DiagnosticOverflow(u16),
}

/// Every port a role listens on, derived once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortAssignment {
    pub primary: u16,
    /// Present only for roles that stream over websockets.
    pub websocket: Option<u16>,
    pub diagnostic: u16,
}

impl PortAssignment {
    pub fn derive(config: &RoleConfig) -> Result<Self, PortError> {
        let diagnostic =
            diagnostic_port(config.port).ok_or(PortError::DiagnosticOverflow(config.port))?;
        Ok(Self {
            primary: config.port,
            websocket: websocket_port(config.role, config.websocket_port),
            diagnostic,
        })
    }
}

fn websocket_port(role: ServiceRole, port: u16) -> Option<u16> {
    role.profile().websocket.then_some(port)
}
