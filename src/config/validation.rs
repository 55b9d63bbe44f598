//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports non-zero, diagnostic port in range)
//! - Check every role that streams has a websocket port
//! - Reject two listeners on the same address and port, across every
//!   role and surface (primary, websocket, diagnostic); roles are often
//!   co-located on one host
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - A missing storage host UUID is not checked here

use std::collections::HashMap;
use std::net::IpAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::net::diagnostic_port;
use crate::service::ServiceRole;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{role}: primary port must be non-zero")]
    ZeroPort { role: ServiceRole },

    #[error("{role}: websocket port must be non-zero")]
    ZeroWebsocketPort { role: ServiceRole },

    #[error("{role}: primary port {port} leaves no room for the diagnostic port")]
    DiagnosticPortOverflow { role: ServiceRole, port: u16 },

    #[error("{first} {first_surface} and {second} {second_surface} both listen on {address}:{port}")]
    PortConflict {
        first: ServiceRole,
        first_surface: &'static str,
        second: ServiceRole,
        second_surface: &'static str,
        address: IpAddr,
        port: u16,
    },

    #[error("metadata: at least one endpoint is required")]
    NoMetadataEndpoints,

    #[error("metadata: connect_timeout_ms must be non-zero")]
    ZeroMetadataTimeout,

    #[error("logging: unknown level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut listeners: HashMap<(IpAddr, u16), (ServiceRole, &'static str)> = HashMap::new();
    let mut claim = |role: ServiceRole, surface: &'static str, address: IpAddr, port: u16| {
        if let Some(&(first, first_surface)) = listeners.get(&(address, port)) {
            return Some(ValidationError::PortConflict {
                first,
                first_surface,
                second: role,
                second_surface: surface,
                address,
                port,
            });
        }
        listeners.insert((address, port), (role, surface));
        None
    };

    for role in ServiceRole::ALL {
        let service = config.service(role);
        let address = service.listen_address;

        if service.port == 0 {
            errors.push(ValidationError::ZeroPort { role });
        } else {
            errors.extend(claim(role, "primary", address, service.port));
            match diagnostic_port(service.port) {
                Some(port) => errors.extend(claim(role, "diagnostic", address, port)),
                None => errors.push(ValidationError::DiagnosticPortOverflow {
                    role,
                    port: service.port,
                }),
            }
        }

        if role.profile().websocket {
            if service.websocket_port == 0 {
                errors.push(ValidationError::ZeroWebsocketPort { role });
            } else {
                errors.extend(claim(role, "websocket", address, service.websocket_port));
            }
        }
    }

    if config.metadata.endpoints.is_empty() {
        errors.push(ValidationError::NoMetadataEndpoints);
    }
    if config.metadata.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroMetadataTimeout);
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.logging.level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
