//! Authorization policy seam.

use thiserror::Error;

/// Kind of access being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{subject} may not {operation:?} {resource}")]
pub struct AuthError {
    pub subject: String,
    pub operation: Operation,
    pub resource: String,
}

pub trait AuthManager: Send + Sync {
    fn authorize(&self, subject: &str, operation: Operation, resource: &str)
        -> Result<(), AuthError>;

    fn name(&self) -> &'static str;
}

/// Allows every request. Real policy is plugged in by deployments.
#[derive(Debug, Default, Clone, Copy)]
pub struct BypassAuthManager;

impl AuthManager for BypassAuthManager {
    fn authorize(&self, _subject: &str, _operation: Operation, _resource: &str) -> Result<(), AuthError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "bypass"
    }
}
