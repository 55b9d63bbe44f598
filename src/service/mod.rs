//! Role descriptors and process identity.

pub mod identity;
pub mod role;

pub use identity::{resolve_identity, ServiceIdentity};
pub use role::{DiagnosticScope, IdentityPolicy, RoleProfile, ServiceRole, UnknownRole};
