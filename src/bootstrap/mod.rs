//! Node bootstrap.
//!
//! # Data Flow
//! ```text
//! ServerConfig + role
//!     → resolve RoleConfig → derive PortAssignment
//!     → connect metadata (fatal on failure)
//!     → hardware reader, metrics reporter, dynamic config
//!     → identity (+ storage backend for the store role)
//!     → ServiceBundle → HostFactory → (RoleHost, channels)
//! ```

pub mod bundle;
pub mod error;
pub mod sequencer;

pub use bundle::ServiceBundle;
pub use error::BootstrapError;
pub use sequencer::{bootstrap, Bootstrapped};
