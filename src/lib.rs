//! Node bootstrap for a multi-role messaging cluster.
//!
//! One binary starts any of six roles. Every role goes through the same
//! pipeline:
//!
//! ```text
//! config (layered TOML) → resolve role → ports → metadata client
//!     → shared collaborators → identity (+ storage backend)
//!     → ServiceBundle → role host
//!     → primary transport → websocket → diagnostic loop
//! ```

pub mod bootstrap;
pub mod collaborators;
pub mod config;
pub mod host;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod service;
pub mod storage;

pub use bootstrap::{bootstrap, BootstrapError, Bootstrapped, ServiceBundle};
pub use config::ServerConfig;
pub use host::{DefaultHostFactory, HostFactory, RoleHost};
pub use lifecycle::{start_service, RunningService, Shutdown};
pub use service::ServiceRole;
