//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Bootstrapped → primary transport → websocket → diagnostic loop
//!
//! Shutdown (shutdown.rs):
//!     Ctrl-C → trigger broadcast → every listener stops accepting → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: bootstrap first, then listeners
//! - Process supervision and restarts are left to the process manager

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start_service, RunningService, StartError};
