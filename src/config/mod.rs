//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config dir (base.toml + <environment>.toml)
//!     → loader.rs (parse, layer, deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → ServerConfig::resolve(role) → ResolvedConfig for this process
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a process restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_layered, ConfigError};
pub use schema::{
    LogFormat, LoggingConfig, MetadataConfig, ResolvedConfig, RoleConfig, ServerConfig,
    ServiceConfig, StorageConfig, TransportConfig,
};
pub use validation::ValidationError;
