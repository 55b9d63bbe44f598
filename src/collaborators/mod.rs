//! Shared collaborators assembled into the service bundle.
//!
//! # Data Flow
//! ```text
//! MetadataConfig → metadata.rs (connect; fatal on failure)
//!     → hardware.rs (hardware records via metadata)
//!     → resolver.rs (uuid → address via metadata)
//! ServiceConfig.dynamic → dconfig.rs (per-role tunables)
//! auth.rs (bypass policy by default)
//! ```

pub mod auth;
pub mod dconfig;
pub mod hardware;
pub mod metadata;
pub mod resolver;

pub use auth::{AuthError, AuthManager, BypassAuthManager, Operation};
pub use dconfig::DynamicConfigClient;
pub use hardware::{HardwareInfo, HardwareInfoReader};
pub use metadata::{MetadataClient, MetadataError, MetadataServiceClient};
pub use resolver::{ResolveError, UuidResolver};

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::{HardwareInfo, MetadataClient, MetadataError};

    /// In-memory metadata that counts lookups.
    #[derive(Default)]
    pub struct StaticMetadata {
        hosts: HashMap<String, String>,
        hardware: HashMap<String, HardwareInfo>,
        calls: AtomicUsize,
    }

    impl StaticMetadata {
        pub fn with_host(mut self, uuid: &str, address: &str) -> Self {
            self.hosts.insert(uuid.into(), address.into());
            self
        }

        pub fn with_hardware(mut self, host: &str, info: HardwareInfo) -> Self {
            self.hardware.insert(host.into(), info);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataClient for StaticMetadata {
        async fn host_address(&self, uuid: &str) -> Result<Option<String>, MetadataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hosts.get(uuid).cloned())
        }

        async fn hardware_info(&self, host: &str) -> Result<Option<HardwareInfo>, MetadataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hardware.get(host).cloned())
        }
    }
}
