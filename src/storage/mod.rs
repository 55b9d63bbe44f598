//! Storage backend selection (store role only).
//!
//! # Data Flow
//! ```text
//! --store / storage.store          → backend.rs  → Option<BackendKind>
//! --dir / CHERAMI_STORE / base_dir → base_dir.rs → Option<PathBuf>
//!     → StorageBackendSelection (computed once, handed to the store host)
//! ```

pub mod backend;
pub mod base_dir;

use std::path::PathBuf;

use serde::Serialize;

use crate::config::StorageConfig;

pub use backend::{resolve_backend, BackendKind};
pub use base_dir::{resolve_base_dir, STORE_DIR_ENV};

/// Command-line and environment inputs for the store role.
#[derive(Debug, Clone, Default)]
pub struct StorageOverrides {
    /// `--store` flag.
    pub store: Option<String>,
    /// `--dir` flag.
    pub dir: Option<String>,
    /// Value of `CHERAMI_STORE`.
    pub env_dir: Option<String>,
}

impl StorageOverrides {
    pub fn is_empty(&self) -> bool {
        self.store.is_none() && self.dir.is_none()
    }
}

/// Backend kind and base directory for the store host. `None` fields are
/// deferred to the host's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageBackendSelection {
    pub kind: Option<BackendKind>,
    pub base_dir: Option<PathBuf>,
}

impl StorageBackendSelection {
    /// Combine overrides with declarative storage config.
    pub fn resolve(overrides: &StorageOverrides, storage: &StorageConfig) -> Self {
        let hint = overrides.store.as_deref().unwrap_or(&storage.store);
        Self {
            kind: resolve_backend(hint),
            base_dir: resolve_base_dir(
                overrides.dir.as_deref().unwrap_or_default(),
                overrides.env_dir.as_deref().unwrap_or_default(),
                &storage.base_dir,
            ),
        }
    }
}
