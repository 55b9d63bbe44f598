//! Host UUID to address resolution.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use crate::collaborators::metadata::{MetadataClient, MetadataError};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no address registered for host {0}")]
    NotFound(String),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Resolves host UUIDs to `host:port` addresses, caching positive answers.
pub struct UuidResolver {
    meta: Arc<dyn MetadataClient>,
    cache: DashMap<String, String>,
}

impl UuidResolver {
    pub fn new(meta: Arc<dyn MetadataClient>) -> Self {
        Self {
            meta,
            cache: DashMap::new(),
        }
    }

    pub async fn lookup(&self, uuid: &str) -> Result<String, ResolveError> {
        if let Some(address) = self.cache.get(uuid) {
            return Ok(address.clone());
        }

        let address = self
            .meta
            .host_address(uuid)
            .await?
            .ok_or_else(|| ResolveError::NotFound(uuid.to_string()))?;

        self.cache.insert(uuid.to_string(), address.clone());
        Ok(address)
    }

    /// UUID of a previously resolved address.
    pub fn reverse_lookup(&self, address: &str) -> Option<String> {
        self.cache
            .iter()
            .find(|entry| entry.value() == address)
            .map(|entry| entry.key().clone())
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
