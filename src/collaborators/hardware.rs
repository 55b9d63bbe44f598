//! Host hardware information, read through the metadata client.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::collaborators::metadata::{MetadataClient, MetadataError};

/// Hardware record of a host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HardwareInfo {
    pub sku: String,
    pub cpu_cores: u32,
    pub memory_gb: u32,
    pub disk_gb: u32,
}

impl Default for HardwareInfo {
    fn default() -> Self {
        Self {
            sku: "unknown".to_string(),
            cpu_cores: 0,
            memory_gb: 0,
            disk_gb: 0,
        }
    }
}

/// Caching reader of host hardware records.
pub struct HardwareInfoReader {
    meta: Arc<dyn MetadataClient>,
    cache: DashMap<String, HardwareInfo>,
}

impl HardwareInfoReader {
    pub fn new(meta: Arc<dyn MetadataClient>) -> Self {
        Self {
            meta,
            cache: DashMap::new(),
        }
    }

    /// Hardware record for `host`; hosts without a record get the default
    /// record, which is not cached.
    pub async fn read(&self, host: &str) -> Result<HardwareInfo, MetadataError> {
        if let Some(info) = self.cache.get(host) {
            return Ok(info.clone());
        }

        match self.meta.hardware_info(host).await? {
            Some(info) => {
                self.cache.insert(host.to_string(), info.clone());
                Ok(info)
            }
            None => {
                tracing::debug!(host, "No hardware record, using default");
                Ok(HardwareInfo::default())
            }
        }
    }

    pub fn cached_hosts(&self) -> usize {
        self.cache.len()
    }
}
