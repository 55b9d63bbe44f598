//! Dynamic configuration client scoped to one role.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use arc_swap::ArcSwap;

/// Key/value view of a role's tunables.
///
/// Readers always see a consistent snapshot; a new snapshot replaces the
/// old one atomically.
pub struct DynamicConfigClient {
    service: &'static str,
    values: ArcSwap<BTreeMap<String, String>>,
}

impl DynamicConfigClient {
    pub fn new(service: &'static str, initial: BTreeMap<String, String>) -> Self {
        Self {
            service,
            values: ArcSwap::from_pointee(initial),
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.load().get(key).cloned()
    }

    /// Parse `key` as `T`, falling back to `default` when absent or malformed.
    pub fn get_or<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.values.load().get(key).map(|raw| raw.parse::<T>()) {
            Some(Ok(value)) => value,
            Some(Err(_)) => {
                tracing::warn!(service = self.service, key, "Malformed dynamic config value");
                default
            }
            None => default,
        }
    }

    pub fn snapshot(&self) -> Arc<BTreeMap<String, String>> {
        self.values.load_full()
    }

    pub fn replace(&self, values: BTreeMap<String, String>) {
        self.values.store(Arc::new(values));
    }
}
