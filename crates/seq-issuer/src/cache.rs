use std::collections::HashMap;

use seq_schemas::PrefixConfig;
use tokio::sync::RwLock;

/// In-process `PrefixConfig` cache sitting in front of `seq-db`'s config
/// read, invalidated explicitly on config update rather than on a TTL —
/// `UpdateConfig` is rare and admin-driven, so a push invalidation is
/// simpler and never serves a stale template.
#[derive(Default)]
pub struct ConfigCache {
    entries: RwLock<HashMap<String, PrefixConfig>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, prefix: &str) -> Option<PrefixConfig> {
        self.entries.read().await.get(prefix).cloned()
    }

    pub async fn put(&self, config: PrefixConfig) {
        self.entries.write().await.insert(config.prefix.clone(), config);
    }

    pub async fn invalidate(&self, prefix: &str) {
        self.entries.write().await.remove(prefix);
    }
}
