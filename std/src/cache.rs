//! Hash-field key/value cache.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A key/value store addressed by hash key and field, in the manner of
/// Redis `HGET`/`HSET`.
#[async_trait]
pub trait HashCache: Send + Sync {
    async fn hget(&self, key: &str, field: &str) -> anyhow::Result<Option<String>>;

    async fn hset(&self, key: &str, field: &str, value: &str) -> anyhow::Result<()>;
}

/// In-process [`HashCache`].
#[derive(Debug, Default)]
pub struct MemoryCache {
    hashes: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields stored under `key`.
    pub async fn len(&self, key: &str) -> usize {
        self.hashes.read().await.get(key).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl HashCache for MemoryCache {
    async fn hget(&self, key: &str, field: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .hashes
            .read()
            .await
            .get(key)
            .and_then(|hash| hash.get(field))
            .cloned())
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> anyhow::Result<()> {
        self.hashes
            .write()
            .await
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }
}
