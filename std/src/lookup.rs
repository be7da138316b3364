use crate::cache::HashCache;
use anyhow::Context;
use async_trait::async_trait;
use postgate_core::error::FetchError;
use postgate_core::fetch::Fetch;
use postgate_core::value::{SlotValue, SlotValues};
use std::sync::Arc;

/// Source of truth for user id to username.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn username(&self, user_id: &str) -> anyhow::Result<Option<String>>;
}

/// Resolves a viewer's username through a [`HashCache`], falling back to a
/// [`Directory`] and writing the answer back on a miss.
///
/// Resolves to `Option<String>`: `None` for anonymous viewers (the cache
/// is not consulted) and for ids the directory does not know.
pub struct CachedLookup {
    cache: Arc<dyn HashCache>,
    directory: Arc<dyn Directory>,
    cache_key: String,
    user_id: Option<String>,
}

impl CachedLookup {
    pub fn new(
        cache: Arc<dyn HashCache>,
        directory: Arc<dyn Directory>,
        cache_key: impl Into<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            cache,
            directory,
            cache_key: cache_key.into(),
            user_id,
        }
    }

    pub async fn resolve(&self) -> anyhow::Result<Option<String>> {
        let Some(user_id) = self.user_id.as_deref() else {
            return Ok(None);
        };

        if let Some(cached) = self
            .cache
            .hget(&self.cache_key, user_id)
            .await
            .context("reading username cache")?
        {
            tracing::debug!(user_id, "Username cache hit");
            return Ok(Some(cached));
        }

        let Some(username) = self
            .directory
            .username(user_id)
            .await
            .with_context(|| format!("looking up user {user_id}"))?
        else {
            return Ok(None);
        };

        self.cache
            .hset(&self.cache_key, user_id, &username)
            .await
            .context("writing username cache")?;
        tracing::debug!(user_id, "Username cached");
        Ok(Some(username))
    }
}

#[async_trait]
impl Fetch for CachedLookup {
    async fn fetch(&self, _inputs: &SlotValues) -> Result<SlotValue, FetchError> {
        Ok(SlotValue::new(self.resolve().await?))
    }
}
