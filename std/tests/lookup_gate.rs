use async_trait::async_trait;
use postgate_core::prelude::*;
use postgate_runtime::DataGate;
use postgate_std::prelude::*;
use postgate_test::{assert_ready, assert_slot_status};
use std::sync::Arc;

struct OneUser;

#[async_trait]
impl Directory for OneUser {
    async fn username(&self, user_id: &str) -> anyhow::Result<Option<String>> {
        Ok((user_id == "t2_abc").then(|| "alice".to_string()))
    }
}

struct BrokenCache;

#[async_trait]
impl HashCache for BrokenCache {
    async fn hget(&self, _key: &str, _field: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("connection refused")
    }

    async fn hset(&self, _key: &str, _field: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("connection refused")
    }
}

fn slots(cache: Arc<dyn HashCache>) -> Vec<FetchSlot> {
    vec![
        FetchSlot::new(
            "username",
            CachedLookup::new(cache, Arc::new(OneUser), "cache:userId-username", Some("t2_abc".into())),
        ),
        FetchSlot::new("settings", DelayFetch::new(5, "pixelary".to_string())),
        FetchSlot::new(
            "greeting",
            MapFetch::new("username", |name: &Option<String>| {
                format!("hello {}", name.as_deref().unwrap_or("anonymous"))
            }),
        )
        .depends_on(["username"]),
    ]
}

#[tokio::test]
async fn test_lookup_feeds_dependent_slot() {
    let mut gate = DataGate::register("lookup", slots(Arc::new(MemoryCache::new()))).unwrap();

    assert_eq!(gate.settle().await, Readiness::Ready);
    assert_ready!(gate);
    assert_eq!(
        gate.value::<String>("greeting").map(String::as_str),
        Some("hello alice")
    );
}

#[tokio::test]
async fn test_cache_failure_fails_only_username() {
    let mut gate = DataGate::register("lookup", slots(Arc::new(BrokenCache))).unwrap();

    assert_eq!(gate.settle().await, Readiness::Failed);
    assert_slot_status!(gate, "username", SlotStatus::Failed);
    assert_slot_status!(gate, "settings", SlotStatus::Resolved);
    assert_slot_status!(gate, "greeting", SlotStatus::Pending);

    let message = gate.error("username").map(ToString::to_string).unwrap();
    assert!(message.contains("reading username cache"), "{message}");
}
