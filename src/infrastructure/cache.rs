use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;

use crate::domain::ports::Cache;

const MAX_ENTRIES: u64 = 10_000;

type Entry = (String, Duration);

/// Each entry lives for the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.1)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.1)
    }
}

/// In-process cache backed by moka.
pub struct MokaCacheStore {
    inner: MokaCache<String, Entry>,
}

impl MokaCacheStore {
    pub fn new() -> Self {
        Self {
            inner: MokaCache::builder()
                .max_capacity(MAX_ENTRIES)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

impl Default for MokaCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MokaCacheStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.map(|(value, _)| value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        self.inner.insert(key.to_string(), (value, ttl)).await;
    }
}
