//! Shared record cache.
//!
//! The orchestrator only ever calls `get` before the upstream fetch and
//! `set` after a successful one. Expiry belongs to the store: every entry
//! lives for the same fixed TTL and is never refreshed on read.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::types::WeatherRecord;

const KEY_PREFIX: &str = "weather_data_";

/// Boxed future so the trait stays usable as `dyn RecordCache`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Key for a city, and for its language when localization is enabled.
///
/// `city` must already be lower-cased.
pub fn cache_key(city: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!("{}{}_{}", KEY_PREFIX, city, lang),
        None => format!("{}{}", KEY_PREFIX, city),
    }
}

/// Key/value store for finished records.
pub trait RecordCache: Send + Sync {
    fn get(&self, key: &str) -> BoxFuture<'_, Option<WeatherRecord>>;

    /// Store `record` under `key` with the store's TTL, replacing any entry.
    fn set(&self, key: &str, record: WeatherRecord) -> BoxFuture<'_, ()>;
}

/// In-process store backed by moka.
pub struct MemoryRecordCache {
    cache: MokaCache<String, WeatherRecord>,
}

impl MemoryRecordCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }
}

impl RecordCache for MemoryRecordCache {
    fn get(&self, key: &str) -> BoxFuture<'_, Option<WeatherRecord>> {
        let key = key.to_string();
        Box::pin(async move { self.cache.get(&key).await })
    }

    fn set(&self, key: &str, record: WeatherRecord) -> BoxFuture<'_, ()> {
        let key = key.to_string();
        Box::pin(async move { self.cache.insert(key, record).await })
    }
}
