use crate::models::EventRecord;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// In-memory cache of fetched collections
///
/// Keyed by collection name. Entries expire after the configured TTL so
/// edits made in the admin panel show up without a restart.
#[derive(Clone)]
pub struct EventCache {
    cache: moka::future::Cache<String, Arc<Vec<EventRecord>>>,
    ttl_secs: u64,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
}

impl EventCache {
    /// Create a new cache
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries.max(1))
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache, ttl_secs }
    }

    /// A TTL of zero turns caching off
    pub fn is_enabled(&self) -> bool {
        self.ttl_secs > 0
    }

    pub async fn get(&self, key: &str) -> Option<Arc<Vec<EventRecord>>> {
        if !self.is_enabled() {
            return None;
        }
        let hit = self.cache.get(key).await;
        if hit.is_some() {
            tracing::trace!("Cache hit: {}", key);
        } else {
            tracing::trace!("Cache miss: {}", key);
        }
        hit
    }

    pub async fn insert(&self, key: &str, events: Arc<Vec<EventRecord>>) {
        if !self.is_enabled() {
            return;
        }
        self.cache.insert(key.to_string(), events).await;
        tracing::trace!("Cache set: {}", key);
    }

    /// Return the cached collection or run `load` to fill it
    ///
    /// Concurrent misses on the same key wait for a single load. Errors are
    /// not cached.
    pub async fn get_or_try_load<Fut, E>(
        &self,
        key: &str,
        load: Fut,
    ) -> Result<Arc<Vec<EventRecord>>, Arc<E>>
    where
        Fut: Future<Output = Result<Vec<EventRecord>, E>>,
        E: Send + Sync + 'static,
    {
        if !self.is_enabled() {
            return load.await.map(Arc::new).map_err(Arc::new);
        }

        self.cache
            .try_get_with(key.to_string(), async move {
                tracing::trace!("Cache miss: {}", key);
                load.await.map(Arc::new)
            })
            .await
    }

    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample() -> Arc<Vec<EventRecord>> {
        let event: EventRecord = serde_json::from_value(serde_json::json!({
            "id": "e1",
            "lat": 39.9,
            "lng": 32.8
        }))
        .unwrap();
        Arc::new(vec![event])
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = EventCache::new(4, 60);
        assert!(cache.get("events").await.is_none());

        cache.insert("events", sample()).await;
        let hit = cache.get("events").await.unwrap();
        assert_eq!(hit[0].id, "e1");

        cache.invalidate("events").await;
        assert!(cache.get("events").await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_load() {
        let cache = EventCache::new(4, 60);
        let loads = AtomicUsize::new(0);

        let load = || async {
            loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, String>(Vec::clone(&sample()))
        };

        let (first, second) = tokio::join!(
            cache.get_or_try_load("events", load()),
            cache.get_or_try_load("events", load()),
        );

        assert_eq!(first.unwrap()[0].id, "e1");
        assert_eq!(second.unwrap()[0].id, "e1");
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(cache.get("events").await.is_some());
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let cache = EventCache::new(4, 60);

        let err = cache
            .get_or_try_load("events", async { Err::<Vec<EventRecord>, _>("down".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err.as_str(), "down");
        assert!(cache.get("events").await.is_none());

        let events = cache
            .get_or_try_load("events", async { Ok::<_, String>(Vec::clone(&sample())) })
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let cache = EventCache::new(4, 0);
        cache.insert("events", sample()).await;

        assert!(!cache.is_enabled());
        assert!(cache.get("events").await.is_none());

        let loaded = cache
            .get_or_try_load("events", async { Ok::<_, String>(Vec::new()) })
            .await
            .unwrap();
        assert!(loaded.is_empty());
        assert!(cache.get("events").await.is_none());
    }
}
