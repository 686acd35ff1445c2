//! In-memory LRU cache with per-entry TTL.
//!
//! Stands in for Redis in single-process deployments and tests. Entries
//! expire lazily on read; the LRU bound keeps memory flat when many grid
//! cells are queried.

use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use weather_common::WeatherResult;

use crate::KeyValueCache;

struct CachedValue {
    value: String,
    inserted_at: Instant,
    ttl: Duration,
}

impl CachedValue {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() >= self.ttl
    }
}

/// Statistics for the memory cache.
///
/// All fields are atomic for lock-free reads.
#[derive(Debug, Default)]
pub struct MemoryCacheStats {
    /// Total cache hits
    pub hits: AtomicU64,
    /// Total cache misses (including expired entries)
    pub misses: AtomicU64,
    /// Total entries expired via TTL
    pub expired: AtomicU64,
}

impl MemoryCacheStats {
    /// Calculate cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

/// In-memory LRU cache.
pub struct MemoryCache {
    cache: Arc<RwLock<LruCache<String, CachedValue>>>,
    stats: Arc<MemoryCacheStats>,
}

impl MemoryCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let cache_size = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            cache: Arc::new(RwLock::new(LruCache::new(cache_size))),
            stats: Arc::new(MemoryCacheStats::default()),
        }
    }

    /// TTL an entry was written with, if it is still live.
    pub async fn ttl_of(&self, key: &str) -> Option<Duration> {
        let cache = self.cache.read().await;
        cache
            .peek(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.ttl)
    }

    /// Current statistics.
    pub fn stats(&self) -> &MemoryCacheStats {
        &self.stats
    }

    /// Get current number of entries in cache (expired ones included until read).
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Check if cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> WeatherResult<Option<String>> {
        // Write lock: a hit promotes the entry, an expired one is dropped.
        let mut cache = self.cache.write().await;

        let expired = match cache.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            cache.pop(key);
            self.stats.expired.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> WeatherResult<()> {
        let mut cache = self.cache.write().await;
        cache.put(
            key.to_string(),
            CachedValue {
                value: value.to_string(),
                inserted_at: Instant::now(),
                ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_hit_miss() {
        let cache = MemoryCache::new(10);

        // Miss on empty cache
        assert!(cache.get("test_key").await.unwrap().is_none());
        assert_eq!(cache.stats().misses.load(Ordering::Relaxed), 1);

        cache.set("test_key", "42", Duration::from_secs(60)).await.unwrap();

        // Hit on populated cache
        assert_eq!(cache.get("test_key").await.unwrap().as_deref(), Some("42"));
        assert_eq!(cache.stats().hits.load(Ordering::Relaxed), 1);
        assert!((cache.stats().hit_rate() - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryCache::new(2);

        // Insert 3 items into capacity-2 cache
        for i in 0..3 {
            cache
                .set(&format!("key_{}", i), &i.to_string(), Duration::from_secs(60))
                .await
                .unwrap();
        }

        // First key should be evicted
        assert!(cache.get("key_0").await.unwrap().is_none());
        // Last two should still be present
        assert!(cache.get("key_1").await.unwrap().is_some());
        assert!(cache.get("key_2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = MemoryCache::new(4);
        cache.set("short", "v", Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(cache.get("short").await.unwrap().is_none());
        assert_eq!(cache.stats().expired.load(Ordering::Relaxed), 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_ttl_is_recorded() {
        let cache = MemoryCache::new(4);
        let day = Duration::from_secs(24 * 3600);
        cache.set("k", "v", day).await.unwrap();
        assert_eq!(cache.ttl_of("k").await, Some(day));
        assert_eq!(cache.ttl_of("missing").await, None);
    }

    #[tokio::test]
    async fn test_zero_capacity_holds_one_entry() {
        let cache = MemoryCache::new(0);
        cache.set("a", "1", Duration::from_secs(60)).await.unwrap();
        cache.set("b", "2", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_overwrite_keeps_last_value() {
        let cache = MemoryCache::new(4);
        cache.set("k", "first", Duration::from_secs(60)).await.unwrap();
        cache.set("k", "second", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("second"));
        assert_eq!(cache.len().await, 1);
    }
}
