//! Storage abstractions for the weather resolution services.
//!
//! Provides a unified TTL key-value interface with:
//! - Redis for shared caching across processes
//! - An in-memory LRU for single-process use and tests

pub mod cache;
pub mod memory_cache;

pub use cache::{KeyValueCache, MaskCacheKey, RedisCache, WeatherCacheKey};
pub use memory_cache::{MemoryCache, MemoryCacheStats};
