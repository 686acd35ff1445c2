//! Key-value cache abstraction and its Redis backend.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use weather_common::{Address, GridCell, TimeWindow, WeatherError, WeatherResult};

/// String cache with per-entry TTL.
///
/// Backends must make `get` and `set` atomic per key; nothing else is assumed.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Read a value, `None` if absent or expired.
    async fn get(&self, key: &str) -> WeatherResult<Option<String>>;

    /// Write a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> WeatherResult<()>;
}

/// Redis cache client.
#[derive(Clone)]
pub struct RedisCache {
    conn: MultiplexedConnection,
}

impl RedisCache {
    /// Connect to Redis.
    pub async fn connect(redis_url: &str) -> WeatherResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| WeatherError::CacheError(format!("Redis connection failed: {}", e)))?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| WeatherError::CacheError(format!("Redis connection failed: {}", e)))?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> WeatherResult<Option<String>> {
        // MultiplexedConnection clones share one socket.
        let mut conn = self.conn.clone();
        let result: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| WeatherError::CacheError(format!("Cache get failed: {}", e)))?;

        debug!(key = %key, hit = result.is_some(), "Redis get");
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> WeatherResult<()> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry.
        let secs = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(key, value, secs)
            .await
            .map_err(|e| WeatherError::CacheError(format!("Cache set failed: {}", e)))?;

        Ok(())
    }
}

/// Cache key for a grid cell's weather record in one hour window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeatherCacheKey {
    pub cell: GridCell,
    pub window: TimeWindow,
}

impl WeatherCacheKey {
    pub fn new(cell: GridCell, window: TimeWindow) -> Self {
        Self { cell, window }
    }
}

impl fmt::Display for WeatherCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "weatherInfo:{}:{}",
            self.cell.key_fragment(),
            self.window.cache_fragment()
        )
    }
}

/// Cache key for a district's PM10 reading in one hour window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaskCacheKey {
    pub sido_name: String,
    pub city_name: String,
    pub window: TimeWindow,
}

impl MaskCacheKey {
    pub fn new(address: &Address, window: TimeWindow) -> Self {
        Self {
            sido_name: address.sido_name.clone(),
            city_name: address.city_name.clone(),
            window,
        }
    }
}

impl fmt::Display for MaskCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "maskInfo:{}{}:{}",
            self.sido_name,
            self.city_name,
            self.window.cache_fragment()
        )
    }
}
