//! Cache storage backends
//!
//! The permission cache talks to a volatile store through the [`CacheBackend`]
//! trait. The real deployment uses Redis; when Redis is disabled the
//! process-local in-memory backend is used, and when no backend can be
//! constructed at all the always-miss [`NullBackend`] keeps authorization
//! working by forcing recomputation.

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::MemoryBackend;
#[cfg(feature = "redis")]
pub use redis::RedisBackend;

use crate::config::RedisConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Key/value operations the permission cache needs from a volatile store.
///
/// Values are opaque strings, keys carry the application-wide prefix. All
/// operations are single-key and atomic on the backend side; no cross-key
/// transactions are required.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get a value by key. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a key-value pair with optional TTL in seconds.
    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<()>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// List all live keys starting with `prefix`.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> Result<()>;
}

/// Always-miss backend used when no real store is available.
///
/// Every read misses and every write is discarded, so callers recompute on
/// each request instead of failing.
#[derive(Debug, Clone, Default)]
pub struct NullBackend;

#[async_trait]
impl CacheBackend for NullBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Option<u64>) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn scan_prefix(&self, _prefix: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Construct the cache backend described by the configuration.
///
/// Falls back rather than failing: a disabled Redis section yields the
/// in-memory backend, and a Redis connection error yields the always-miss
/// backend so startup never depends on the cache tier.
pub async fn backend_from_config(config: &RedisConfig) -> Arc<dyn CacheBackend> {
    if !config.enabled {
        info!("Redis disabled, using in-memory cache backend");
        return Arc::new(MemoryBackend::new());
    }

    #[cfg(feature = "redis")]
    {
        match RedisBackend::new(config).await {
            Ok(backend) => return Arc::new(backend),
            Err(e) => {
                warn!("Failed to initialize Redis backend, degrading to always-miss: {}", e);
                return Arc::new(NullBackend);
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    {
        warn!("Redis requested but the redis feature is disabled, degrading to always-miss");
        Arc::new(NullBackend)
    }
}
