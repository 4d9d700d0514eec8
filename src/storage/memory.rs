//! In-memory cache backend
//!
//! Process-local store with passive TTL expiry, used when Redis is disabled
//! and by the test suite. Entries expire lazily on read; there is no eviction
//! thread.

use crate::storage::CacheBackend;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline <= now)
    }
}

/// In-memory key/value store honoring per-entry TTLs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .expect("memory backend lock poisoned")
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    /// Whether the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().expect("memory backend lock poisoned");
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|secs| Instant::now() + Duration::from_secs(secs)),
        };
        self.entries
            .lock()
            .expect("memory backend lock poisoned")
            .insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .expect("memory backend lock poisoned")
            .remove(key);
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let now = Instant::now();
        let keys = self
            .entries
            .lock()
            .expect("memory backend lock poisoned")
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        Ok(keys)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
