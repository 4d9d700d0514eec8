//! Permission caching over the volatile store
//!
//! Cache-aside: the backend is consulted first, and the static role model is
//! the source of truth on a miss. A corrupt entry is evicted and treated as a
//! miss; an unavailable backend degrades every operation to recomputation.
//! Neither condition ever fails the request.

use crate::auth::rbac::{self, Permission, Role};
use crate::config::CacheConfig;
use crate::storage::CacheBackend;
use crate::utils::error::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const PERMISSIONS_KEY_SPACE: &str = "user_permissions";

/// Cache of effective permission sets keyed by actor id.
#[derive(Clone)]
pub struct PermissionCache {
    backend: Arc<dyn CacheBackend>,
    config: CacheConfig,
}

impl PermissionCache {
    /// Create a permission cache over the given backend.
    pub fn new(backend: Arc<dyn CacheBackend>, config: CacheConfig) -> Self {
        Self { backend, config }
    }

    fn cache_key(&self, actor_id: Uuid) -> String {
        format!(
            "{}{}:{}",
            self.config.key_prefix, PERMISSIONS_KEY_SPACE, actor_id
        )
    }

    /// Get the effective permission set for an actor.
    ///
    /// An entry, when present, reflects the role the actor held when it was
    /// written; role changes must go through [`invalidate`](Self::invalidate)
    /// or the stale set survives until TTL expiry.
    pub async fn effective_permissions(
        &self,
        actor_id: Uuid,
        role: Role,
    ) -> HashSet<Permission> {
        let key = self.cache_key(actor_id);

        match self.backend.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Permission>>(&raw) {
                Ok(cached) => return cached.into_iter().collect(),
                Err(e) => {
                    // Corruption is a miss, not an error: evict and recompute.
                    warn!(
                        actor_id = %actor_id,
                        "Cache corruption detected, clearing cache: {}", e
                    );
                    if let Err(e) = self.backend.delete(&key).await {
                        debug!("Failed to clear corrupt cache entry: {}", e);
                    }
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(
                    actor_id = %actor_id,
                    "Cache backend unavailable, recomputing permissions: {}", e
                );
            }
        }

        let permissions = rbac::effective_permissions(role);

        let mut wire: Vec<Permission> = permissions.iter().copied().collect();
        wire.sort();
        match serde_json::to_string(&wire) {
            Ok(raw) => {
                if let Err(e) = self.backend.set(&key, &raw, Some(self.config.ttl)).await {
                    debug!("Failed to write permission cache entry: {}", e);
                } else {
                    debug!(actor_id = %actor_id, role = %role, "Cached permissions");
                }
            }
            Err(e) => debug!("Failed to serialize permission set: {}", e),
        }

        permissions
    }

    /// Invalidate the cached permission set for an actor.
    ///
    /// Must be called synchronously on role change, two-factor status change,
    /// login, and account deletion. Unconditional and idempotent; a backend
    /// failure is logged, not raised.
    pub async fn invalidate(&self, actor_id: Uuid) {
        let key = self.cache_key(actor_id);
        match self.backend.delete(&key).await {
            Ok(()) => info!(actor_id = %actor_id, "Invalidated permission cache"),
            Err(e) => warn!(
                actor_id = %actor_id,
                "Failed to invalidate permission cache: {}", e
            ),
        }
    }

    /// Evict every permission entry in the application namespace.
    pub async fn invalidate_all(&self) -> Result<usize> {
        let prefix = format!("{}{}:", self.config.key_prefix, PERMISSIONS_KEY_SPACE);
        let keys = self.backend.scan_prefix(&prefix).await?;
        let mut deleted = 0;
        for key in &keys {
            self.backend.delete(key).await?;
            deleted += 1;
        }
        info!("Invalidated {} permission cache entries", deleted);
        Ok(deleted)
    }
}
