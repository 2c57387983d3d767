//! In-process cache backend.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use crate::entry::MemoryEntry;
use crate::{Cache, CacheKey, CachedResponse};

/// Volatile `CacheKey -> response` map behind a single `RwLock`.
///
/// Lookups share the read lock; inserts, lazy evictions and `clear` take the
/// write lock. Nothing is held across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryCache {
    inner: RwLock<HashMap<CacheKey, MemoryEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, MemoryEntry>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, MemoryEntry>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, key: CacheKey, entry: MemoryEntry) {
        self.write().insert(key, entry);
    }

    /// Removes `key` only if the entry currently stored is still expired.
    /// Another writer may have replaced it between our read and write lock.
    fn evict_if_expired(&self, key: &CacheKey) {
        let mut map = self.write();
        if map.get(key).is_some_and(|e| e.is_expired(Instant::now())) {
            map.remove(key);
            debug!(target: "cruiser::cache", cache_key = %key, layer = "memory", "Evicted expired entry");
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Option<Arc<CachedResponse>> {
        {
            let map = self.read();
            let entry = map.get(key)?;
            if !entry.is_expired(Instant::now()) {
                return Some(entry.response.clone());
            }
        }

        self.evict_if_expired(key);
        None
    }

    async fn set(&self, key: CacheKey, response: CachedResponse) {
        self.insert(key, MemoryEntry::new(response, None));
    }

    async fn set_with_expiry(&self, key: CacheKey, response: CachedResponse, ttl: Duration) {
        if ttl.is_zero() {
            self.write().remove(&key);
            return;
        }

        let expires_at = Instant::now().checked_add(ttl);
        self.insert(key, MemoryEntry::new(response, expires_at));
    }

    async fn clear(&self) {
        self.write().clear();
        debug!(target: "cruiser::cache", layer = "memory", "Cache cleared");
    }
}
