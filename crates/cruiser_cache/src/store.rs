use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{CacheKey, CachedResponse};

/// Storage contract shared by every backend.
///
/// None of the operations fail from the caller's point of view: a backend
/// that cannot read reports a miss, and a backend that cannot write logs and
/// drops the value. Expired entries are only discovered (and removed) by
/// `get`.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the live entry for `key`, evicting it first if it has expired.
    async fn get(&self, key: &CacheKey) -> Option<Arc<CachedResponse>>;

    /// Stores `response` with no expiry, replacing any previous entry.
    async fn set(&self, key: CacheKey, response: CachedResponse);

    /// Stores `response` until `now + ttl`, replacing any previous entry.
    ///
    /// A zero `ttl` stores nothing and removes whatever was cached under
    /// `key`, so a following `get` is a miss on every backend.
    async fn set_with_expiry(&self, key: CacheKey, response: CachedResponse, ttl: Duration);

    /// Drops every entry.
    async fn clear(&self);
}
