use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// A fully buffered origin response, replayed verbatim on a hit.
///
/// Once handed to a backend the value is never mutated again; the memory
/// backend shares it behind an `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CachedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }
}

/// Memory backend slot: the shared response plus an optional deadline.
#[derive(Clone, Debug)]
pub(crate) struct MemoryEntry {
    pub(crate) response: Arc<CachedResponse>,
    pub(crate) expires_at: Option<Instant>,
}

impl MemoryEntry {
    pub(crate) fn new(response: CachedResponse, expires_at: Option<Instant>) -> Self {
        Self {
            response: Arc::new(response),
            expires_at,
        }
    }

    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::{CachedResponse, MemoryEntry};
    use http::{HeaderMap, StatusCode};
    use std::time::{Duration, Instant};

    fn response() -> CachedResponse {
        CachedResponse::new(StatusCode::OK, HeaderMap::new(), "hello")
    }

    #[test]
    fn entry_without_deadline_never_expires() {
        let entry = MemoryEntry::new(response(), None);
        assert!(!entry.is_expired(Instant::now() + Duration::from_secs(86_400)));
    }

    #[test]
    fn entry_expires_at_its_deadline() {
        let now = Instant::now();
        let entry = MemoryEntry::new(response(), Some(now + Duration::from_secs(5)));
        assert!(!entry.is_expired(now));
        assert!(entry.is_expired(now + Duration::from_secs(5)));
    }
}
