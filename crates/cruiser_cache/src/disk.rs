//! Persistent cache backend: one JSON file per key under a base directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::{Cache, CacheError, CacheKey, CachedResponse};

const ENTRY_EXTENSION: &str = "json";

/// Cache entries stored as files named after the key digest.
///
/// A single `RwLock` covers the whole directory: reads share it, writes,
/// expiry deletions and `clear` hold it exclusively.
#[derive(Debug)]
pub struct DiskCache {
    base_dir: PathBuf,
    lock: RwLock<()>,
}

/// On-disk layout of one entry.
#[derive(Debug, Serialize, Deserialize)]
struct DiskRecord {
    key: String,
    response: StoredResponse,
    /// Unix time in milliseconds, `None` for entries that never expire.
    #[serde(default)]
    expiry: Option<u64>,
}

/// Header values and body are kept as raw bytes, hex encoded in the JSON.
#[derive(Debug, Serialize, Deserialize)]
struct StoredResponse {
    status_code: u16,
    headers: Vec<StoredHeader>,
    #[serde(with = "hex")]
    body: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredHeader {
    name: String,
    #[serde(with = "hex")]
    value: Vec<u8>,
}

impl DiskRecord {
    fn is_expired(&self, now_ms: u64) -> bool {
        self.expiry.is_some_and(|deadline| now_ms >= deadline)
    }
}

impl From<&CachedResponse> for StoredResponse {
    fn from(resp: &CachedResponse) -> Self {
        let headers = resp
            .headers
            .iter()
            .map(|(name, value)| StoredHeader {
                name: name.as_str().to_string(),
                value: value.as_bytes().to_vec(),
            })
            .collect();

        Self {
            status_code: resp.status.as_u16(),
            headers,
            body: resp.body.to_vec(),
        }
    }
}

impl TryFrom<StoredResponse> for CachedResponse {
    type Error = http::Error;

    fn try_from(stored: StoredResponse) -> Result<Self, Self::Error> {
        let status = StatusCode::from_u16(stored.status_code)?;

        let mut headers = HeaderMap::with_capacity(stored.headers.len());
        for header in stored.headers {
            let name = HeaderName::from_bytes(header.name.as_bytes())?;
            let value = HeaderValue::from_bytes(&header.value)?;
            headers.append(name, value);
        }

        Ok(CachedResponse::new(status, headers, stored.body))
    }
}

impl DiskCache {
    /// Opens (creating if needed) a cache rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir).map_err(|source| CacheError::CreateDir {
            path: base_dir.clone(),
            source,
        })?;

        debug!(target: "cruiser::cache", dir = %base_dir.display(), layer = "disk", "Disk cache ready");

        Ok(Self {
            base_dir,
            lock: RwLock::new(()),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.base_dir
            .join(format!("{}.{ENTRY_EXTENSION}", key.digest()))
    }

    async fn write_record(&self, key: &CacheKey, record: &DiskRecord) -> Result<(), CacheError> {
        let data = serde_json::to_vec(record)?;
        let path = self.entry_path(key);

        let _guard = self.lock.write().await;
        fs::write(&path, data).await?;
        Ok(())
    }

    async fn remove_entry(&self, key: &CacheKey) {
        let path = self.entry_path(key);
        let _guard = self.lock.write().await;
        remove_file_if_exists(&path).await;
    }

    /// Deletes the entry file unless a writer replaced it with a live record
    /// since it was read.
    async fn evict_if_expired(&self, key: &CacheKey) {
        let path = self.entry_path(key);
        let _guard = self.lock.write().await;

        if let Ok(record) = read_record(&path).await
            && !record.is_expired(unix_millis(SystemTime::now()))
        {
            return;
        }

        remove_file_if_exists(&path).await;
        debug!(target: "cruiser::cache", cache_key = %key, layer = "disk", "Evicted expired entry");
    }
}

#[async_trait]
impl Cache for DiskCache {
    async fn get(&self, key: &CacheKey) -> Option<Arc<CachedResponse>> {
        let path = self.entry_path(key);

        let record = {
            let _guard = self.lock.read().await;
            match read_record(&path).await {
                Ok(record) => record,
                Err(e) => {
                    trace!(target: "cruiser::cache", cache_key = %key, layer = "disk", error = %e, "Cache read miss");
                    return None;
                }
            }
        };

        if record.key != key.as_str() {
            warn!(
                target: "cruiser::cache",
                cache_key = %key,
                stored_key = %record.key,
                layer = "disk",
                "Entry file belongs to another key; treating as miss"
            );
            return None;
        }

        if record.is_expired(unix_millis(SystemTime::now())) {
            self.evict_if_expired(key).await;
            return None;
        }

        match CachedResponse::try_from(record.response) {
            Ok(resp) => Some(Arc::new(resp)),
            Err(e) => {
                warn!(target: "cruiser::cache", cache_key = %key, layer = "disk", error = %e, "Corrupt cache entry");
                None
            }
        }
    }

    async fn set(&self, key: CacheKey, response: CachedResponse) {
        let record = DiskRecord {
            key: key.as_str().to_string(),
            response: StoredResponse::from(&response),
            expiry: None,
        };

        if let Err(e) = self.write_record(&key, &record).await {
            warn!(target: "cruiser::cache", cache_key = %key, layer = "disk", error = %e, "Failed to write cache entry");
        }
    }

    async fn set_with_expiry(&self, key: CacheKey, response: CachedResponse, ttl: Duration) {
        if ttl.is_zero() {
            self.remove_entry(&key).await;
            return;
        }

        let expiry = SystemTime::now().checked_add(ttl).map(unix_millis);
        let record = DiskRecord {
            key: key.as_str().to_string(),
            response: StoredResponse::from(&response),
            expiry,
        };

        if let Err(e) = self.write_record(&key, &record).await {
            warn!(target: "cruiser::cache", cache_key = %key, layer = "disk", error = %e, "Failed to write cache entry");
        }
    }

    async fn clear(&self) {
        let _guard = self.lock.write().await;

        if let Err(e) = fs::remove_dir_all(&self.base_dir).await
            && e.kind() != ErrorKind::NotFound
        {
            warn!(
                target: "cruiser::cache",
                dir = %self.base_dir.display(),
                error = %e,
                "Failed to remove cache directory"
            );
        }

        if let Err(e) = fs::create_dir_all(&self.base_dir).await {
            warn!(
                target: "cruiser::cache",
                dir = %self.base_dir.display(),
                error = %e,
                "Failed to recreate cache directory"
            );
            return;
        }

        debug!(target: "cruiser::cache", dir = %self.base_dir.display(), layer = "disk", "Cache cleared");
    }
}

async fn read_record(path: &Path) -> Result<DiskRecord, CacheError> {
    let data = fs::read(path).await?;
    Ok(serde_json::from_slice(&data)?)
}

async fn remove_file_if_exists(path: &Path) {
    if let Err(e) = fs::remove_file(path).await
        && e.kind() != ErrorKind::NotFound
    {
        warn!(target: "cruiser::cache", path = %path.display(), error = %e, "Failed to remove cache entry");
    }
}

fn unix_millis(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
