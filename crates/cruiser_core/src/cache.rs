use std::sync::Arc;

use cruiser_cache::{Cache, CacheError, DiskCache, MemoryCache};
use cruiser_config::{CacheConfig, CacheKind};
use tracing::info;

/// Builds the backend selected by `cache.type`.
///
/// The disk backend creates its directory here, so an unusable
/// `cache.dir` fails before anything is served or cleared.
pub fn build_cache(cfg: &CacheConfig) -> Result<Arc<dyn Cache>, CacheError> {
    match cfg.kind() {
        CacheKind::Memory => {
            info!(target: "cruiser::cache", cache_type = %cfg.kind(), "Using in-memory cache");
            Ok(Arc::new(MemoryCache::new()))
        }
        CacheKind::Disk => {
            let cache = DiskCache::new(cfg.dir())?;
            info!(
                target: "cruiser::cache",
                cache_type = %cfg.kind(),
                dir = %cache.base_dir().display(),
                "Using disk cache"
            );
            Ok(Arc::new(cache))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::build_cache;
    use cruiser_cache::{CacheError, CacheKey, CachedResponse};
    use cruiser_config::{CacheConfig, CacheKind};
    use http::{HeaderMap, StatusCode};

    #[tokio::test]
    async fn memory_backend_by_default() {
        let cache = build_cache(&CacheConfig::default()).expect("memory cache");
        let key = CacheKey::new("GET", "/a");
        cache
            .set(key.clone(), CachedResponse::new(StatusCode::OK, HeaderMap::new(), "a"))
            .await;
        assert!(cache.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn disk_backend_creates_its_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = CacheConfig {
            kind: CacheKind::Disk,
            dir: dir.path().join("nested").join("cache"),
            ttl_secs: None,
        };

        let cache = build_cache(&cfg).expect("disk cache");
        assert!(cfg.dir.is_dir());

        let key = CacheKey::new("GET", "/a");
        cache
            .set(key.clone(), CachedResponse::new(StatusCode::OK, HeaderMap::new(), "a"))
            .await;
        assert_eq!(std::fs::read_dir(&cfg.dir).expect("read_dir").count(), 1);
    }

    #[test]
    fn disk_backend_fails_on_unusable_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("file");
        std::fs::write(&file, b"x").expect("write");
        let cfg = CacheConfig {
            kind: CacheKind::Disk,
            dir: file.join("cache"),
            ttl_secs: None,
        };

        let err = build_cache(&cfg).err().expect("must fail");
        assert!(matches!(err, CacheError::CreateDir { .. }));
    }
}
