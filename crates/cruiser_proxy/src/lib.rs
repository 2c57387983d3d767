mod error;
mod proxy;

pub use error::ProxyError;
pub use proxy::{CACHE_STATUS_HEADER, CacheStatus, Origin, ProxyServer};
