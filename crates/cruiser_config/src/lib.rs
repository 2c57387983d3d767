mod cache;
mod cruiser;
mod error;
mod proxy;
pub mod validation;

pub use cache::{CacheConfig, CacheKind};
pub use cruiser::{CruiserConfig, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use error::ConfigError;
pub use proxy::ProxyConfig;
pub use validation::{ConfigReport, Issue, Severity};
