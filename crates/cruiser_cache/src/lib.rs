//! Response cache for the cruiser proxy.
//!
//! [`Cache`] is the contract the proxy depends on; [`MemoryCache`] and
//! [`DiskCache`] are the two interchangeable backends.

mod disk;
mod entry;
mod error;
mod key;
mod memory;
mod store;

pub use disk::DiskCache;
pub use entry::CachedResponse;
pub use error::CacheError;
pub use key::CacheKey;
pub use memory::MemoryCache;
pub use store::Cache;
