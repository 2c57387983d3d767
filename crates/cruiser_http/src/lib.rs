//! HTTP plumbing shared by the proxy and the server runtime.

pub mod body;
pub mod headers;
pub mod responses;

pub use body::{BoxError, ProxyBody};
