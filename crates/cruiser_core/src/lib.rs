//! Server runtime: turns a validated configuration into a listening proxy.

mod cache;
pub mod master;
pub mod worker;

pub use cache::build_cache;
pub use master::{Master, serve};
