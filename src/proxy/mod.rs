//! Reverse-proxy mode.
//!
//! When enabled, every request is forwarded to a pool of upstream backends
//! instead of being resolved against a resource tree.

pub mod backend;
pub mod upstream;

pub use backend::{Backend, BackendPool, BackendState};
pub use upstream::ProxyHandler;
