//! Cache layer for redirect lookups and click counting.
//!
//! Provides a [`ClickCache`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`MemoryCache`] - In-process cache for single-node deployments and tests

mod memory_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, ClickCache, clicks_key, url_key};

#[cfg(test)]
pub use service::MockClickCache;
