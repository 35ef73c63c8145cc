//! # Cache Module
//!
//! Cache backends for hot-path data access.
//!
//! - [`CacheClient`]: Redis, the production backend
//! - [`MemoryCache`]: in-process map with the same TTL semantics
//! - [`CacheMetricsReader`]: Redis keyspace hit/miss counters

pub mod memory;
#[cfg(feature = "redis")]
pub mod metrics;
#[cfg(feature = "redis")]
pub mod redis_client;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use metrics::CacheMetricsReader;
#[cfg(feature = "redis")]
pub use redis_client::{CacheClient, CacheConfig};

/// Key-value store with per-entry expiry.
///
/// Writes fully replace any previous value under the key.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get the raw value stored under `key`, `None` if absent or expired.
    async fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set_raw(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

/// Typed JSON helpers available on every [`CacheBackend`].
#[async_trait]
pub trait CacheBackendExt: CacheBackend {
    /// Get a JSON value from cache
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Set a JSON value in cache with TTL
    async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, json, ttl).await
    }
}

impl<C: CacheBackend + ?Sized> CacheBackendExt for C {}

/// Shared cache handle
pub type SharedCache = Arc<dyn CacheBackend>;

/// Build the storage key for `key` using the `prefix:version:key` layout.
#[must_use]
pub fn make_key(prefix: &str, version: u32, key: &str) -> String {
    format!("{prefix}:{version}:{key}")
}
