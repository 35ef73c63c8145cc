//! # Redis Cache Layer
//!
//! Redis client wrapper implementing [`CacheBackend`] for the listings cache.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use super::{make_key, CacheBackend};
use crate::error::Result;

/// Redis cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub url: String,
    /// Prepended to every key, see [`make_key`]
    pub key_prefix: String,
    /// Key version; bumping it orphans every existing entry
    pub version: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: String::new(),
            version: 1,
        }
    }
}

impl CacheConfig {
    /// Storage key for a logical cache key.
    #[must_use]
    pub fn make_key(&self, key: &str) -> String {
        make_key(&self.key_prefix, self.version, key)
    }
}

/// Redis cache client over a reconnecting multiplexed connection
#[derive(Clone)]
pub struct CacheClient {
    conn: ConnectionManager,
    config: CacheConfig,
}

impl CacheClient {
    /// Create a new cache client
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the first connection fails.
    pub async fn new(config: CacheConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn, config })
    }
}

#[async_trait]
impl CacheBackend for CacheClient {
    async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(self.config.make_key(key)).await?;
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let Some(seconds) = expire_seconds(ttl) else {
            tracing::debug!(key, "Zero TTL, skipping cache write");
            return Ok(());
        };

        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(self.config.make_key(key), value, seconds).await?;
        Ok(())
    }
}

/// `SET EX` seconds for `ttl`: `None` when zero, sub-second remainders round up.
fn expire_seconds(ttl: Duration) -> Option<u64> {
    if ttl.is_zero() {
        return None;
    }
    Some(ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ttl_is_never_written() {
        assert_eq!(expire_seconds(Duration::ZERO), None);
    }

    #[test]
    fn test_expire_seconds_rounds_up() {
        assert_eq!(expire_seconds(Duration::from_secs(900)), Some(900));
        assert_eq!(expire_seconds(Duration::from_millis(1)), Some(1));
        assert_eq!(expire_seconds(Duration::from_millis(1500)), Some(2));
    }

    #[test]
    fn test_config_key_layout() {
        let config = CacheConfig::default();
        assert_eq!(config.make_key("all_properties"), ":1:all_properties");

        let config = CacheConfig {
            key_prefix: "staging".to_string(),
            version: 2,
            ..CacheConfig::default()
        };
        assert_eq!(config.make_key("all_properties"), "staging:2:all_properties");
    }
}
