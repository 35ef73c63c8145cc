//! # API Configuration
//!
//! Environment-based configuration for the property listings API service.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use property_persistence::ReadStrategy;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub server_addr: SocketAddr,

    /// ScyllaDB configuration
    pub scylla: ScyllaConfig,

    /// Redis configuration
    pub redis: RedisConfig,

    /// Cache lifetimes and read behavior
    pub cache: CachePolicy,

    /// Logging level
    pub log_level: String,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,
}

/// ScyllaDB connection configuration
#[derive(Debug, Clone)]
pub struct ScyllaConfig {
    pub hosts: Vec<String>,
    pub keyspace: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Create the `properties` table on startup when missing
    pub ensure_schema: bool,
}

/// Redis connection configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub key_prefix: String,
    pub key_version: u32,
    /// Upper bound for a single metrics read
    pub metrics_timeout: Duration,
}

/// Cache behavior for the property endpoints
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// Lifetime of the cached property snapshot
    pub properties_ttl: Duration,
    /// Lifetime of cached HTTP responses
    pub page_ttl: Duration,
    pub read_strategy: ReadStrategy,
    /// Serialize concurrent misses within this process
    pub coalesce_misses: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            properties_ttl: Duration::from_secs(3600),
            page_ttl: Duration::from_secs(15 * 60),
            read_strategy: ReadStrategy::CacheAside,
            coalesce_misses: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error naming the first variable that fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns an error naming the first variable that fails to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = CachePolicy::default();

        Ok(Self {
            server_addr: parse_or(&lookup, "SERVER_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?,

            scylla: ScyllaConfig {
                hosts: list_or(&lookup, "SCYLLA_HOSTS", "127.0.0.1:9042"),
                keyspace: lookup("SCYLLA_KEYSPACE")
                    .unwrap_or_else(|| "property_listings".to_string()),
                username: lookup("SCYLLA_USERNAME"),
                password: lookup("SCYLLA_PASSWORD"),
                ensure_schema: bool_or(&lookup, "SCYLLA_ENSURE_SCHEMA", false)?,
            },

            redis: RedisConfig {
                url: lookup("REDIS_URL")
                    .unwrap_or_else(|| "redis://127.0.0.1:6379".to_string()),
                key_prefix: lookup("CACHE_KEY_PREFIX").unwrap_or_default(),
                key_version: parse_or(&lookup, "CACHE_VERSION", 1)?,
                metrics_timeout: Duration::from_millis(parse_or(
                    &lookup,
                    "METRICS_TIMEOUT_MS",
                    2000,
                )?),
            },

            cache: CachePolicy {
                properties_ttl: ttl_or(&lookup, "PROPERTIES_CACHE_TTL_SECS", defaults.properties_ttl)?,
                page_ttl: ttl_or(&lookup, "PAGE_CACHE_TTL_SECS", defaults.page_ttl)?,
                read_strategy: parse_or(&lookup, "CACHE_READ_STRATEGY", defaults.read_strategy)?,
                coalesce_misses: bool_or(&lookup, "CACHE_COALESCE_MISSES", defaults.coalesce_misses)?,
            },

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            cors_origins: list_or(&lookup, "CORS_ORIGINS", "*"),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => {
            let parsed = value.trim().parse();
            parsed.map_err(|_| ConfigError::Invalid { key, value })
        }
        None => Ok(default),
    }
}

/// Whole seconds; zero is rejected since an entry must outlive its own write.
fn ttl_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_or(lookup, key, default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: "0".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn bool_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(key) {
        Some(value) => {
            let normalized = value.trim().to_ascii_lowercase();
            match normalized.as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(ConfigError::Invalid { key, value }),
            }
        }
        None => Ok(default),
    }
}

fn list_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Vec<String> {
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
