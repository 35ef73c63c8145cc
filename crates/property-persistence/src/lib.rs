//! # Property Persistence Library
//!
//! Persistence layer for the property listings service.
//!
//! ## Architecture
//!
//! This crate implements the Repository pattern with a pluggable read
//! strategy for cache/database access:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Application Layer                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              PropertyRepository (trait)                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                CachedPropertyRepository                      │
//! │         (cache-aside under `all_properties`, 1h TTL)         │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │     Redis Cache         │   │        ScyllaDB              │
//! │ (snapshot, page cache)  │   │   (Source of Truth)          │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - `scylla`: Enable ScyllaDB backend (default)
//! - `redis`: Enable Redis cache layer and metrics reader (default)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use property_persistence::{
//!     CacheClient, CacheConfig, CachedPropertyRepository, ScyllaClient,
//!     ScyllaConfig, ScyllaPropertyRepository,
//! };
//!
//! let scylla = Arc::new(ScyllaClient::new(ScyllaConfig::default()).await?);
//! let cache = Arc::new(CacheClient::new(CacheConfig::default()).await?);
//!
//! let properties = CachedPropertyRepository::new(
//!     Arc::new(ScyllaPropertyRepository::new(scylla)),
//!     cache,
//! );
//!
//! let all = properties.fetch_all().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod error;
pub mod repository;
pub mod strategy;

// Re-export commonly used types
pub use cache::{CacheBackend, CacheBackendExt, MemoryCache, SharedCache};
#[cfg(feature = "redis")]
pub use cache::{CacheClient, CacheConfig, CacheMetricsReader};
pub use error::{PersistenceError, Result};
pub use repository::{
    CachedPropertyRepository, InMemoryPropertyRepository, PropertyRepository, ALL_PROPERTIES_KEY,
};
#[cfg(feature = "scylla")]
pub use repository::{ScyllaClient, ScyllaConfig, ScyllaPropertyRepository};
pub use strategy::{ReadSource, ReadStrategy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
