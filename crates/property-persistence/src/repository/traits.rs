//! # Repository Traits
//!
//! Abstract repository interfaces for domain entities.
//! Implementations can be swapped for different backends (ScyllaDB, in-memory,
//! cached decorator).

use async_trait::async_trait;

use crate::error::Result;
use property_domain::Property;

/// Read-only access to property listings
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Load every property, unfiltered and unpaginated
    async fn fetch_all(&self) -> Result<Vec<Property>>;
}
