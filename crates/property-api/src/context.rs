//! # API Context
//!
//! Application state and dependency injection for HTTP handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::CachePolicy;
use property_persistence::{
    CacheMetricsReader, CachedPropertyRepository, PropertyRepository, SharedCache,
};

/// Application context shared across all handlers
#[derive(Clone)]
pub struct ApiContext {
    /// Property listings served through the cache-aside snapshot
    pub properties: Arc<CachedPropertyRepository>,

    /// Cache backend, also used for whole-page caching
    pub cache: SharedCache,

    /// Redis keyspace metrics
    pub metrics: CacheMetricsReader,

    /// Lifetime of cached HTTP responses
    pub page_ttl: Duration,
}

impl ApiContext {
    /// Create a new API context, wrapping `repository` in the cache-aside layer
    pub fn new(
        repository: Arc<dyn PropertyRepository>,
        cache: SharedCache,
        metrics: CacheMetricsReader,
        policy: &CachePolicy,
    ) -> Self {
        let properties = CachedPropertyRepository::new(repository, cache.clone())
            .with_ttl(policy.properties_ttl)
            .with_read_strategy(policy.read_strategy)
            .with_miss_coalescing(policy.coalesce_misses);

        Self {
            properties: Arc::new(properties),
            cache,
            metrics,
            page_ttl: policy.page_ttl,
        }
    }
}

/// Builder for ApiContext
pub struct ApiContextBuilder {
    repository: Option<Arc<dyn PropertyRepository>>,
    cache: Option<SharedCache>,
    metrics: Option<CacheMetricsReader>,
    policy: CachePolicy,
}

impl ApiContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            repository: None,
            cache: None,
            metrics: None,
            policy: CachePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_repository(mut self, repository: Arc<dyn PropertyRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: SharedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: CacheMetricsReader) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// # Errors
    ///
    /// Returns an error naming the first missing dependency.
    pub fn build(self) -> Result<ApiContext, &'static str> {
        let repository = self.repository.ok_or("property repository required")?;
        let cache = self.cache.ok_or("cache backend required")?;
        let metrics = self.metrics.ok_or("cache metrics reader required")?;
        Ok(ApiContext::new(repository, cache, metrics, &self.policy))
    }
}

impl Default for ApiContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use property_persistence::{InMemoryPropertyRepository, MemoryCache, ReadStrategy};

    #[test]
    fn test_builder_requires_dependencies() {
        let err = ApiContextBuilder::new().build().err();
        assert_eq!(err, Some("property repository required"));

        let err = ApiContextBuilder::new()
            .with_repository(Arc::new(InMemoryPropertyRepository::default()))
            .build()
            .err();
        assert_eq!(err, Some("cache backend required"));
    }

    #[test]
    fn test_builder_applies_policy() {
        let policy = CachePolicy {
            properties_ttl: Duration::from_secs(42),
            page_ttl: Duration::from_secs(7),
            read_strategy: ReadStrategy::CacheAsideTolerant,
            coalesce_misses: true,
        };

        let ctx = ApiContextBuilder::default()
            .with_repository(Arc::new(InMemoryPropertyRepository::default()))
            .with_cache(Arc::new(MemoryCache::new()))
            .with_metrics(CacheMetricsReader::new(
                "redis://127.0.0.1:1/",
                Duration::from_millis(100),
            ))
            .with_policy(policy)
            .build()
            .unwrap();

        assert_eq!(ctx.properties.ttl(), Duration::from_secs(42));
        assert_eq!(ctx.properties.key(), "all_properties");
        assert_eq!(ctx.page_ttl, Duration::from_secs(7));
    }
}
