//! Cache-aside decorator over a [`PropertyRepository`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::traits::PropertyRepository;
use crate::cache::{CacheBackendExt, SharedCache};
use crate::error::Result;
use crate::strategy::{ReadSource, ReadStrategy};
use property_domain::Property;

/// Cache key holding the full property snapshot.
pub const ALL_PROPERTIES_KEY: &str = "all_properties";

/// Default lifetime of the cached snapshot.
pub const DEFAULT_PROPERTIES_TTL: Duration = Duration::from_secs(3600);

/// Serves the full property list from cache, loading and caching it on a miss.
///
/// The snapshot lives under a single key and is only ever replaced whole; it
/// is never invalidated on data changes and simply expires after the TTL.
pub struct CachedPropertyRepository {
    inner: Arc<dyn PropertyRepository>,
    cache: SharedCache,
    key: String,
    ttl: Duration,
    read_strategy: ReadStrategy,
    fill_lock: Option<Mutex<()>>,
}

impl CachedPropertyRepository {
    /// Create a cached repository with the default key, TTL and strategy.
    pub fn new(inner: Arc<dyn PropertyRepository>, cache: SharedCache) -> Self {
        Self {
            inner,
            cache,
            key: ALL_PROPERTIES_KEY.to_string(),
            ttl: DEFAULT_PROPERTIES_TTL,
            read_strategy: ReadStrategy::default(),
            fill_lock: None,
        }
    }

    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub const fn with_read_strategy(mut self, strategy: ReadStrategy) -> Self {
        self.read_strategy = strategy;
        self
    }

    /// Serialize check-and-populate within this process so concurrent misses
    /// trigger a single backing-store load.
    #[must_use]
    pub fn with_miss_coalescing(mut self, enabled: bool) -> Self {
        self.fill_lock = enabled.then(|| Mutex::new(()));
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Set read strategy.
    pub fn set_read_strategy(&mut self, strategy: ReadStrategy) {
        self.read_strategy = strategy;
    }

    /// Load the property list and report whether it came from the cache.
    ///
    /// # Errors
    ///
    /// Backing-store errors always propagate. Cache errors propagate under
    /// [`ReadStrategy::CacheAside`] and are absorbed under
    /// [`ReadStrategy::CacheAsideTolerant`].
    pub async fn fetch_all_with_source(&self) -> Result<(Vec<Property>, ReadSource)> {
        let _guard = match &self.fill_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let cache = &self.cache;
        let key = self.key.as_str();
        let ttl = self.ttl;

        let (properties, source) = self
            .read_strategy
            .read(
                || cache.get_json::<Vec<Property>>(key),
                || self.inner.fetch_all(),
                move |properties: Vec<Property>| async move {
                    cache.set_json(key, &properties, ttl).await
                },
            )
            .await?;

        match source {
            ReadSource::Cache => {
                tracing::info!(key, count = properties.len(), "Properties fetched from cache");
            }
            ReadSource::Database { cached: true } => {
                tracing::info!(
                    key,
                    count = properties.len(),
                    ttl_secs = ttl.as_secs(),
                    "Properties fetched from database and cached"
                );
            }
            ReadSource::Database { cached: false } => {
                tracing::info!(count = properties.len(), "Properties fetched from database");
            }
        }

        Ok((properties, source))
    }
}

#[async_trait]
impl PropertyRepository for CachedPropertyRepository {
    async fn fetch_all(&self) -> Result<Vec<Property>> {
        self.fetch_all_with_source().await.map(|(properties, _)| properties)
    }
}
