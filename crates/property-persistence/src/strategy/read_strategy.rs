//! Read strategy implementations using enum dispatch.

use std::fmt::Debug;
use std::future::Future;
use std::str::FromStr;

use crate::error::Result;

/// Read strategy enum - determines cache/db access pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadStrategy {
    /// Check cache, fall back to DB on miss and populate the cache.
    /// Cache errors fail the read.
    #[default]
    CacheAside,
    /// Like `CacheAside`, but cache errors are logged and treated as a miss
    CacheAsideTolerant,
    /// Only read from database, skip cache
    DbOnly,
}

/// Where a read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSource {
    Cache,
    /// Loaded from the database; `cached` is set when the cache was populated.
    Database { cached: bool },
}

impl ReadStrategy {
    /// Execute a read operation according to the strategy.
    ///
    /// - `cache_fn`: Async function to read from cache
    /// - `db_fn`: Async function to read from database
    /// - `populate_fn`: Async function to store the DB result in cache
    pub async fn read<T, CacheFut, DbFut, PopulateFut>(
        &self,
        cache_fn: impl FnOnce() -> CacheFut,
        db_fn: impl FnOnce() -> DbFut,
        populate_fn: impl FnOnce(T) -> PopulateFut,
    ) -> Result<(T, ReadSource)>
    where
        T: Clone + Debug,
        CacheFut: Future<Output = Result<Option<T>>>,
        DbFut: Future<Output = Result<T>>,
        PopulateFut: Future<Output = Result<()>>,
    {
        match self {
            Self::CacheAside => {
                if let Some(value) = cache_fn().await? {
                    return Ok((value, ReadSource::Cache));
                }

                let value = db_fn().await?;
                populate_fn(value.clone()).await?;
                Ok((value, ReadSource::Database { cached: true }))
            }

            Self::CacheAsideTolerant => {
                match cache_fn().await {
                    Ok(Some(value)) => return Ok((value, ReadSource::Cache)),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "Cache error, falling back to DB");
                    }
                }

                let value = db_fn().await?;
                let cached = match populate_fn(value.clone()).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to populate cache");
                        false
                    }
                };
                Ok((value, ReadSource::Database { cached }))
            }

            Self::DbOnly => Ok((db_fn().await?, ReadSource::Database { cached: false })),
        }
    }

    #[must_use]
    pub const fn uses_cache(&self) -> bool {
        !matches!(self, Self::DbOnly)
    }
}

impl FromStr for ReadStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cache_aside" => Ok(Self::CacheAside),
            "cache_aside_tolerant" => Ok(Self::CacheAsideTolerant),
            "db_only" => Ok(Self::DbOnly),
            other => Err(format!("unknown read strategy '{other}'")),
        }
    }
}
