//! Redis keyspace hit/miss metrics.

use std::time::Duration;

use redis::{Client, InfoDict};

use crate::error::{PersistenceError, Result};
use property_domain::CacheMetrics;

/// Reads `keyspace_hits` / `keyspace_misses` from `INFO stats`.
///
/// Opens a fresh connection per read so a dead server never poisons a
/// long-lived handle; every failure is folded into the returned snapshot.
#[derive(Debug, Clone)]
pub struct CacheMetricsReader {
    url: String,
    timeout: Duration,
}

impl CacheMetricsReader {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    /// Current hit/miss counters and the derived hit ratio.
    ///
    /// Never fails: on error the snapshot is zero-filled and `error` is set.
    pub async fn get_cache_metrics(&self) -> CacheMetrics {
        match self.read_counters().await {
            Ok((hits, misses)) => {
                let metrics = CacheMetrics::from_counters(hits, misses);
                tracing::debug!(
                    hits,
                    misses,
                    hit_ratio = metrics.hit_ratio,
                    "Cache metrics read"
                );
                metrics
            }
            Err(e) => {
                tracing::error!(error = %e, "Error getting cache metrics");
                CacheMetrics::unavailable(e.to_string())
            }
        }
    }

    async fn read_counters(&self) -> Result<(u64, u64)> {
        let client = Client::open(self.url.as_str())?;

        let query = async {
            let mut conn = client.get_multiplexed_async_connection().await?;
            let info: InfoDict = redis::cmd("INFO").arg("stats").query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(info)
        };

        let info = tokio::time::timeout(self.timeout, query)
            .await
            .map_err(|_| PersistenceError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            })??;

        Ok(counters_from_info(&info))
    }
}

/// Extract (hits, misses) from an `INFO` reply; absent or malformed counters read as zero.
#[must_use]
pub fn counters_from_info(info: &InfoDict) -> (u64, u64) {
    (
        info.get("keyspace_hits").unwrap_or(0),
        info.get("keyspace_misses").unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_from_info() {
        let info = InfoDict::new(
            "# Stats\r\ntotal_connections_received:4\r\nkeyspace_hits:80\r\nkeyspace_misses:20\r\n",
        );
        assert_eq!(counters_from_info(&info), (80, 20));

        let metrics = CacheMetrics::from_counters(80, 20);
        assert!((metrics.hit_ratio - 0.8).abs() < f64::EPSILON);
        assert!((metrics.hit_ratio_percent - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_counters_default_to_zero() {
        let info = InfoDict::new("# Stats\r\nkeyspace_hits:5\r\n");
        assert_eq!(counters_from_info(&info), (5, 0));

        let info = InfoDict::new("# Stats\r\nkeyspace_hits:lots\r\n");
        assert_eq!(counters_from_info(&info), (0, 0));
    }

    #[tokio::test]
    async fn test_connection_failure_yields_error_snapshot() {
        // Port 1 is reserved and never has a Redis server behind it.
        let reader = CacheMetricsReader::new("redis://127.0.0.1:1/", Duration::from_secs(2));
        let metrics = reader.get_cache_metrics().await;

        assert_eq!(metrics.keyspace_hits, 0);
        assert_eq!(metrics.keyspace_misses, 0);
        assert_eq!(metrics.total_requests, 0);
        assert!(metrics.hit_ratio.abs() < f64::EPSILON);
        assert!(metrics.error.is_some());
    }

    #[tokio::test]
    async fn test_invalid_url_yields_error_snapshot() {
        let reader = CacheMetricsReader::new("not a redis url", CacheMetricsReader::DEFAULT_TIMEOUT);
        let metrics = reader.get_cache_metrics().await;

        assert!(!metrics.is_available());
        assert_eq!(metrics.total_requests, 0);
    }
}
