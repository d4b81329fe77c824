//! Periodic gauges for the connection pool and the entity cache.

use persistence::cache::MemoryCache;
use sqlx::SqlitePool;
use tracing::debug;

use super::scheduler::{Job, JobFrequency};

/// Records pool gauges every few seconds.
pub struct PoolMetricsJob {
    pool: SqlitePool,
}

impl PoolMetricsJob {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(10)
    }

    async fn execute(&self) -> Result<(), String> {
        persistence::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}

/// Drops expired cache entries so unread keys do not accumulate.
pub struct CachePurgeJob {
    cache: MemoryCache,
}

impl CachePurgeJob {
    pub fn new(cache: MemoryCache) -> Self {
        Self { cache }
    }
}

#[async_trait::async_trait]
impl Job for CachePurgeJob {
    fn name(&self) -> &'static str {
        "cache_purge"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), String> {
        let purged = self.cache.purge_expired();
        metrics::gauge!("cache_entries").set(self.cache.len() as f64);
        if purged > 0 {
            debug!(purged, "Purged expired cache entries");
        }
        Ok(())
    }
}
