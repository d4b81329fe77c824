//! Database and cache metrics collection.
//!
//! Provides functions for recording persistence-related metrics.

use metrics::{counter, gauge, histogram};
use sqlx::SqlitePool;
use std::time::Instant;

/// Record database query duration.
///
/// Call this function after executing a query to record its duration.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Record database connection pool metrics.
///
/// Call this function periodically to track pool health.
pub fn record_pool_metrics(pool: &SqlitePool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Record a read served from the cache.
pub fn record_cache_hit(entity: &'static str) {
    counter!("repository_cache_hits_total", "entity" => entity).increment(1);
}

/// Record a read that fell through to the database.
pub fn record_cache_miss(entity: &'static str) {
    counter!("repository_cache_misses_total", "entity" => entity).increment(1);
}

/// Record entries dropped by write invalidation.
pub fn record_cache_invalidation(entity: &'static str, removed: usize) {
    counter!("repository_cache_invalidated_total", "entity" => entity).increment(removed as u64);
}

/// A helper to time database operations and record metrics.
///
/// Usage:
/// ```ignore
/// let timer = QueryTimer::new("campaigns_get_by_id");
/// let result = sqlx::query_as::<_, CampaignEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    /// Create a new timer for the given query name.
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(&self.query_name, duration);
    }
}
