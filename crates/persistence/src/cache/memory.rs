//! In-process cache backends.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use super::{CacheError, CacheStrategy, WildcardPattern};

#[derive(Debug, Clone)]
struct CacheSlot {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheSlot {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Concurrent in-memory cache with per-entry expiry.
///
/// Clones share the same storage. Expired entries are dropped lazily on read
/// and by [`MemoryCache::purge_expired`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, CacheSlot>>,
    default_ttl: Option<Duration>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// TTL applied when `set` is called without one.
    pub fn with_default_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            default_ttl: Some(ttl),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, slot| !slot.is_expired(now));
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait::async_trait]
impl CacheStrategy for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        self.entries.remove_if(key, |_, slot| slot.is_expired(now));
        Ok(self.entries.get(key).map(|slot| slot.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError> {
        let expires_at = ttl.or(self.default_ttl).map(|ttl| Instant::now() + ttl);
        self.entries
            .insert(key.to_string(), CacheSlot { value, expires_at });
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn remove_by_pattern(&self, pattern: &str) -> Result<usize, CacheError> {
        let pattern = WildcardPattern::new(pattern)?;
        let mut removed = 0;
        self.entries.retain(|key, _| {
            if pattern.matches(key) {
                removed += 1;
                false
            } else {
                true
            }
        });
        debug!(pattern = pattern.as_str(), removed, "Cache entries removed");
        Ok(removed)
    }
}

/// Backend that stores nothing. Every read is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

#[async_trait::async_trait]
impl CacheStrategy for NoCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Option<Duration>) -> Result<(), CacheError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn remove_by_pattern(&self, pattern: &str) -> Result<usize, CacheError> {
        WildcardPattern::new(pattern)?;
        Ok(0)
    }
}
