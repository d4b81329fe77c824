//! Pluggable cache for repository reads.
//!
//! Values are stored as serialized strings. Keys follow
//! `{EntityType}:{Operation}:{Params}:IncludeInactive:{bool}` so every entry
//! of an entity type can be dropped with the `{EntityType}:*` pattern.

mod memory;
mod pattern;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use memory::{MemoryCache, NoCache};
pub use pattern::WildcardPattern;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid cache pattern: {0}")]
    InvalidPattern(String),

    #[error("Cache backend error: {0}")]
    Backend(String),
}

/// Cache backend used by repositories.
///
/// Implementations must be safe to share across tasks. A `set` with `ttl`
/// of `None` keeps the entry until it is removed.
#[async_trait::async_trait]
pub trait CacheStrategy: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError>;

    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Remove every key matching `pattern` (see [`WildcardPattern`]).
    /// Returns how many entries were removed.
    async fn remove_by_pattern(&self, pattern: &str) -> Result<usize, CacheError>;
}

/// Read and deserialize a cached value.
pub async fn get_json<T: DeserializeOwned>(
    cache: &dyn CacheStrategy,
    key: &str,
) -> Result<Option<T>, CacheError> {
    match cache.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize and store a value.
pub async fn set_json<T: Serialize + ?Sized>(
    cache: &dyn CacheStrategy,
    key: &str,
    value: &T,
    ttl: Option<Duration>,
) -> Result<(), CacheError> {
    let raw = serde_json::to_string(value)?;
    cache.set(key, raw, ttl).await
}

/// Cache key for a repository read.
pub fn cache_key(entity_type: &str, operation: &str, params: &str, include_inactive: bool) -> String {
    format!(
        "{}:{}:{}:IncludeInactive:{}",
        entity_type, operation, params, include_inactive
    )
}

/// Pattern matching every key of an entity type.
pub fn entity_pattern(entity_type: &str) -> String {
    format!("{}:*", entity_type)
}
