//! Generic repository over any [`Entity`].
//!
//! Reads consult the injected cache before the database; writes invalidate
//! every cached entry of the entity type. Deleted rows are never returned.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use domain::models::EntityStatus;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};
use validator::Validate;

use crate::cache::{self, cache_key, entity_pattern, CacheStrategy};
use crate::entities::Entity;
use crate::error::RepositoryResult;
use crate::metrics::{
    record_cache_hit, record_cache_invalidation, record_cache_miss, QueryTimer,
};
use crate::query::QueryDescriptor;

/// CRUD with soft delete, audit stamping and optional read caching.
pub struct Repository<E> {
    pool: SqlitePool,
    cache: Option<Arc<dyn CacheStrategy>>,
    cache_ttl: Option<Duration>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            cache: self.cache.clone(),
            cache_ttl: self.cache_ttl,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    /// Creates an uncached repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            cache: None,
            cache_ttl: None,
            _entity: PhantomData,
        }
    }

    /// Creates a repository whose reads go through `cache`.
    pub fn with_cache(
        pool: SqlitePool,
        cache: Arc<dyn CacheStrategy>,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            pool,
            cache: Some(cache),
            cache_ttl: ttl,
            _entity: PhantomData,
        }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    fn timer(op: &str) -> QueryTimer {
        QueryTimer::new(format!("{}_{}", E::TABLE, op))
    }

    fn status_clause(include_inactive: bool) -> &'static str {
        if include_inactive {
            "status <> 'deleted'"
        } else {
            "status = 'active'"
        }
    }

    fn select_sql(
        query: &QueryDescriptor,
        include_inactive: bool,
        limit: Option<i64>,
    ) -> RepositoryResult<String> {
        let conditions = query.where_sql::<E>()?;
        let mut sql = format!(
            "SELECT * FROM {} WHERE {}",
            E::TABLE,
            Self::status_clause(include_inactive)
        );
        if !conditions.is_empty() {
            sql.push_str(" AND ");
            sql.push_str(&conditions);
        }
        sql.push_str(" ORDER BY id");
        if limit.is_some() {
            sql.push_str(" LIMIT ?");
        }
        Ok(sql)
    }

    /// Serve `key` from the cache, or run `load` and cache its result.
    ///
    /// Cache failures are logged and treated as misses.
    pub(crate) async fn cached<T, F, Fut>(&self, key: String, load: F) -> RepositoryResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = RepositoryResult<T>>,
    {
        let Some(cache) = self.cache.as_deref() else {
            return load().await;
        };

        match cache::get_json::<T>(cache, &key).await {
            Ok(Some(value)) => {
                record_cache_hit(E::TYPE_NAME);
                return Ok(value);
            }
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "Cache read failed, loading from database"),
        }
        record_cache_miss(E::TYPE_NAME);

        let value = load().await?;
        if let Err(e) = cache::set_json(cache, &key, &value, self.cache_ttl).await {
            warn!(key = %key, error = %e, "Cache write failed");
        }
        Ok(value)
    }

    /// Drop every cached entry for this entity type.
    pub async fn invalidate_cache(&self) {
        let Some(cache) = self.cache.as_deref() else {
            return;
        };
        match cache.remove_by_pattern(&entity_pattern(E::TYPE_NAME)).await {
            Ok(removed) => {
                record_cache_invalidation(E::TYPE_NAME, removed);
                debug!(entity = E::TYPE_NAME, removed, "Cache invalidated");
            }
            Err(e) => warn!(entity = E::TYPE_NAME, error = %e, "Cache invalidation failed"),
        }
    }

    /// All visible rows, oldest first.
    pub async fn get_all(&self, include_inactive: bool) -> RepositoryResult<Vec<E>> {
        let key = cache_key(E::TYPE_NAME, "GetAll", "", include_inactive);
        let everything = QueryDescriptor::new();
        self.cached(key, || self.load(&everything, include_inactive, None))
            .await
    }

    /// Rows matching `query`.
    pub async fn find(
        &self,
        query: &QueryDescriptor,
        include_inactive: bool,
    ) -> RepositoryResult<Vec<E>> {
        // Validate before touching the cache so a bad query never hits it.
        query.where_sql::<E>()?;
        let key = cache_key(E::TYPE_NAME, "Find", &query.fingerprint(), include_inactive);
        self.cached(key, || self.load(query, include_inactive, None)).await
    }

    /// First row matching `query`.
    pub async fn find_one(
        &self,
        query: &QueryDescriptor,
        include_inactive: bool,
    ) -> RepositoryResult<Option<E>> {
        Ok(self.find(query, include_inactive).await?.into_iter().next())
    }

    /// Rows matching `query`, bypassing the cache. For time-dependent reads
    /// such as job batches.
    pub async fn find_uncached(
        &self,
        query: &QueryDescriptor,
        include_inactive: bool,
        limit: Option<i64>,
    ) -> RepositoryResult<Vec<E>> {
        self.load(query, include_inactive, limit).await
    }

    async fn load(
        &self,
        query: &QueryDescriptor,
        include_inactive: bool,
        limit: Option<i64>,
    ) -> RepositoryResult<Vec<E>> {
        let sql = Self::select_sql(query, include_inactive, limit)?;
        let timer = Self::timer("find");
        let mut q = query.bind_all(sqlx::query_as::<_, E>(&sql));
        if let Some(limit) = limit {
            q = q.bind(limit);
        }
        let result = q.fetch_all(&self.pool).await;
        timer.record();
        Ok(result?)
    }

    pub async fn get_by_id(&self, id: i64, include_inactive: bool) -> RepositoryResult<Option<E>> {
        let key = cache_key(E::TYPE_NAME, "GetById", &id.to_string(), include_inactive);
        self.cached(key, || async move {
            let sql = format!(
                "SELECT * FROM {} WHERE id = ? AND {}",
                E::TABLE,
                Self::status_clause(include_inactive)
            );
            let timer = Self::timer("get_by_id");
            let result = sqlx::query_as::<_, E>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
            timer.record();
            Ok(result?)
        })
        .await
    }

    pub async fn exists(&self, id: i64, include_inactive: bool) -> RepositoryResult<bool> {
        Ok(self.get_by_id(id, include_inactive).await?.is_some())
    }

    pub async fn count(&self, include_inactive: bool) -> RepositoryResult<i64> {
        let key = cache_key(E::TYPE_NAME, "Count", "", include_inactive);
        self.cached(key, || async move {
            let sql = format!(
                "SELECT COUNT(*) FROM {} WHERE {}",
                E::TABLE,
                Self::status_clause(include_inactive)
            );
            let timer = Self::timer("count");
            let result = sqlx::query_scalar::<_, i64>(&sql)
                .fetch_one(&self.pool)
                .await;
            timer.record();
            Ok(result?)
        })
        .await
    }

    /// Insert a new row.
    ///
    /// Validates first, then stamps `created_on`/`created_by`, sets the status
    /// to active and clears the modified fields. Returns the stored row with
    /// its generated id.
    pub async fn add(&self, mut entity: E, created_by: &str) -> RepositoryResult<E> {
        entity.validate()?;

        {
            let audit = entity.audit_mut();
            audit.status = EntityStatus::Active;
            audit.created_on = Utc::now();
            audit.created_by = created_by.to_string();
            audit.modified_on = None;
            audit.modified_by = None;
        }

        let placeholders = vec!["?"; E::COLUMNS.len() + 3].join(", ");
        let sql = format!(
            "INSERT INTO {} (status, created_on, created_by, {}) VALUES ({}) RETURNING *",
            E::TABLE,
            E::COLUMNS.join(", "),
            placeholders
        );

        let timer = Self::timer("add");
        let audit = entity.audit();
        let query = sqlx::query_as::<_, E>(&sql)
            .bind(audit.status)
            .bind(audit.created_on)
            .bind(audit.created_by.as_str());
        let result = entity.bind_columns(query).fetch_one(&self.pool).await;
        timer.record();
        let stored = result?;

        self.invalidate_cache().await;
        debug!(entity = E::TYPE_NAME, id = stored.id(), "Entity added");
        Ok(stored)
    }

    /// Persist the data columns of an existing row.
    ///
    /// `created_on`/`created_by` and the status are never written here.
    /// Returns `None` if the row does not exist or is deleted.
    pub async fn update(&self, entity: &E, modified_by: &str) -> RepositoryResult<Option<E>> {
        entity.validate()?;

        let assignments = E::COLUMNS
            .iter()
            .map(|c| format!("{} = ?", c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {}, modified_on = ?, modified_by = ? \
             WHERE id = ? AND status <> 'deleted' RETURNING *",
            E::TABLE,
            assignments
        );

        let timer = Self::timer("update");
        let result = entity
            .bind_columns(sqlx::query_as::<_, E>(&sql))
            .bind(Utc::now())
            .bind(modified_by)
            .bind(entity.id())
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        let updated = result?;

        if updated.is_some() {
            self.invalidate_cache().await;
        }
        Ok(updated)
    }

    /// Toggle between active and inactive. Returns `false` without writing if
    /// the row does not exist or is deleted.
    pub async fn set_active_status(
        &self,
        id: i64,
        is_active: bool,
        modified_by: &str,
    ) -> RepositoryResult<bool> {
        let status = if is_active {
            EntityStatus::Active
        } else {
            EntityStatus::Inactive
        };
        self.transition(id, status, modified_by, "set_active_status")
            .await
    }

    /// Move a row to the deleted state. Returns `false` if it does not exist
    /// or is already deleted.
    pub async fn soft_delete(&self, id: i64, modified_by: &str) -> RepositoryResult<bool> {
        self.transition(id, EntityStatus::Deleted, modified_by, "soft_delete")
            .await
    }

    async fn transition(
        &self,
        id: i64,
        status: EntityStatus,
        modified_by: &str,
        op: &str,
    ) -> RepositoryResult<bool> {
        let sql = format!(
            "UPDATE {} SET status = ?, modified_on = ?, modified_by = ? \
             WHERE id = ? AND status <> 'deleted'",
            E::TABLE
        );

        let timer = Self::timer(op);
        let result = sqlx::query(&sql)
            .bind(status)
            .bind(Utc::now())
            .bind(modified_by)
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();

        let changed = result?.rows_affected() > 0;
        if changed {
            self.invalidate_cache().await;
            debug!(entity = E::TYPE_NAME, id, status = %status, "Entity status changed");
        }
        Ok(changed)
    }
}
