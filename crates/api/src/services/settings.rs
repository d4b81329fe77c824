//! Application settings with configuration fallback.
//!
//! The settings table wins; keys it does not hold fall back to the
//! `[settings]` section of the configuration.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use domain::models::{SettingResponse, SettingSource};
use persistence::entities::SettingEntity;
use persistence::query::QueryDescriptor;
use persistence::repositories::SettingRepository;
use persistence::RepositoryResult;
use tracing::info;

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingRepository,
    fallback: Arc<HashMap<String, String>>,
}

impl SettingsService {
    pub fn new(repo: SettingRepository, fallback: HashMap<String, String>) -> Self {
        Self {
            repo,
            fallback: Arc::new(fallback),
        }
    }

    /// Configured value for `key`. Keys match ignoring ASCII case, since
    /// configuration sources may normalize them.
    fn fallback_value(&self, key: &str) -> Option<&str> {
        self.fallback.get(key).map(String::as_str).or_else(|| {
            self.fallback
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str())
        })
    }

    /// Resolve a setting: database first, then configuration.
    pub async fn get(&self, key: &str) -> RepositoryResult<Option<SettingResponse>> {
        if let Some(setting) = self.repo.get_by_key(key).await? {
            return Ok(Some(SettingResponse {
                key: setting.key,
                value: setting.value,
                source: SettingSource::Database,
            }));
        }

        Ok(self.fallback_value(key).map(|value| SettingResponse {
            key: key.to_string(),
            value: value.to_string(),
            source: SettingSource::Configuration,
        }))
    }

    pub async fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.get(key).await?.map(|s| s.value))
    }

    /// Store a value. Later reads return it.
    pub async fn set_value(
        &self,
        key: &str,
        value: &str,
        actor: &str,
    ) -> RepositoryResult<SettingEntity> {
        let stored = self.repo.upsert(key, value, actor).await?;
        info!(key = %key, actor = %actor, "Setting updated");
        Ok(stored)
    }

    /// Every resolvable setting, sorted by key. Database values shadow
    /// configured ones.
    pub async fn list(&self) -> RepositoryResult<Vec<SettingResponse>> {
        let mut merged: BTreeMap<String, SettingResponse> = BTreeMap::new();

        for (key, value) in self.fallback.iter() {
            merged.insert(
                key.to_ascii_lowercase(),
                SettingResponse {
                    key: key.clone(),
                    value: value.clone(),
                    source: SettingSource::Configuration,
                },
            );
        }

        for (key, value) in self.repo.get_all_as_map().await? {
            // A stored key shadows a configured key differing only in case.
            merged.insert(
                key.to_ascii_lowercase(),
                SettingResponse {
                    key,
                    value,
                    source: SettingSource::Database,
                },
            );
        }

        Ok(merged.into_values().collect())
    }

    /// Insert configured settings the database does not hold yet.
    /// Existing rows, inactive ones included, are left untouched. Returns how
    /// many were inserted.
    pub async fn seed_from(
        &self,
        settings: &HashMap<String, String>,
        actor: &str,
    ) -> RepositoryResult<usize> {
        let mut keys: Vec<_> = settings.keys().collect();
        keys.sort();

        let mut inserted = 0;
        for key in keys {
            let existing = QueryDescriptor::new().eq_ignore_case("key", key.as_str());
            if self.repo.find_one(&existing, true).await?.is_some() {
                continue;
            }
            self.repo
                .add(SettingEntity::new(key.as_str(), settings[key].as_str()), actor)
                .await?;
            inserted += 1;
        }

        if inserted > 0 {
            info!(inserted, "Seeded settings from configuration");
        }
        Ok(inserted)
    }
}
