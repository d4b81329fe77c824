//! Setting repository.

use std::collections::HashMap;

use crate::entities::SettingEntity;
use crate::error::RepositoryResult;
use crate::query::QueryDescriptor;

use super::Repository;

pub type SettingRepository = Repository<SettingEntity>;

impl Repository<SettingEntity> {
    /// Active setting for `key`, matched ignoring ASCII case.
    pub async fn get_by_key(&self, key: &str) -> RepositoryResult<Option<SettingEntity>> {
        self.find_one(&QueryDescriptor::new().eq_ignore_case("key", key), false)
            .await
    }

    /// Create or overwrite a setting. An inactive setting is reactivated and
    /// an existing row keeps the casing of its key.
    pub async fn upsert(
        &self,
        key: &str,
        value: &str,
        actor: &str,
    ) -> RepositoryResult<SettingEntity> {
        let existing = self
            .find_one(&QueryDescriptor::new().eq_ignore_case("key", key), true)
            .await?;

        let Some(mut setting) = existing else {
            return self.add(SettingEntity::new(key, value), actor).await;
        };

        setting.value = value.to_string();
        let id = setting.audit.id;
        let updated = self.update(&setting, actor).await?;
        if !setting.audit.is_active() {
            self.set_active_status(id, true, actor).await?;
        }

        match updated {
            Some(_) => Ok(self.get_by_id(id, false).await?.unwrap_or(setting)),
            // Deleted between the lookup and the write.
            None => self.add(SettingEntity::new(key, value), actor).await,
        }
    }

    /// Active settings as a key/value map.
    pub async fn get_all_as_map(&self) -> RepositoryResult<HashMap<String, String>> {
        Ok(self
            .get_all(false)
            .await?
            .into_iter()
            .map(|s| (s.key, s.value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;

    #[tokio::test]
    async fn test_get_by_key() {
        let repo = SettingRepository::new(fixtures::pool().await);
        repo.add(SettingEntity::new("BaseUrl", "https://a"), "alice")
            .await
            .unwrap();

        let found = repo.get_by_key("BaseUrl").await.unwrap().unwrap();
        assert_eq!(found.value, "https://a");
        assert_eq!(
            repo.get_by_key("baseurl").await.unwrap().map(|s| s.value),
            Some("https://a".to_string())
        );
        assert!(repo.get_by_key("Missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_keeps_existing_key_casing() {
        let repo = SettingRepository::new(fixtures::pool().await);
        let seeded = repo.upsert("baseurl", "https://a", "startup").await.unwrap();

        let updated = repo.upsert("BaseUrl", "https://b", "admin").await.unwrap();
        assert_eq!(updated.audit.id, seeded.audit.id);
        assert_eq!(updated.key, "baseurl");
        assert_eq!(repo.count(false).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let repo = SettingRepository::new(fixtures::pool().await);

        let created = repo.upsert("BaseUrl", "https://a", "alice").await.unwrap();
        assert_eq!(created.audit.created_by, "alice");

        let updated = repo.upsert("BaseUrl", "https://b", "bob").await.unwrap();
        assert_eq!(updated.audit.id, created.audit.id);
        assert_eq!(updated.value, "https://b");
        assert_eq!(updated.audit.created_by, "alice");
        assert_eq!(updated.audit.modified_by.as_deref(), Some("bob"));
        assert_eq!(repo.count(true).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_reactivates_inactive_setting() {
        let repo = SettingRepository::new(fixtures::pool().await);
        let created = repo.upsert("Theme", "dark", "alice").await.unwrap();
        repo.set_active_status(created.audit.id, false, "alice")
            .await
            .unwrap();
        assert!(repo.get_by_key("Theme").await.unwrap().is_none());

        let revived = repo.upsert("Theme", "light", "bob").await.unwrap();
        assert_eq!(revived.audit.id, created.audit.id);
        assert!(revived.audit.is_active());
        assert_eq!(revived.value, "light");
    }

    #[tokio::test]
    async fn test_upsert_after_delete_creates_new_row() {
        let repo = SettingRepository::new(fixtures::pool().await);
        let first = repo.upsert("Theme", "dark", "alice").await.unwrap();
        repo.soft_delete(first.audit.id, "alice").await.unwrap();

        let second = repo.upsert("Theme", "light", "alice").await.unwrap();
        assert_ne!(second.audit.id, first.audit.id);
    }

    #[tokio::test]
    async fn test_get_all_as_map_skips_inactive() {
        let repo = SettingRepository::new(fixtures::pool().await);
        repo.upsert("A", "1", "alice").await.unwrap();
        let b = repo.upsert("B", "2", "alice").await.unwrap();
        repo.set_active_status(b.audit.id, false, "alice").await.unwrap();

        let map = repo.get_all_as_map().await.unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("A").map(String::as_str), Some("1"));
    }
}
