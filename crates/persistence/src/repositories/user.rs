//! User repository.

use crate::entities::UserEntity;
use crate::error::RepositoryResult;
use crate::query::QueryDescriptor;

use super::Repository;

pub type UserRepository = Repository<UserEntity>;

impl Repository<UserEntity> {
    /// Active user by email, ignoring case.
    pub async fn get_by_email(&self, email: &str) -> RepositoryResult<Option<UserEntity>> {
        self.find_one(
            &QueryDescriptor::new().eq_ignore_case("email", email.trim()),
            false,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;

    #[tokio::test]
    async fn test_get_by_email_ignores_case() {
        let repo = UserRepository::new(fixtures::pool().await);
        let user = repo
            .add(UserEntity::new("Ada@Example.org", "Ada"), "alice")
            .await
            .unwrap();

        let found = repo.get_by_email(" ada@example.ORG ").await.unwrap().unwrap();
        assert_eq!(found.audit.id, user.audit.id);
        assert!(repo.get_by_email("bob@example.org").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = UserRepository::new(fixtures::pool().await);
        repo.add(UserEntity::new("ada@example.org", "Ada"), "alice")
            .await
            .unwrap();
        let dup = repo
            .add(UserEntity::new("ADA@example.org", "Other"), "alice")
            .await;
        assert!(dup.is_err());
    }
}
