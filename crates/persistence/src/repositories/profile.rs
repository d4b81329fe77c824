//! Profile repository.

use domain::models::ProfileType;

use crate::entities::ProfileEntity;
use crate::error::RepositoryResult;
use crate::query::QueryDescriptor;

use super::Repository;

pub type ProfileRepository = Repository<ProfileEntity>;

impl Repository<ProfileEntity> {
    /// Active profiles belonging to a user.
    pub async fn get_by_user(&self, user_id: i64) -> RepositoryResult<Vec<ProfileEntity>> {
        self.find(&QueryDescriptor::new().eq("user_id", user_id), false)
            .await
    }

    pub async fn list_by_type(
        &self,
        profile_type: ProfileType,
        include_inactive: bool,
    ) -> RepositoryResult<Vec<ProfileEntity>> {
        self.find(
            &QueryDescriptor::new().eq("profile_type", profile_type.to_string()),
            include_inactive,
        )
        .await
    }
}
