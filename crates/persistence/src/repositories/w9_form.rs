//! W-9 form repository.

use crate::entities::W9FormEntity;
use crate::error::RepositoryResult;
use crate::query::QueryDescriptor;

use super::Repository;

pub type W9FormRepository = Repository<W9FormEntity>;

impl Repository<W9FormEntity> {
    /// The live form on file for a profile.
    pub async fn get_by_profile(&self, profile_id: i64) -> RepositoryResult<Option<W9FormEntity>> {
        self.find_one(&QueryDescriptor::new().eq("profile_id", profile_id), true)
            .await
    }
}
