//! Profile entity (database row mapping).

use domain::models::ProfileType;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::audit::{Audit, Entity, SqliteQueryAs};
use crate::schema::TableSchema;

pub const SCHEMA: TableSchema = TableSchema {
    table: "profiles",
    create: concat!(
        "CREATE TABLE IF NOT EXISTS profiles (",
        audit_columns!(),
        "user_id INTEGER NOT NULL REFERENCES users (id), \
         profile_type TEXT NOT NULL CHECK (profile_type IN ('donor', 'fundraiser')), \
         first_name TEXT NOT NULL, \
         last_name TEXT NOT NULL, \
         bio TEXT)"
    ),
    indexes: &[
        "CREATE INDEX IF NOT EXISTS ix_profiles_user_id ON profiles (user_id)",
    ],
};

/// Database row mapping for the profiles table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct ProfileEntity {
    #[sqlx(flatten)]
    pub audit: Audit,

    pub user_id: i64,

    pub profile_type: ProfileType,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
}

impl ProfileEntity {
    pub fn new(
        user_id: i64,
        profile_type: ProfileType,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            audit: Audit::default(),
            user_id,
            profile_type,
            first_name: first_name.into(),
            last_name: last_name.into(),
            bio: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for ProfileEntity {
    const TYPE_NAME: &'static str = "Profile";
    const TABLE: &'static str = "profiles";
    const COLUMNS: &'static [&'static str] =
        &["user_id", "profile_type", "first_name", "last_name", "bio"];

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn bind_columns<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(self.user_id)
            .bind(self.profile_type)
            .bind(self.first_name.as_str())
            .bind(self.last_name.as_str())
            .bind(self.bio.as_deref())
    }
}
