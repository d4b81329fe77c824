//! User entity (database row mapping).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::audit::{Audit, Entity, SqliteQueryAs};
use crate::schema::TableSchema;

pub const SCHEMA: TableSchema = TableSchema {
    table: "users",
    create: concat!(
        "CREATE TABLE IF NOT EXISTS users (",
        audit_columns!(),
        "email TEXT NOT NULL, display_name TEXT NOT NULL, phone TEXT)"
    ),
    indexes: &[
        "CREATE UNIQUE INDEX IF NOT EXISTS ux_users_email ON users (email COLLATE NOCASE) WHERE status <> 'deleted'",
    ],
};

/// Database row mapping for the users table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct UserEntity {
    #[sqlx(flatten)]
    pub audit: Audit,

    #[validate(email(message = "Invalid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,
}

impl UserEntity {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            audit: Audit::default(),
            email: email.into(),
            display_name: display_name.into(),
            phone: None,
        }
    }
}

impl Entity for UserEntity {
    const TYPE_NAME: &'static str = "User";
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["email", "display_name", "phone"];

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn bind_columns<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(self.email.as_str())
            .bind(self.display_name.as_str())
            .bind(self.phone.as_deref())
    }
}
