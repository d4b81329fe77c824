//! Setting entity (database row mapping).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::audit::{Audit, Entity, SqliteQueryAs};
use crate::schema::TableSchema;

pub const SCHEMA: TableSchema = TableSchema {
    table: "settings",
    create: concat!(
        "CREATE TABLE IF NOT EXISTS settings (",
        audit_columns!(),
        "key TEXT NOT NULL, value TEXT NOT NULL)"
    ),
    indexes: &[
        "CREATE UNIQUE INDEX IF NOT EXISTS ux_settings_key ON settings (key COLLATE NOCASE) WHERE status <> 'deleted'",
    ],
};

/// Database row mapping for the settings table. Keys are unique ignoring
/// ASCII case among rows that are not deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct SettingEntity {
    #[sqlx(flatten)]
    pub audit: Audit,

    #[validate(length(min = 1, max = 200, message = "Setting key must be 1-200 characters"))]
    pub key: String,

    #[validate(length(max = 4000, message = "Setting value must be at most 4000 characters"))]
    pub value: String,
}

impl SettingEntity {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            audit: Audit::default(),
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Entity for SettingEntity {
    const TYPE_NAME: &'static str = "Setting";
    const TABLE: &'static str = "settings";
    const COLUMNS: &'static [&'static str] = &["key", "value"];

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn bind_columns<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query.bind(self.key.as_str()).bind(self.value.as_str())
    }
}
