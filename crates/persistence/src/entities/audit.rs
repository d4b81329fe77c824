//! Audit contract shared by every entity, and the `Entity` trait the generic
//! repository is written against.

use chrono::{DateTime, Utc};
use domain::models::EntityStatus;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};
use validator::Validate;

/// Columns every table carries, managed by the repository rather than the
/// entity's own column list.
pub const AUDIT_COLUMNS: &[&str] = &[
    "id",
    "status",
    "created_on",
    "created_by",
    "modified_on",
    "modified_by",
];

/// Identity, lifecycle and authorship of a row.
///
/// `created_on`/`created_by` are written once on insert and never updated.
/// `modified_on`/`modified_by` are stamped by every later write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Audit {
    pub id: i64,
    pub status: EntityStatus,
    pub created_on: DateTime<Utc>,
    pub created_by: String,
    pub modified_on: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl Audit {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_deleted(&self) -> bool {
        self.status.is_deleted()
    }
}

impl Default for Audit {
    /// Placeholder audit for an entity that has not been inserted yet.
    fn default() -> Self {
        Self {
            id: 0,
            status: EntityStatus::Active,
            created_on: Utc::now(),
            created_by: String::new(),
            modified_on: None,
            modified_by: None,
        }
    }
}

/// Query builder type the entities bind their column values into.
pub type SqliteQueryAs<'q, O> = QueryAs<'q, Sqlite, O, SqliteArguments<'q>>;

/// A table-backed record with the audit contract.
///
/// Implementors list their data columns (everything except the audit
/// columns) and bind values for them in the same order.
pub trait Entity:
    for<'r> FromRow<'r, SqliteRow>
    + Serialize
    + DeserializeOwned
    + Validate
    + Clone
    + Send
    + Sync
    + Unpin
    + 'static
{
    /// Name used as the first segment of cache keys.
    const TYPE_NAME: &'static str;

    /// Backing table.
    const TABLE: &'static str;

    /// Data columns in bind order.
    const COLUMNS: &'static [&'static str];

    fn audit(&self) -> &Audit;

    fn audit_mut(&mut self) -> &mut Audit;

    /// Bind one value per entry of [`Entity::COLUMNS`], in order.
    fn bind_columns<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O>;

    fn id(&self) -> i64 {
        self.audit().id
    }

    /// Whether `column` may appear in a query descriptor for this entity.
    fn is_queryable_column(column: &str) -> bool {
        column != "status"
            && (Self::COLUMNS.iter().any(|c| *c == column)
                || AUDIT_COLUMNS.iter().any(|c| *c == column))
    }
}
