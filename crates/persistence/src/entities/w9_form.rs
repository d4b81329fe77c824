//! W-9 tax form entity (database row mapping).
//!
//! Only the last four digits of the taxpayer id are stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::audit::{Audit, Entity, SqliteQueryAs};
use crate::schema::TableSchema;

pub const SCHEMA: TableSchema = TableSchema {
    table: "w9_forms",
    create: concat!(
        "CREATE TABLE IF NOT EXISTS w9_forms (",
        audit_columns!(),
        "profile_id INTEGER NOT NULL REFERENCES profiles (id), \
         legal_name TEXT NOT NULL, \
         tax_id_last4 TEXT NOT NULL, \
         submitted_on TEXT NOT NULL)"
    ),
    indexes: &[
        "CREATE UNIQUE INDEX IF NOT EXISTS ux_w9_forms_profile ON w9_forms (profile_id) WHERE status <> 'deleted'",
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct W9FormEntity {
    #[sqlx(flatten)]
    pub audit: Audit,

    pub profile_id: i64,

    #[validate(length(min = 1, max = 200, message = "Legal name must be 1-200 characters"))]
    pub legal_name: String,

    #[validate(custom(function = "shared::validation::validate_tax_id_last4"))]
    pub tax_id_last4: String,

    pub submitted_on: DateTime<Utc>,
}

impl W9FormEntity {
    pub fn new(
        profile_id: i64,
        legal_name: impl Into<String>,
        tax_id_last4: impl Into<String>,
    ) -> Self {
        Self {
            audit: Audit::default(),
            profile_id,
            legal_name: legal_name.into(),
            tax_id_last4: tax_id_last4.into(),
            submitted_on: Utc::now(),
        }
    }
}

impl Entity for W9FormEntity {
    const TYPE_NAME: &'static str = "W9Form";
    const TABLE: &'static str = "w9_forms";
    const COLUMNS: &'static [&'static str] =
        &["profile_id", "legal_name", "tax_id_last4", "submitted_on"];

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn bind_columns<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(self.profile_id)
            .bind(self.legal_name.as_str())
            .bind(self.tax_id_last4.as_str())
            .bind(self.submitted_on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_w9_validation() {
        assert!(W9FormEntity::new(1, "Ada Lovelace", "1234").validate().is_ok());
        assert!(W9FormEntity::new(1, "Ada Lovelace", "12345").validate().is_err());
        assert!(W9FormEntity::new(1, "", "1234").validate().is_err());
    }
}
