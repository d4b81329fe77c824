//! Payout entity (database row mapping).

use domain::models::PayoutStatus;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::audit::{Audit, Entity, SqliteQueryAs};
use crate::schema::TableSchema;

pub const SCHEMA: TableSchema = TableSchema {
    table: "payouts",
    create: concat!(
        "CREATE TABLE IF NOT EXISTS payouts (",
        audit_columns!(),
        "fundraiser_profile_id INTEGER NOT NULL REFERENCES profiles (id), \
         amount_cents INTEGER NOT NULL, \
         payout_status TEXT NOT NULL CHECK (payout_status IN ('pending', 'processing', 'completed', 'failed')), \
         sender_batch_id TEXT, \
         retry_count INTEGER NOT NULL DEFAULT 0)"
    ),
    indexes: &[
        "CREATE INDEX IF NOT EXISTS ix_payouts_status ON payouts (payout_status)",
        "CREATE INDEX IF NOT EXISTS ix_payouts_batch ON payouts (sender_batch_id)",
    ],
};

/// Database row mapping for the payouts table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct PayoutEntity {
    #[sqlx(flatten)]
    pub audit: Audit,

    pub fundraiser_profile_id: i64,

    #[validate(range(min = 1, message = "Payout amount must be positive"))]
    pub amount_cents: i64,

    pub payout_status: PayoutStatus,

    /// Sender batch this payout was submitted under, once claimed.
    #[validate(length(max = 64, message = "Sender batch id too long"))]
    pub sender_batch_id: Option<String>,

    #[validate(custom(function = "shared::validation::validate_non_negative"))]
    pub retry_count: i64,
}

impl PayoutEntity {
    pub fn new(fundraiser_profile_id: i64, amount_cents: i64) -> Self {
        Self {
            audit: Audit::default(),
            fundraiser_profile_id,
            amount_cents,
            payout_status: PayoutStatus::Pending,
            sender_batch_id: None,
            retry_count: 0,
        }
    }
}

impl Entity for PayoutEntity {
    const TYPE_NAME: &'static str = "Payout";
    const TABLE: &'static str = "payouts";
    const COLUMNS: &'static [&'static str] = &[
        "fundraiser_profile_id",
        "amount_cents",
        "payout_status",
        "sender_batch_id",
        "retry_count",
    ];

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn bind_columns<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(self.fundraiser_profile_id)
            .bind(self.amount_cents)
            .bind(self.payout_status)
            .bind(self.sender_batch_id.as_deref())
            .bind(self.retry_count)
    }
}
