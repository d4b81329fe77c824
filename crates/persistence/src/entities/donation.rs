//! Donation entity (database row mapping).

use chrono::{DateTime, Months, Utc};
use domain::models::{DonationResponse, PaymentStatus};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::audit::{Audit, Entity, SqliteQueryAs};
use crate::schema::TableSchema;

pub const SCHEMA: TableSchema = TableSchema {
    table: "donations",
    create: concat!(
        "CREATE TABLE IF NOT EXISTS donations (",
        audit_columns!(),
        "campaign_id INTEGER NOT NULL REFERENCES campaigns (id), \
         donor_profile_id INTEGER NOT NULL REFERENCES profiles (id), \
         amount_cents INTEGER NOT NULL, \
         currency TEXT NOT NULL, \
         payment_status TEXT NOT NULL CHECK (payment_status IN ('pending', 'succeeded', 'failed')), \
         provider_reference TEXT, \
         is_recurring INTEGER NOT NULL DEFAULT 0, \
         next_charge_on TEXT, \
         retry_count INTEGER NOT NULL DEFAULT 0)"
    ),
    indexes: &[
        "CREATE INDEX IF NOT EXISTS ix_donations_campaign ON donations (campaign_id)",
        "CREATE INDEX IF NOT EXISTS ix_donations_next_charge ON donations (next_charge_on) WHERE is_recurring = 1",
    ],
};

/// Database row mapping for the donations table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct DonationEntity {
    #[sqlx(flatten)]
    pub audit: Audit,

    pub campaign_id: i64,

    pub donor_profile_id: i64,

    #[validate(custom(function = "shared::validation::validate_donation_amount"))]
    pub amount_cents: i64,

    #[validate(custom(function = "shared::validation::validate_currency"))]
    pub currency: String,

    pub payment_status: PaymentStatus,

    #[validate(length(max = 255, message = "Provider reference too long"))]
    pub provider_reference: Option<String>,

    pub is_recurring: bool,

    /// Next scheduled charge for recurring donations.
    pub next_charge_on: Option<DateTime<Utc>>,

    #[validate(custom(function = "shared::validation::validate_non_negative"))]
    pub retry_count: i64,
}

impl DonationEntity {
    pub fn new(
        campaign_id: i64,
        donor_profile_id: i64,
        amount_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            audit: Audit::default(),
            campaign_id,
            donor_profile_id,
            amount_cents,
            currency: currency.into(),
            payment_status: PaymentStatus::Pending,
            provider_reference: None,
            is_recurring: false,
            next_charge_on: None,
            retry_count: 0,
        }
    }

    /// Mark as recurring with the first repeat charge one month after `from`.
    pub fn make_recurring(&mut self, from: DateTime<Utc>) {
        self.is_recurring = true;
        self.next_charge_on = next_monthly_charge(from);
    }
}

/// Same day next month, clamped to the month's last day.
pub fn next_monthly_charge(from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    from.checked_add_months(Months::new(1))
}

impl Entity for DonationEntity {
    const TYPE_NAME: &'static str = "Donation";
    const TABLE: &'static str = "donations";
    const COLUMNS: &'static [&'static str] = &[
        "campaign_id",
        "donor_profile_id",
        "amount_cents",
        "currency",
        "payment_status",
        "provider_reference",
        "is_recurring",
        "next_charge_on",
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
            .bind(self.campaign_id)
            .bind(self.donor_profile_id)
            .bind(self.amount_cents)
            .bind(self.currency.as_str())
            .bind(self.payment_status)
            .bind(self.provider_reference.as_deref())
            .bind(self.is_recurring)
            .bind(self.next_charge_on)
            .bind(self.retry_count)
    }
}

impl From<DonationEntity> for DonationResponse {
    fn from(entity: DonationEntity) -> Self {
        Self {
            id: entity.audit.id,
            campaign_id: entity.campaign_id,
            donor_profile_id: entity.donor_profile_id,
            amount_cents: entity.amount_cents,
            currency: entity.currency,
            payment_status: entity.payment_status,
            is_recurring: entity.is_recurring,
            next_charge_on: entity.next_charge_on,
            status: entity.audit.status,
            created_on: entity.audit.created_on,
        }
    }
}
