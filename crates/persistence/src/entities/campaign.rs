//! Campaign entity (database row mapping).

use domain::models::CampaignResponse;
use serde::{Deserialize, Serialize};
use shared::money::progress_percent;
use sqlx::FromRow;
use validator::Validate;

use super::audit::{Audit, Entity, SqliteQueryAs};
use crate::schema::TableSchema;

pub const SCHEMA: TableSchema = TableSchema {
    table: "campaigns",
    create: concat!(
        "CREATE TABLE IF NOT EXISTS campaigns (",
        audit_columns!(),
        "fundraiser_profile_id INTEGER NOT NULL REFERENCES profiles (id), \
         title TEXT NOT NULL, \
         description TEXT, \
         slug TEXT NOT NULL, \
         goal_cents INTEGER NOT NULL, \
         raised_cents INTEGER NOT NULL DEFAULT 0)"
    ),
    indexes: &[
        "CREATE UNIQUE INDEX IF NOT EXISTS ux_campaigns_slug ON campaigns (slug) WHERE status <> 'deleted'",
        "CREATE INDEX IF NOT EXISTS ix_campaigns_fundraiser ON campaigns (fundraiser_profile_id)",
    ],
};

/// Database row mapping for the campaigns table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct CampaignEntity {
    #[sqlx(flatten)]
    pub audit: Audit,

    pub fundraiser_profile_id: i64,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Slug must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub slug: String,

    #[validate(custom(function = "shared::validation::validate_donation_amount"))]
    pub goal_cents: i64,

    #[validate(custom(function = "shared::validation::validate_non_negative"))]
    pub raised_cents: i64,
}

impl CampaignEntity {
    pub fn new(
        fundraiser_profile_id: i64,
        title: impl Into<String>,
        slug: impl Into<String>,
        goal_cents: i64,
    ) -> Self {
        Self {
            audit: Audit::default(),
            fundraiser_profile_id,
            title: title.into(),
            description: None,
            slug: slug.into(),
            goal_cents,
            raised_cents: 0,
        }
    }

    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.raised_cents, self.goal_cents)
    }
}

impl Entity for CampaignEntity {
    const TYPE_NAME: &'static str = "Campaign";
    const TABLE: &'static str = "campaigns";
    const COLUMNS: &'static [&'static str] = &[
        "fundraiser_profile_id",
        "title",
        "description",
        "slug",
        "goal_cents",
        "raised_cents",
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
            .bind(self.title.as_str())
            .bind(self.description.as_deref())
            .bind(self.slug.as_str())
            .bind(self.goal_cents)
            .bind(self.raised_cents)
    }
}

impl From<CampaignEntity> for CampaignResponse {
    fn from(entity: CampaignEntity) -> Self {
        let progress_percent = entity.progress_percent();
        Self {
            id: entity.audit.id,
            fundraiser_profile_id: entity.fundraiser_profile_id,
            title: entity.title,
            description: entity.description,
            slug: entity.slug,
            goal_cents: entity.goal_cents,
            raised_cents: entity.raised_cents,
            progress_percent,
            status: entity.audit.status,
            created_on: entity.audit.created_on,
            created_by: entity.audit.created_by,
            modified_on: entity.audit.modified_on,
            modified_by: entity.audit.modified_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_validation() {
        let campaign = CampaignEntity::new(1, "Clean Water", "clean-water", 500_000);
        assert!(campaign.validate().is_ok());

        let mut bad = campaign.clone();
        bad.raised_cents = -1;
        assert!(bad.validate().is_err());

        let mut bad = campaign;
        bad.slug = "Not A Slug".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_campaign_response_conversion() {
        let mut campaign = CampaignEntity::new(4, "Clean Water", "clean-water", 10_000);
        campaign.raised_cents = 2_500;
        campaign.audit.id = 12;
        campaign.audit.created_by = "alice".to_string();

        let response = CampaignResponse::from(campaign);
        assert_eq!(response.id, 12);
        assert_eq!(response.progress_percent, 25);
        assert_eq!(response.created_by, "alice");
        assert_eq!(response.fundraiser_profile_id, 4);
    }
}
