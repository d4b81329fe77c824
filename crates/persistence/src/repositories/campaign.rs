//! Campaign repository.

use chrono::Utc;

use crate::entities::CampaignEntity;
use crate::error::RepositoryResult;
use crate::metrics::QueryTimer;
use crate::query::QueryDescriptor;

use super::Repository;

pub type CampaignRepository = Repository<CampaignEntity>;

impl Repository<CampaignEntity> {
    pub async fn get_by_slug(&self, slug: &str) -> RepositoryResult<Option<CampaignEntity>> {
        self.find_one(&QueryDescriptor::new().eq("slug", slug), false)
            .await
    }

    pub async fn list_by_fundraiser(
        &self,
        fundraiser_profile_id: i64,
        include_inactive: bool,
    ) -> RepositoryResult<Vec<CampaignEntity>> {
        self.find(
            &QueryDescriptor::new().eq("fundraiser_profile_id", fundraiser_profile_id),
            include_inactive,
        )
        .await
    }

    /// Add a successful donation to the campaign total.
    ///
    /// The increment happens in one statement so concurrent donations do not
    /// lose updates. Returns `false` if the campaign is missing or deleted.
    pub async fn record_donation(
        &self,
        campaign_id: i64,
        amount_cents: i64,
        actor: &str,
    ) -> RepositoryResult<bool> {
        let timer = QueryTimer::new("campaigns_record_donation");
        let result = sqlx::query(
            r#"
            UPDATE campaigns
            SET raised_cents = raised_cents + ?, modified_on = ?, modified_by = ?
            WHERE id = ? AND status <> 'deleted'
            "#,
        )
        .bind(amount_cents)
        .bind(Utc::now())
        .bind(actor)
        .bind(campaign_id)
        .execute(self.pool())
        .await;
        timer.record();

        let changed = result?.rows_affected() > 0;
        if changed {
            self.invalidate_cache().await;
        }
        Ok(changed)
    }
}
