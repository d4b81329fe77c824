//! Donation repository.

use chrono::{DateTime, Utc};
use domain::models::PaymentStatus;

use crate::entities::DonationEntity;
use crate::error::RepositoryResult;
use crate::query::QueryDescriptor;

use super::Repository;

pub type DonationRepository = Repository<DonationEntity>;

impl Repository<DonationEntity> {
    pub async fn list_by_campaign(
        &self,
        campaign_id: i64,
        include_inactive: bool,
    ) -> RepositoryResult<Vec<DonationEntity>> {
        self.find(
            &QueryDescriptor::new().eq("campaign_id", campaign_id),
            include_inactive,
        )
        .await
    }

    pub async fn list_by_status(
        &self,
        payment_status: PaymentStatus,
    ) -> RepositoryResult<Vec<DonationEntity>> {
        self.find(
            &QueryDescriptor::new().eq("payment_status", payment_status.to_string()),
            false,
        )
        .await
    }

    /// Recurring donations whose next charge is due, oldest first.
    /// Always read from the database.
    pub async fn due_recurring(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> RepositoryResult<Vec<DonationEntity>> {
        let query = QueryDescriptor::new()
            .eq("is_recurring", true)
            .lte("next_charge_on", now);
        self.find_uncached(&query, false, Some(limit)).await
    }
}
