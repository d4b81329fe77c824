//! Payout repository.
//!
//! Pending payouts are claimed into a sender batch, submitted to the provider
//! as one unit, then settled together.

use chrono::Utc;
use domain::models::PayoutStatus;

use crate::entities::PayoutEntity;
use crate::error::RepositoryResult;
use crate::metrics::QueryTimer;
use crate::query::QueryDescriptor;

use super::Repository;

pub type PayoutRepository = Repository<PayoutEntity>;

impl Repository<PayoutEntity> {
    pub async fn list_by_status(
        &self,
        payout_status: PayoutStatus,
    ) -> RepositoryResult<Vec<PayoutEntity>> {
        self.find(
            &QueryDescriptor::new().eq("payout_status", payout_status.to_string()),
            false,
        )
        .await
    }

    /// Move up to `limit` pending payouts to processing under `sender_batch_id`.
    ///
    /// Selection and update are one statement, so two claimers never share a
    /// payout.
    pub async fn claim_pending_batch(
        &self,
        limit: i64,
        sender_batch_id: &str,
        actor: &str,
    ) -> RepositoryResult<Vec<PayoutEntity>> {
        let timer = QueryTimer::new("payouts_claim_pending_batch");
        let result = sqlx::query_as::<_, PayoutEntity>(
            r#"
            UPDATE payouts
            SET payout_status = 'processing', sender_batch_id = ?,
                modified_on = ?, modified_by = ?
            WHERE id IN (
                SELECT id FROM payouts
                WHERE payout_status = 'pending' AND status = 'active'
                ORDER BY id
                LIMIT ?
            )
            RETURNING *
            "#,
        )
        .bind(sender_batch_id)
        .bind(Utc::now())
        .bind(actor)
        .bind(limit)
        .fetch_all(self.pool())
        .await;
        timer.record();

        let mut claimed = result?;
        claimed.sort_by_key(|p| p.audit.id);
        if !claimed.is_empty() {
            self.invalidate_cache().await;
        }
        Ok(claimed)
    }

    /// Mark every processing payout of the batch completed.
    pub async fn complete_batch(&self, sender_batch_id: &str, actor: &str) -> RepositoryResult<u64> {
        let timer = QueryTimer::new("payouts_complete_batch");
        let result = sqlx::query(
            r#"
            UPDATE payouts
            SET payout_status = 'completed', modified_on = ?, modified_by = ?
            WHERE sender_batch_id = ? AND payout_status = 'processing'
            "#,
        )
        .bind(Utc::now())
        .bind(actor)
        .bind(sender_batch_id)
        .execute(self.pool())
        .await;
        timer.record();

        let settled = result?.rows_affected();
        if settled > 0 {
            self.invalidate_cache().await;
        }
        Ok(settled)
    }

    /// Record a failed submission of the batch.
    ///
    /// Each payout's retry counter is incremented. Payouts below
    /// `max_retries` go back to pending without a batch id; the rest are
    /// marked failed and keep the batch id.
    pub async fn release_failed_batch(
        &self,
        sender_batch_id: &str,
        max_retries: i64,
        actor: &str,
    ) -> RepositoryResult<u64> {
        let timer = QueryTimer::new("payouts_release_failed_batch");
        let result = sqlx::query(
            r#"
            UPDATE payouts
            SET retry_count = retry_count + 1,
                payout_status = CASE WHEN retry_count + 1 >= ? THEN 'failed' ELSE 'pending' END,
                sender_batch_id = CASE WHEN retry_count + 1 >= ? THEN sender_batch_id ELSE NULL END,
                modified_on = ?, modified_by = ?
            WHERE sender_batch_id = ? AND payout_status = 'processing'
            "#,
        )
        .bind(max_retries)
        .bind(max_retries)
        .bind(Utc::now())
        .bind(actor)
        .bind(sender_batch_id)
        .execute(self.pool())
        .await;
        timer.record();

        let released = result?.rows_affected();
        if released > 0 {
            self.invalidate_cache().await;
        }
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;
    use domain::models::ProfileType;

    async fn seeded(count: usize) -> PayoutRepository {
        let pool = fixtures::pool().await;
        let fundraiser = fixtures::profile(&pool, ProfileType::Fundraiser).await;
        let repo = PayoutRepository::new(pool);
        for i in 0..count {
            repo.add(
                PayoutEntity::new(fundraiser.audit.id, 1_000 * (i as i64 + 1)),
                "system",
            )
            .await
            .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_claim_pending_batch_is_bounded_and_exclusive() {
        let repo = seeded(5).await;

        let first = repo.claim_pending_batch(3, "batch-a", "job").await.unwrap();
        assert_eq!(first.len(), 3);
        assert!(first
            .iter()
            .all(|p| p.payout_status == PayoutStatus::Processing
                && p.sender_batch_id.as_deref() == Some("batch-a")));

        let second = repo.claim_pending_batch(3, "batch-b", "job").await.unwrap();
        assert_eq!(second.len(), 2);
        assert!(repo.claim_pending_batch(3, "batch-c", "job").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_batch() {
        let repo = seeded(2).await;
        repo.claim_pending_batch(10, "batch-a", "job").await.unwrap();

        assert_eq!(repo.complete_batch("batch-a", "job").await.unwrap(), 2);
        assert_eq!(repo.list_by_status(PayoutStatus::Completed).await.unwrap().len(), 2);
        assert_eq!(repo.complete_batch("batch-a", "job").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_release_failed_batch_retries_then_fails() {
        let repo = seeded(1).await;

        repo.claim_pending_batch(10, "b1", "job").await.unwrap();
        assert_eq!(repo.release_failed_batch("b1", 2, "job").await.unwrap(), 1);
        let pending = repo.list_by_status(PayoutStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].retry_count, 1);
        assert!(pending[0].sender_batch_id.is_none());

        repo.claim_pending_batch(10, "b2", "job").await.unwrap();
        repo.release_failed_batch("b2", 2, "job").await.unwrap();
        let failed = repo.list_by_status(PayoutStatus::Failed).await.unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].retry_count, 2);
        assert_eq!(failed[0].sender_batch_id.as_deref(), Some("b2"));
    }
}
