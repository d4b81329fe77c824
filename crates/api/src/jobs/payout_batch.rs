//! Submits pending payouts to the payout provider in sender batches.

use std::sync::Arc;

use domain::services::{PayoutItem, PayoutProvider};
use persistence::repositories::PayoutRepository;
use persistence::RepositoryResult;
use tracing::{info, warn};
use uuid::Uuid;

use super::scheduler::{BatchOutcome, Job, JobFrequency};
use crate::config::BatchJobConfig;
use crate::middleware::metrics::record_job_item;

const JOB_NAME: &str = "payout_batch";

pub struct PayoutBatchJob {
    payouts: PayoutRepository,
    provider: Arc<dyn PayoutProvider>,
    config: BatchJobConfig,
}

impl PayoutBatchJob {
    pub fn new(
        payouts: PayoutRepository,
        provider: Arc<dyn PayoutProvider>,
        config: BatchJobConfig,
    ) -> Self {
        Self {
            payouts,
            provider,
            config,
        }
    }

    /// Claim up to one batch of pending payouts and submit it.
    pub async fn process_batch(&self) -> RepositoryResult<BatchOutcome> {
        let sender_batch_id = Uuid::new_v4().to_string();
        let claimed = self
            .payouts
            .claim_pending_batch(self.config.batch_size, &sender_batch_id, JOB_NAME)
            .await?;
        if claimed.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let items: Vec<PayoutItem> = claimed
            .iter()
            .map(|p| PayoutItem {
                payout_id: p.audit.id,
                fundraiser_profile_id: p.fundraiser_profile_id,
                amount_cents: p.amount_cents,
            })
            .collect();

        match self.provider.submit_batch(&sender_batch_id, &items).await {
            Ok(receipt) => {
                let settled = self.payouts.complete_batch(&sender_batch_id, JOB_NAME).await?;
                record_job_item(JOB_NAME, "completed", settled);
                info!(
                    sender_batch_id = %sender_batch_id,
                    provider_batch_id = %receipt.provider_batch_id,
                    provider = self.provider.name(),
                    items = settled,
                    "Payout batch submitted"
                );
                Ok(BatchOutcome {
                    succeeded: settled as usize,
                    failed: 0,
                })
            }
            Err(e) => {
                let released = self
                    .payouts
                    .release_failed_batch(&sender_batch_id, self.config.max_retries, JOB_NAME)
                    .await?;
                record_job_item(JOB_NAME, "failed", released);
                warn!(
                    sender_batch_id = %sender_batch_id,
                    items = released,
                    error = %e,
                    "Payout batch submission failed"
                );
                Ok(BatchOutcome {
                    succeeded: 0,
                    failed: released as usize,
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl Job for PayoutBatchJob {
    fn name(&self) -> &'static str {
        JOB_NAME
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.config.interval_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        self.process_batch()
            .await
            .map(|_| ())
            .map_err(|e| format!("Failed to process payout batch: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::fixtures;
    use domain::models::PayoutStatus;
    use domain::services::MockPayoutProvider;
    use persistence::entities::PayoutEntity;

    async fn pending_payouts(repo: &PayoutRepository, n: usize) -> i64 {
        let fundraiser = fixtures::fundraiser(repo.pool()).await;
        for i in 0..n {
            repo.add(
                PayoutEntity::new(fundraiser.audit.id, 1_000 * (i as i64 + 1)),
                "test",
            )
            .await
            .unwrap();
        }
        fundraiser.audit.id
    }

    fn config(batch_size: i64) -> BatchJobConfig {
        BatchJobConfig {
            batch_size,
            max_retries: 2,
            ..BatchJobConfig::default()
        }
    }

    #[tokio::test]
    async fn test_batch_completes_bounded_claim() {
        let pool = fixtures::pool().await;
        let repo = PayoutRepository::new(pool.clone());
        pending_payouts(&repo, 3).await;

        let job = PayoutBatchJob::new(repo.clone(), Arc::new(MockPayoutProvider::new()), config(2));
        assert_eq!(job.process_batch().await.unwrap().succeeded, 2);

        let completed = repo.list_by_status(PayoutStatus::Completed).await.unwrap();
        assert_eq!(completed.len(), 2);
        let batch = completed[0].sender_batch_id.clone().unwrap();
        assert!(completed.iter().all(|p| p.sender_batch_id.as_deref() == Some(batch.as_str())));
        assert_eq!(repo.list_by_status(PayoutStatus::Pending).await.unwrap().len(), 1);

        assert_eq!(job.process_batch().await.unwrap().succeeded, 1);
        assert_eq!(job.process_batch().await.unwrap(), BatchOutcome::default());
    }

    #[tokio::test]
    async fn test_failed_batch_retries_then_fails() {
        let pool = fixtures::pool().await;
        let repo = PayoutRepository::new(pool.clone());
        pending_payouts(&repo, 1).await;

        let job = PayoutBatchJob::new(
            repo.clone(),
            Arc::new(MockPayoutProvider::failing()),
            config(10),
        );

        assert_eq!(job.process_batch().await.unwrap().failed, 1);
        let pending = repo.list_by_status(PayoutStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].retry_count, 1);
        assert!(pending[0].sender_batch_id.is_none());

        assert_eq!(job.process_batch().await.unwrap().failed, 1);
        let failed = repo.list_by_status(PayoutStatus::Failed).await.unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].retry_count, 2);

        assert_eq!(job.process_batch().await.unwrap(), BatchOutcome::default());
    }
}
