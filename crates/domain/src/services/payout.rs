//! Payout provider abstraction.
//!
//! Payouts are submitted in sender batches: one provider call carries many
//! items and is tracked under a single sender batch id.

use super::provider::ProviderError;

/// One payout inside a sender batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutItem {
    pub payout_id: i64,
    pub fundraiser_profile_id: i64,
    pub amount_cents: i64,
}

/// Provider acknowledgement for a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutBatchReceipt {
    pub sender_batch_id: String,
    pub provider_batch_id: String,
}

#[async_trait::async_trait]
pub trait PayoutProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn submit_batch(
        &self,
        sender_batch_id: &str,
        items: &[PayoutItem],
    ) -> Result<PayoutBatchReceipt, ProviderError>;
}

/// Mock payout provider for development and testing.
#[derive(Debug, Clone, Default)]
pub struct MockPayoutProvider {
    pub simulate_failure: bool,
}

impl MockPayoutProvider {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl PayoutProvider for MockPayoutProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn submit_batch(
        &self,
        sender_batch_id: &str,
        items: &[PayoutItem],
    ) -> Result<PayoutBatchReceipt, ProviderError> {
        if self.simulate_failure {
            tracing::warn!(
                sender_batch_id = %sender_batch_id,
                items = items.len(),
                "Mock payout provider simulating outage"
            );
            return Err(ProviderError::Unavailable("Simulated outage".to_string()));
        }

        let total: i64 = items.iter().map(|i| i.amount_cents).sum();
        tracing::info!(
            sender_batch_id = %sender_batch_id,
            items = items.len(),
            total_cents = total,
            "Mock: Would submit payout batch"
        );

        Ok(PayoutBatchReceipt {
            sender_batch_id: sender_batch_id.to_string(),
            provider_batch_id: format!("mock-batch-{}", sender_batch_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_payout_provider() {
        let provider = MockPayoutProvider::new();
        let items = vec![PayoutItem {
            payout_id: 1,
            fundraiser_profile_id: 9,
            amount_cents: 10_000,
        }];
        let receipt = provider.submit_batch("batch-1", &items).await.unwrap();
        assert_eq!(receipt.sender_batch_id, "batch-1");
        assert_eq!(receipt.provider_batch_id, "mock-batch-batch-1");
    }

    #[tokio::test]
    async fn test_mock_payout_provider_failure() {
        let provider = MockPayoutProvider::failing();
        let result = provider.submit_batch("batch-2", &[]).await;
        assert!(matches!(result, Err(ProviderError::Unavailable(_))));
    }
}
