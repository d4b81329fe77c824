//! Payment processing abstraction.

use shared::money::format_cents;
use uuid::Uuid;

use super::provider::ProviderError;

/// A single charge against a donor's stored payment method.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub donation_id: i64,
    pub donor_profile_id: i64,
    pub amount_cents: i64,
    pub currency: String,
    /// Vaulted payment method reference from the provider, if any.
    pub payment_method: Option<String>,
}

/// Successful charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeReceipt {
    pub transaction_id: String,
}

/// Payment processor trait for charging donors.
#[async_trait::async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Charge the donor. Errors are not retried here.
    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeReceipt, ProviderError>;
}

/// Mock payment processor for development and testing.
///
/// Logs charges and approves them unless configured to fail.
#[derive(Debug, Clone, Default)]
pub struct MockPaymentProcessor {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockPaymentProcessor {
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
impl PaymentProcessor for MockPaymentProcessor {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeReceipt, ProviderError> {
        if self.simulate_failure {
            tracing::warn!(
                donation_id = request.donation_id,
                amount_cents = request.amount_cents,
                "Mock payment processor simulating decline"
            );
            return Err(ProviderError::Rejected("Simulated decline".to_string()));
        }

        let transaction_id = format!("mock_{}", Uuid::new_v4().simple());
        tracing::info!(
            donation_id = request.donation_id,
            donor_profile_id = request.donor_profile_id,
            amount = %format_cents(request.amount_cents),
            currency = %request.currency,
            transaction_id = %transaction_id,
            "Mock: Would charge donor"
        );

        Ok(ChargeReceipt { transaction_id })
    }
}
