//! Donation domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityStatus;

/// Payment state of a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Succeeded => write!(f, "succeeded"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Request to record a donation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    pub campaign_id: i64,
    pub donor_profile_id: i64,

    #[validate(custom(function = "shared::validation::validate_donation_amount"))]
    pub amount_cents: i64,

    #[serde(default = "default_currency")]
    #[validate(custom(function = "shared::validation::validate_currency"))]
    pub currency: String,

    /// Charge the same amount again every month.
    #[serde(default)]
    pub recurring: bool,

    /// Reference returned by the payment provider's client-side flow.
    #[validate(length(max = 255, message = "Provider reference too long"))]
    pub provider_reference: Option<String>,
}

/// Donation as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub id: i64,
    pub campaign_id: i64,
    pub donor_profile_id: i64,
    pub amount_cents: i64,
    pub currency: String,
    pub payment_status: PaymentStatus,
    pub is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_charge_on: Option<DateTime<Utc>>,
    pub status: EntityStatus,
    pub created_on: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_donation_defaults() {
        let request: CreateDonationRequest = serde_json::from_str(
            r#"{"campaignId": 1, "donorProfileId": 2, "amountCents": 2500}"#,
        )
        .unwrap();
        assert_eq!(request.currency, "USD");
        assert!(!request.recurring);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_donation_rejects_small_amount() {
        let request: CreateDonationRequest = serde_json::from_str(
            r#"{"campaignId": 1, "donorProfileId": 2, "amountCents": 10}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_donation_rejects_bad_currency() {
        let request: CreateDonationRequest = serde_json::from_str(
            r#"{"campaignId": 1, "donorProfileId": 2, "amountCents": 1000, "currency": "dollars"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_payment_status_display() {
        assert_eq!(PaymentStatus::Succeeded.to_string(), "succeeded");
    }
}
