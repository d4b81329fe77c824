//! Campaign domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityStatus;

/// Campaign as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    pub id: i64,
    pub fundraiser_profile_id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub slug: String,
    pub goal_cents: i64,
    pub raised_cents: i64,
    pub progress_percent: u8,
    pub status: EntityStatus,
    pub created_on: DateTime<Utc>,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
}

/// Request to create a campaign.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
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
}

/// Request to update the editable fields of a campaign.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_donation_amount"))]
    pub goal_cents: i64,
}

/// Query parameters for listing campaigns.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCampaignsQuery {
    #[serde(default)]
    pub include_inactive: bool,
    pub fundraiser_profile_id: Option<i64>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
}

/// Request to toggle a record between active and inactive.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveStatusRequest {
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateCampaignRequest {
        CreateCampaignRequest {
            fundraiser_profile_id: 1,
            title: "Clean Water".to_string(),
            description: Some("Wells for the valley".to_string()),
            slug: "clean-water".to_string(),
            goal_cents: 500_000,
        }
    }

    #[test]
    fn test_create_campaign_request_valid() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn test_create_campaign_request_empty_title() {
        let mut request = create_request();
        request.title = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_campaign_request_bad_slug() {
        let mut request = create_request();
        request.slug = "Clean Water".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_campaign_request_goal_too_small() {
        let mut request = create_request();
        request.goal_cents = 50;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_list_campaigns_query_defaults() {
        let query: ListCampaignsQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.include_inactive);
        assert!(query.fundraiser_profile_id.is_none());
        assert!(query.search.is_none());
    }

    #[test]
    fn test_set_active_status_request_deserialize() {
        let request: SetActiveStatusRequest =
            serde_json::from_str(r#"{"isActive": false}"#).unwrap();
        assert!(!request.is_active);
    }
}
