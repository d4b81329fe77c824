//! Application setting models.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where a resolved setting value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingSource {
    /// Stored in the settings table.
    Database,
    /// Fallback value from the application configuration.
    Configuration,
}

/// A resolved setting (for API responses).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingResponse {
    pub key: String,
    pub value: String,
    pub source: SettingSource,
}

/// Request to set a single setting value.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingRequest {
    #[validate(length(max = 4000, message = "Setting value must be at most 4000 characters"))]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_source_serialization() {
        assert_eq!(
            serde_json::to_string(&SettingSource::Configuration).unwrap(),
            "\"configuration\""
        );
    }

    #[test]
    fn test_update_setting_request_validation() {
        let ok = UpdateSettingRequest {
            value: "https://donate.example.org".to_string(),
        };
        assert!(ok.validate().is_ok());

        let too_long = UpdateSettingRequest {
            value: "x".repeat(4001),
        };
        assert!(too_long.validate().is_err());
    }
}
