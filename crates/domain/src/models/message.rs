//! Outbound message models (email and SMS).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Delivery channel for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MessageChannel {
    Email,
    Sms,
}

impl std::fmt::Display for MessageChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageChannel::Email => write!(f, "email"),
            MessageChannel::Sms => write!(f, "sms"),
        }
    }
}

/// Send state of a scheduled message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SendStatus {
    Scheduled,
    Sent,
    Failed,
}

impl std::fmt::Display for SendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendStatus::Scheduled => write!(f, "scheduled"),
            SendStatus::Sent => write!(f, "sent"),
            SendStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Request to schedule a templated message.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMessageRequest {
    #[validate(length(min = 1, max = 320, message = "Recipient must be 1-320 characters"))]
    pub recipient: String,

    pub channel: MessageChannel,

    #[validate(length(max = 255, message = "Subject must be at most 255 characters"))]
    pub subject: Option<String>,

    #[validate(length(min = 1, max = 10000, message = "Template must be 1-10000 characters"))]
    pub template: String,

    #[serde(default)]
    pub values: HashMap<String, String>,

    /// Send time; `None` means as soon as the dispatcher runs.
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// Request to render a template without scheduling it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMessageRequest {
    pub template: String,
    #[serde(default)]
    pub values: HashMap<String, String>,
}

/// Rendered template plus any placeholders that had no value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMessageResponse {
    pub rendered: String,
    pub missing: Vec<String>,
}

/// Scheduled message as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i64,
    pub recipient: String,
    pub channel: MessageChannel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
    pub send_status: SendStatus,
    pub scheduled_for: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_on: Option<DateTime<Utc>>,
    pub retry_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_request_deserialize() {
        let request: ScheduleMessageRequest = serde_json::from_str(
            r#"{
                "recipient": "donor@example.org",
                "channel": "email",
                "subject": "Thank you",
                "template": "Hi {{name}}",
                "values": {"name": "Ada"}
            }"#,
        )
        .unwrap();
        assert_eq!(request.channel, MessageChannel::Email);
        assert_eq!(request.values.get("name").map(String::as_str), Some("Ada"));
        assert!(request.scheduled_for.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_schedule_request_empty_template_rejected() {
        let request: ScheduleMessageRequest = serde_json::from_str(
            r#"{"recipient": "+15551234567", "channel": "sms", "template": ""}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_channel_display() {
        assert_eq!(MessageChannel::Sms.to_string(), "sms");
        assert_eq!(SendStatus::Scheduled.to_string(), "scheduled");
    }
}
